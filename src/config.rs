//! Configuration for the HRV dashboard.

use crate::subject::SUBJECT_COUNT;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Location of the published per-subject recordings.
pub const DEFAULT_BASE_URL: &str =
    "https://raw.githubusercontent.com/Sithuaung-Ink/Heart-Rate-Variability-Analysis/main/all_subjects_bpm_rmssd/";

/// Main configuration for the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL the subject file names are appended to
    pub base_url: String,

    /// Number of selectable subjects
    pub subject_count: u16,

    /// Directory rendered dashboards are written to
    pub output_path: PathBuf,

    /// Chart size in pixels
    pub chart_width: u32,
    pub chart_height: u32,

    /// Request timeout in seconds; no timeout when unset
    pub request_timeout_secs: Option<u64>,

    /// Port for `serve`
    pub server_port: u16,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("hrv-dashboard");

        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            subject_count: SUBJECT_COUNT,
            output_path: data_dir.join("dashboards"),
            chart_width: 1200,
            chart_height: 600,
            request_timeout_secs: None,
            server_port: 8501,
        }
    }
}

impl Config {
    /// Load configuration from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .map_err(|e| ConfigError::IoError(e.to_string()))?;
            Self::from_json(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse configuration from JSON; absent fields take their defaults.
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: Config =
            serde_json::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        let config_path = Self::config_path();

        // Ensure parent directory exists
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(&config_path, content).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// Get the path to the configuration file.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("hrv-dashboard")
            .join("config.json")
    }

    /// Request timeout, if one is configured.
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("base_url must not be empty".to_string()));
        }
        if self.subject_count == 0 {
            return Err(ConfigError::Invalid(
                "subject_count must be at least 1".to_string(),
            ));
        }
        if self.chart_width < 200 || self.chart_height < 150 {
            return Err(ConfigError::Invalid(format!(
                "chart size {}x{} is too small",
                self.chart_width, self.chart_height
            )));
        }
        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug)]
pub enum ConfigError {
    IoError(String),
    ParseError(String),
    SerializeError(String),
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {e}"),
            ConfigError::ParseError(e) => write!(f, "Parse error: {e}"),
            ConfigError::SerializeError(e) => write!(f, "Serialize error: {e}"),
            ConfigError::Invalid(e) => write!(f, "Invalid configuration: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.subject_count, 25);
        assert_eq!(config.request_timeout(), None);
        assert_eq!(config.chart_width, 1200);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config =
            Config::from_json(r#"{ "base_url": "http://127.0.0.1:9000/", "request_timeout_secs": 5 }"#)
                .unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:9000/");
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(5)));
        assert_eq!(config.subject_count, SUBJECT_COUNT);
        assert_eq!(config.chart_height, 600);
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(matches!(
            Config::from_json(r#"{ "subject_count": 0 }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            Config::from_json(r#"{ "chart_width": 10 }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            Config::from_json("not json"),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_config_round_trips_through_json() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(Config::from_json(&json).unwrap(), config);
    }
}
