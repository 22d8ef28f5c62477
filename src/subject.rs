//! Subject selection.
//!
//! The dashboard offers a fixed, enumerated set of subjects. Each subject maps
//! deterministically to one recording file under the configured base URL.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Number of subjects in the published dataset.
pub const SUBJECT_COUNT: u16 = 25;

/// Identifier of one subject (1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectId(u16);

impl SubjectId {
    /// Create a subject id, checking it against the number of known subjects.
    pub fn new(id: u16, subject_count: u16) -> Result<Self, SubjectError> {
        if id == 0 || id > subject_count {
            return Err(SubjectError::OutOfRange {
                id,
                max: subject_count,
            });
        }
        Ok(Self(id))
    }

    /// The numeric id.
    pub fn get(self) -> u16 {
        self.0
    }

    /// Display name, e.g. `Subject 3`.
    pub fn name(self) -> String {
        format!("Subject {}", self.0)
    }

    /// Recording file name for this subject.
    pub fn file_name(self) -> String {
        format!("subject_{}_bpm_rmssd.csv", self.0)
    }

    /// Full location of the recording under `base_url`.
    pub fn url(self, base_url: &str) -> String {
        if base_url.ends_with('/') {
            format!("{base_url}{}", self.file_name())
        } else {
            format!("{base_url}/{}", self.file_name())
        }
    }

    /// Parse a selection such as `Subject 7`, `subject_7` or `7`.
    pub fn parse(s: &str, subject_count: u16) -> Result<Self, SubjectError> {
        let trimmed = s.trim();
        let lower = trimmed.to_lowercase();
        let digits = lower
            .strip_prefix("subject")
            .map(|rest| rest.trim_start_matches(|c: char| c == ' ' || c == '_' || c == '-'))
            .unwrap_or(lower.as_str());

        let id: u16 = digits
            .parse()
            .map_err(|_| SubjectError::Invalid(trimmed.to_string()))?;
        Self::new(id, subject_count)
    }
}

impl std::fmt::Display for SubjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Subject {}", self.0)
    }
}

impl FromStr for SubjectId {
    type Err = SubjectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s, SUBJECT_COUNT)
    }
}

/// All selectable subjects, in display order.
pub fn all_subjects(subject_count: u16) -> Vec<SubjectId> {
    (1..=subject_count).map(SubjectId).collect()
}

/// Subject listing entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectEntry {
    pub id: SubjectId,
    pub name: String,
    pub url: String,
}

/// List every subject together with its recording location.
pub fn subject_entries(base_url: &str, subject_count: u16) -> Vec<SubjectEntry> {
    all_subjects(subject_count)
        .into_iter()
        .map(|id| SubjectEntry {
            id,
            name: id.name(),
            url: id.url(base_url),
        })
        .collect()
}

/// Subject selection errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubjectError {
    Invalid(String),
    OutOfRange { id: u16, max: u16 },
}

impl std::fmt::Display for SubjectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubjectError::Invalid(s) => write!(f, "Invalid subject '{s}'"),
            SubjectError::OutOfRange { id, max } => {
                write!(f, "Subject {id} out of range (1..={max})")
            }
        }
    }
}

impl std::error::Error for SubjectError {}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://example.org/data/";

    #[test]
    fn test_subject_url_mapping() {
        let subject = SubjectId::new(7, SUBJECT_COUNT).unwrap();
        assert_eq!(subject.file_name(), "subject_7_bpm_rmssd.csv");
        assert_eq!(
            subject.url(BASE),
            "https://example.org/data/subject_7_bpm_rmssd.csv"
        );
        assert_eq!(
            subject.url("https://example.org/data"),
            "https://example.org/data/subject_7_bpm_rmssd.csv"
        );
    }

    #[test]
    fn test_subject_parsing() {
        assert_eq!(SubjectId::parse("Subject 3", 25).unwrap().get(), 3);
        assert_eq!(SubjectId::parse("subject_12", 25).unwrap().get(), 12);
        assert_eq!(SubjectId::parse(" 25 ", 25).unwrap().get(), 25);
        assert_eq!("Subject 1".parse::<SubjectId>().unwrap().get(), 1);

        assert_eq!(
            SubjectId::parse("Subject 26", 25),
            Err(SubjectError::OutOfRange { id: 26, max: 25 })
        );
        assert!(matches!(
            SubjectId::parse("0", 25),
            Err(SubjectError::OutOfRange { .. })
        ));
        assert!(matches!(
            SubjectId::parse("someone", 25),
            Err(SubjectError::Invalid(_))
        ));
    }

    #[test]
    fn test_subject_listing() {
        let entries = subject_entries(BASE, SUBJECT_COUNT);
        assert_eq!(entries.len(), 25);
        assert_eq!(entries[0].name, "Subject 1");
        assert_eq!(entries[24].name, "Subject 25");
        assert!(entries[24].url.ends_with("subject_25_bpm_rmssd.csv"));
    }
}
