//! Retrieval of recording files.
//!
//! Recordings are fetched over HTTP(S) with no retry: a failed request is
//! reported once to the caller. A local file can be read instead of fetching.

use std::path::Path;
use std::time::Duration;

/// Retrieval error types.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchError {
    /// Client could not be set up
    Config(String),
    /// Network/HTTP error
    Network(String),
    /// Server returned a non-success response
    Server { status: u16, message: String },
    /// Local file could not be read
    Io(String),
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Config(msg) => write!(f, "Client config error: {msg}"),
            FetchError::Network(msg) => write!(f, "Network error: {msg}"),
            FetchError::Server { status, message } => {
                write!(f, "Server error ({status}): {message}")
            }
            FetchError::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for FetchError {}

/// Async client for fetching recording files.
#[derive(Debug, Clone)]
pub struct DataClient {
    client: reqwest::Client,
}

impl DataClient {
    /// Create a new client. Without a timeout, requests wait indefinitely.
    pub fn new(timeout: Option<Duration>) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("hrv-dashboard/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| FetchError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }

    /// Fetch the body of `url` as text.
    pub async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        tracing::info!(url, "Fetching recording");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .ok()
                .map(|body| body.trim().to_string())
                .filter(|body| !body.is_empty())
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("Unknown error")
                        .to_string()
                });
            tracing::warn!(url, status = status.as_u16(), "Fetch failed");
            return Err(FetchError::Server {
                status: status.as_u16(),
                message,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;
        tracing::debug!(url, bytes = body.len(), "Fetched recording");
        Ok(body)
    }
}

/// Blocking client for use in synchronous contexts.
pub struct BlockingDataClient {
    inner: DataClient,
    runtime: tokio::runtime::Runtime,
}

impl BlockingDataClient {
    /// Create a new blocking client.
    pub fn new(timeout: Option<Duration>) -> Result<Self, FetchError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| FetchError::Config(format!("Failed to create runtime: {e}")))?;

        Ok(Self {
            inner: DataClient::new(timeout)?,
            runtime,
        })
    }

    /// Fetch the body of `url` as text.
    pub fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        self.runtime.block_on(self.inner.fetch_text(url))
    }
}

/// Read a local recording file.
pub fn read_local(path: &Path) -> Result<String, FetchError> {
    tracing::info!(path = %path.display(), "Reading recording");
    std::fs::read_to_string(path)
        .map_err(|e| FetchError::Io(format!("Failed to read {}: {e}", path.display())))
}
