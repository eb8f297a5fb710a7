//! Error types for the coin dashboard

use thiserror::Error;

/// Errors that can occur when fetching data from the market data API
///
/// Transport failures, non-success statuses and unparseable bodies all map to
/// the same kind. The message is diagnostic only.
#[derive(Debug, Error, Clone)]
pub enum ProviderError {
    /// The request did not produce usable data
    #[error("Network failure: {0}")]
    NetworkFailure(String),
}

impl ProviderError {
    /// Creates a NetworkFailure error
    pub fn network_failure(msg: impl Into<String>) -> Self {
        Self::NetworkFailure(msg.into())
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        Self::NetworkFailure(err.to_string())
    }
}

/// Errors surfaced by dashboard operations
#[derive(Debug, Error, Clone)]
pub enum DashboardError {
    /// Refreshing the coin list failed; the list shows an inline error
    #[error("Failed to fetch coin list: {0}")]
    ListFetchFailed(#[source] ProviderError),

    /// Fetching detail for one coin failed; the modal stays closed
    #[error("Failed to fetch details for {id}: {source}")]
    DetailFetchFailed {
        id: String,
        #[source]
        source: ProviderError,
    },
}

impl DashboardError {
    /// Creates a DetailFetchFailed error
    pub fn detail_fetch_failed(id: &str, source: ProviderError) -> Self {
        Self::DetailFetchFailed {
            id: id.to_string(),
            source,
        }
    }
}

/// Errors from the preference store
#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No preference directory available")]
    NoConfigDir,
}
