//! Error types reported by host storage adapters.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Failures surfaced by a [`crate::PrefsStore`] implementation.
pub enum StoreError {
    /// The backing medium is not available on this host.
    #[error("storage unavailable")]
    Unavailable,
    /// The medium refused the write because it is full.
    #[error("storage quota exceeded while writing `{key}`")]
    QuotaExceeded {
        /// Key whose write was rejected.
        key: String,
    },
    /// A typed value could not be converted to or from JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
    /// Any other backend-reported failure.
    #[error("storage backend error: {0}")]
    Backend(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
