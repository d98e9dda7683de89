//! Fatal error type of a synchronization run.
//!
//! Anything that reaches the caller as a [`SyncError`] ends the run. The
//! recoverable per-harvester failures never take this path; they are
//! recorded in an [`ErrorMap`](super::ErrorMap) instead.

use thiserror::Error;

use crate::config::ConfigError;
use crate::sftp::HistoryParseError;
use crate::traits::HttpError;

/// Unified fatal error of the password store.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Saturn could not be reached or answered with a non-2xx status
    #[error("Saturn request failed: {0}")]
    Http(#[from] HttpError),

    /// Saturn answered with JSON that does not match the expected record
    #[error("Unexpected JSON from Saturn: {0}")]
    Json(#[from] serde_json::Error),

    /// A harvester password file is malformed
    #[error("Malformed password file for harvester '{harvester}': {source}")]
    PasswordFile {
        harvester: String,
        #[source]
        source: HistoryParseError,
    },

    /// Environment configuration is invalid
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// A record violates an invariant of the repository wire format
    #[error("Invalid repository record: {0}")]
    InvalidRecord(String),
}

impl SyncError {
    /// HTTP status when the error is a non-2xx Saturn response.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            SyncError::Http(err) => err.status(),
            _ => None,
        }
    }
}

/// Result type alias for synchronization operations.
pub type SyncResult<T> = Result<T, SyncError>;
