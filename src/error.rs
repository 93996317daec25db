//! Error types for persistence, cloud sync and update checks.
//!
//! None of these are fatal: callers log them, fall back to the local
//! snapshot or defaults, and show a notice.

use thiserror::Error;

/// Local key-value storage failures.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("local storage rejected the write: {0}")]
    Write(String),
    #[error("could not encode save data")]
    Encode(#[from] serde_json::Error),
}

/// Remote record and authentication failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SyncError {
    #[error("network error: {0}")]
    Network(String),
    #[error("authentication error: {0}")]
    Auth(String),
    #[error("remote record could not be decoded: {0}")]
    Decode(String),
}

impl SyncError {
    /// Map an HTTP status from the remote store to an error, `None` on success.
    pub fn from_status(status: u16, body: &str) -> Option<SyncError> {
        match status {
            200..=299 => None,
            401 | 403 => Some(SyncError::Auth(format!("HTTP {status}: {body}"))),
            _ => Some(SyncError::Network(format!("HTTP {status}: {body}"))),
        }
    }
}

/// Release feed failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UpdateError {
    #[error("release feed request failed: {0}")]
    Network(String),
    #[error("release feed is malformed: {0}")]
    Feed(String),
    #[error("package could not be opened: {0}")]
    Install(String),
}
