//! Document store errors.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by a [`super::DocumentStore`] backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read seed file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse seed file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Backend could not serve the request.
    #[error("document store unavailable: {0}")]
    Unavailable(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
