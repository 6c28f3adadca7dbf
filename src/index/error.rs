//! Vector index errors.

use std::path::PathBuf;
use thiserror::Error;

use crate::embedding::EmbeddingError;

#[derive(Debug, Error)]
pub enum IndexError {
    /// A build was asked to index zero entries.
    #[error("corpus is empty; nothing to index")]
    EmptyCorpus,

    /// Search was asked of an index with no entries.
    #[error("index is empty")]
    Empty,

    /// No embedder is configured, so nothing can be built or searched.
    #[error("no embedder configured")]
    EmbedderUnavailable,

    #[error("embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("vector dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Vector rows and metadata entries disagree in count.
    #[error("index length mismatch: {vectors} vectors for {entries} entries")]
    LengthMismatch { vectors: usize, entries: usize },

    #[error("index file not found: {path}")]
    NotFound { path: PathBuf },

    /// Persisted pair failed validation.
    #[error("corrupt index at {path}: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    /// Persisted pair was built by a different embedder.
    #[error("index built with embedder '{found}', current embedder is '{expected}'")]
    EmbedderMismatch { expected: String, found: String },

    #[error("index rebuild already in progress")]
    RebuildInProgress,

    #[error("index serialization failed: {0}")]
    Serialization(String),

    #[error("index I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type IndexResult<T> = Result<T, IndexError>;
