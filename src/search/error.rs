use std::time::Duration;

use thiserror::Error;

use super::types::Stage;
use crate::embedding::EmbeddingError;
use crate::generative::GenerativeError;
use crate::index::IndexError;
use crate::store::StoreError;

/// Why a stage produced nothing. Logged by the orchestrator, never returned
/// to the caller of a query.
#[derive(Debug, Error)]
pub enum StageError {
    /// The capability this stage needs is not configured.
    #[error("stage unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("{stage} stage timed out after {after:?}")]
    Timeout { stage: Stage, after: Duration },

    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Generative(#[from] GenerativeError),
}

/// Errors visible to callers of the search entry points.
///
/// The hybrid query path only ever returns [`QueryError::EmptyQuery`]; the
/// other variants come from the vector-only semantic search.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("query text is empty")]
    EmptyQuery,

    #[error("no embedder configured")]
    EmbedderUnavailable,

    #[error("index is empty")]
    EmptyIndex,

    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error(transparent)]
    Index(#[from] IndexError),
}
