//! Cross-cutting, shared constants.
//!
//! Runtime overrides live in [`crate::config`]; these are the defaults every
//! module agrees on when nothing is configured.

use std::time::Duration;

/// Language used for corpus text and keyword fields when none is configured.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Output dimension of the default local embedder (MiniLM family).
pub const DEFAULT_EMBEDDING_DIM: usize = 384;

/// Token limit applied by the local embedder before the forward pass.
pub const DEFAULT_MAX_SEQ_LEN: usize = 256;

/// Cap on question/answer pairs handed to the generative stage.
pub const DEFAULT_CONTEXT_PAIRS: usize = 20;

/// Completion budget for the generative stage.
pub const DEFAULT_COMPLETION_MAX_TOKENS: u32 = 150;

pub const DEFAULT_VECTOR_TIMEOUT: Duration = Duration::from_millis(5_000);
pub const DEFAULT_KEYWORD_TIMEOUT: Duration = Duration::from_millis(2_000);
pub const DEFAULT_GENERATIVE_TIMEOUT: Duration = Duration::from_millis(20_000);

/// Per-request budget for remote embedding calls, sized for index rebuild batches.
pub const DEFAULT_EMBED_TIMEOUT: Duration = Duration::from_millis(30_000);

/// Inputs per remote `/embeddings` request.
pub const DEFAULT_EMBED_BATCH_SIZE: usize = 64;

/// Answer returned when every stage came up empty.
pub const NO_RESULT_MESSAGE: &str = "No relevant information found.";

/// System prompt for grounded completions.
pub const ASSISTANT_SYSTEM_PROMPT: &str =
    "You are a helpful assistant that answers citizen queries briefly and accurately.";

/// Vector-store file inside the index directory.
pub const VECTOR_FILE_NAME: &str = "vectors.rkyv";

/// Ordered-metadata file inside the index directory.
pub const METADATA_FILE_NAME: &str = "metadata.json";

/// Bumped whenever the persisted pair changes shape.
pub const INDEX_FORMAT_VERSION: u32 = 1;

/// Default number of recommendations returned per call.
pub const DEFAULT_RECOMMENDATION_LIMIT: usize = 5;

/// Default capacity of the query-embedding cache.
pub const DEFAULT_EMBED_CACHE_CAPACITY: u64 = 4_096;

/// Validates that a vector produced at query time matches the index dimension.
///
/// ```
/// use concierge::constants::{validate_embedding_dim, DEFAULT_EMBEDDING_DIM};
///
/// validate_embedding_dim(384, DEFAULT_EMBEDDING_DIM).unwrap();
/// assert!(validate_embedding_dim(768, DEFAULT_EMBEDDING_DIM).is_err());
/// ```
pub fn validate_embedding_dim(actual: usize, expected: usize) -> Result<(), DimValidationError> {
    if expected == 0 {
        return Err(DimValidationError::ZeroDimension);
    }
    if actual != expected {
        return Err(DimValidationError::DimensionMismatch { expected, actual });
    }
    Ok(())
}

/// Error returned when dimension validation fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DimValidationError {
    /// Embedding dimension cannot be zero.
    ZeroDimension,
    /// Runtime dimension does not match expected dimension.
    DimensionMismatch { expected: usize, actual: usize },
}

impl std::fmt::Display for DimValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroDimension => write!(f, "embedding dimension cannot be zero"),
            Self::DimensionMismatch { expected, actual } => {
                write!(
                    f,
                    "dimension mismatch: expected {}, got {}",
                    expected, actual
                )
            }
        }
    }
}

impl std::error::Error for DimValidationError {}
