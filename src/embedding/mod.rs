//! Text to vector.
//!
//! [`EmbeddingProvider`] is the seam the index and the vector stage depend on.
//! Backends:
//! - [`BertEmbedder`]: local BERT-family model (candle), mean pooled.
//! - [`RemoteEmbedder`]: OpenAI-compatible `/embeddings` endpoint.
//! - [`StubEmbedder`]: deterministic hash vectors, an explicitly logged degraded mode.
//! - [`CachedEmbedder`]: wraps any of the above with a query cache.
//!
//! [`build_embedder`] constructs the configured backend once at startup; the
//! instance is then passed to whatever needs it.

/// Local BERT embedder.
pub mod bert;
mod cache;
/// Device selection (CPU / Metal / CUDA).
pub mod device;
mod error;
mod http;
mod stub;
mod utils;

#[cfg(any(test, feature = "mock"))]
mod mock;


pub use bert::BertEmbedder;
pub use cache::CachedEmbedder;
pub use error::EmbeddingError;
pub use http::{RemoteEmbedder, RemoteEmbedderConfig};
pub use stub::StubEmbedder;

#[cfg(any(test, feature = "mock"))]
pub use mock::MockEmbedder;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::config::{Config, EmbedderKind};
use crate::constants::DEFAULT_EMBEDDING_DIM;

#[async_trait]
/// Deterministic text embedding for a fixed model version.
pub trait EmbeddingProvider: Send + Sync {
    /// Identifies the model version. Persisted with the index so a load under a
    /// different embedder is refused.
    fn id(&self) -> &str;

    /// Length of every vector this provider returns.
    fn dimension(&self) -> usize;

    /// Embeds one text. Failure is reported, never replaced with a zero vector.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Embeds many texts, preserving order.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            out.push(self.embed(text).await?);
        }
        Ok(out)
    }
}

/// Builds the configured embedder, wrapped in the query cache when enabled.
///
/// Returns `Ok(None)` when no embedder is configured.
pub fn build_embedder(
    config: &Config,
) -> Result<Option<Arc<dyn EmbeddingProvider>>, EmbeddingError> {
    let base: Arc<dyn EmbeddingProvider> = match config.embedder {
        EmbedderKind::None => {
            info!("No embedder configured; vector stage disabled");
            return Ok(None);
        }
        EmbedderKind::Stub => {
            let dim = config.embed_dim.unwrap_or(DEFAULT_EMBEDDING_DIM);
            warn!(dim, "Embedder running in STUB mode; vector answers are not semantic");
            Arc::new(StubEmbedder::new(dim))
        }
        EmbedderKind::Local => {
            let dir = config
                .model_dir
                .as_ref()
                .ok_or(EmbeddingError::NotConfigured {
                    reason: "CONCIERGE_MODEL_DIR is not set".to_string(),
                })?;
            Arc::new(BertEmbedder::load(dir)?)
        }
        EmbedderKind::Remote => Arc::new(RemoteEmbedder::new(RemoteEmbedderConfig::from_config(
            config,
        ))?),
    };

    info!(
        embedder = base.id(),
        dimension = base.dimension(),
        cache_capacity = config.embed_cache_capacity,
        "Embedder ready"
    );

    if config.embed_cache_capacity == 0 {
        return Ok(Some(base));
    }
    Ok(Some(Arc::new(CachedEmbedder::new(
        base,
        config.embed_cache_capacity,
    ))))
}

/// Scales `v` to unit length in place. Zero vectors are left alone.
pub fn l2_normalize(v: &mut [f32]) {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}
