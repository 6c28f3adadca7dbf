use std::sync::Arc;

use async_trait::async_trait;
use moka::sync::Cache;
use tracing::trace;

use super::EmbeddingProvider;
use super::error::EmbeddingError;
use crate::hashing::hash_scoped;

/// Memoizes single-text embeddings, keyed by BLAKE3(embedder id, text).
///
/// Batch calls (index builds) bypass the cache.
pub struct CachedEmbedder {
    inner: Arc<dyn EmbeddingProvider>,
    cache: Cache<[u8; 32], Arc<Vec<f32>>>,
}

impl CachedEmbedder {
    pub fn new(inner: Arc<dyn EmbeddingProvider>, capacity: u64) -> Self {
        Self {
            inner,
            cache: Cache::new(capacity),
        }
    }

    pub fn entry_count(&self) -> u64 {
        self.cache.run_pending_tasks();
        self.cache.entry_count()
    }
}

#[async_trait]
impl EmbeddingProvider for CachedEmbedder {
    fn id(&self) -> &str {
        self.inner.id()
    }

    fn dimension(&self) -> usize {
        self.inner.dimension()
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let key = hash_scoped(self.inner.id(), text);
        if let Some(hit) = self.cache.get(&key) {
            trace!("Query embedding cache hit");
            return Ok(hit.as_ref().clone());
        }

        let vector = self.inner.embed(text).await?;
        self.cache.insert(key, Arc::new(vector.clone()));
        Ok(vector)
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        self.inner.embed_batch(texts).await
    }
}
