use async_trait::async_trait;
use tracing::debug;

use super::error::EmbeddingError;
use super::{EmbeddingProvider, l2_normalize};
use crate::hashing::hash_text;

/// Deterministic pseudo-embeddings seeded from a BLAKE3 hash of the text.
///
/// Identical text always maps to the identical unit vector, so exact repeats
/// of an indexed entry still find it. Nothing else about the geometry means
/// anything.
#[derive(Debug, Clone)]
pub struct StubEmbedder {
    dimension: usize,
    id: String,
}

impl StubEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            id: format!("stub:{dimension}"),
        }
    }

    pub(crate) fn vector_for(text: &str, dimension: usize) -> Vec<f32> {
        let digest = hash_text(text);
        let mut seed_bytes = [0u8; 8];
        seed_bytes.copy_from_slice(&digest[..8]);
        let mut state = u64::from_le_bytes(seed_bytes);

        let mut v = Vec::with_capacity(dimension);
        for _ in 0..dimension {
            state = state
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            v.push(((state >> 32) as f32 / u32::MAX as f32) * 2.0 - 1.0);
        }
        l2_normalize(&mut v);
        v
    }
}

#[async_trait]
impl EmbeddingProvider for StubEmbedder {
    fn id(&self) -> &str {
        &self.id
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        debug!(text_len = text.len(), "Generating stub embedding");
        Ok(Self::vector_for(text, self.dimension))
    }
}
