use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use super::error::{QueryError, StageError};
use super::stage::{QueryContext, StageHandler};
use super::types::{Payload, SemanticHit, Stage};
use crate::embedding::EmbeddingProvider;
use crate::index::VectorIndex;

/// Nearest-neighbour lookup. Accepts the single closest entry as the answer.
pub struct VectorStage {
    embedder: Option<Arc<dyn EmbeddingProvider>>,
    timeout: Duration,
}

impl VectorStage {
    pub fn new(embedder: Option<Arc<dyn EmbeddingProvider>>, timeout: Duration) -> Self {
        Self { embedder, timeout }
    }
}

#[async_trait]
impl StageHandler for VectorStage {
    fn stage(&self) -> Stage {
        Stage::Vector
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn attempt(&self, ctx: &QueryContext) -> Result<Option<Payload>, StageError> {
        let index = ctx.index();
        if index.is_empty() {
            debug!("Vector index empty; skipping");
            return Ok(None);
        }
        let Some(embedder) = self.embedder.as_deref() else {
            return Err(StageError::Unavailable {
                reason: "no embedder configured".to_string(),
            });
        };
        if embedder.id() != index.embedder_id() {
            return Err(StageError::Unavailable {
                reason: format!(
                    "index built with '{}', embedder is '{}'",
                    index.embedder_id(),
                    embedder.id()
                ),
            });
        }

        let vector = embedder.embed(ctx.query()).await?;
        let nearest = index.search(&vector, 1)?;

        Ok(nearest.first().and_then(|n| {
            index.entry(n.id).map(|entry| Payload::Entry {
                entry: entry.clone(),
                distance: n.distance,
            })
        }))
    }
}

/// Vector-only top-`k` search. Unlike the hybrid query, missing pieces are
/// reported instead of falling through.
pub async fn semantic_search(
    index: &VectorIndex,
    embedder: Option<&dyn EmbeddingProvider>,
    query: &str,
    k: usize,
) -> Result<Vec<SemanticHit>, QueryError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(QueryError::EmptyQuery);
    }
    let embedder = embedder.ok_or(QueryError::EmbedderUnavailable)?;
    if index.is_empty() {
        return Err(QueryError::EmptyIndex);
    }

    let vector = embedder.embed(query).await?;
    let hits = index
        .search(&vector, k)?
        .into_iter()
        .filter_map(|n| {
            index.entry(n.id).map(|entry| SemanticHit {
                id: n.id,
                distance: n.distance,
                entry: entry.clone(),
            })
        })
        .collect();
    Ok(hits)
}
