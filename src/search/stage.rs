use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::OnceCell;

use super::error::StageError;
use super::types::{Payload, Stage};
use crate::documents::ServiceDocument;
use crate::index::VectorIndex;
use crate::store::{DocumentStore, StoreError};

/// Everything a stage may read while answering one query.
///
/// The index snapshot is fixed when the context is created, so a rebuild
/// finishing mid-query is not observed. Service documents are fetched at most
/// once per query and shared between stages.
pub struct QueryContext {
    query: String,
    language: String,
    index: Arc<VectorIndex>,
    store: Arc<dyn DocumentStore>,
    documents: OnceCell<Vec<ServiceDocument>>,
}

impl QueryContext {
    pub fn new(
        query: impl Into<String>,
        language: impl Into<String>,
        index: Arc<VectorIndex>,
        store: Arc<dyn DocumentStore>,
    ) -> Self {
        Self {
            query: query.into(),
            language: language.into(),
            index,
            store,
            documents: OnceCell::new(),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn index(&self) -> &VectorIndex {
        &self.index
    }

    pub async fn documents(&self) -> Result<&[ServiceDocument], StoreError> {
        let docs = self
            .documents
            .get_or_try_init(|| async { self.store.services().await })
            .await?;
        Ok(docs.as_slice())
    }
}

#[async_trait]
/// One step of the fallback chain.
pub trait StageHandler: Send + Sync {
    fn stage(&self) -> Stage;

    /// Upper bound on one attempt; exceeding it counts as a failure.
    fn timeout(&self) -> Duration;

    /// `Ok(None)` means "nothing usable here, try the next stage".
    async fn attempt(&self, ctx: &QueryContext) -> Result<Option<Payload>, StageError>;
}
