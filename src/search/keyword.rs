use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use super::error::StageError;
use super::stage::{QueryContext, StageHandler};
use super::types::{Payload, Stage};
use crate::documents::ServiceDocument;

/// First document whose name or description contains `query`, ignoring case.
///
/// Fields without `lang` text are read in the default language. Document
/// order decides; there is no ranking between matches.
pub fn keyword_match<'a>(
    documents: &'a [ServiceDocument],
    query: &str,
    lang: &str,
) -> Option<&'a ServiceDocument> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }
    documents.iter().find(|doc| {
        [doc.name.get_or_default(lang), doc.description.get_or_default(lang)]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    })
}

/// Substring lookup over raw service documents.
#[derive(Debug, Clone)]
pub struct KeywordStage {
    timeout: Duration,
}

impl KeywordStage {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl StageHandler for KeywordStage {
    fn stage(&self) -> Stage {
        Stage::Keyword
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn attempt(&self, ctx: &QueryContext) -> Result<Option<Payload>, StageError> {
        let documents = ctx.documents().await?;
        let hit = keyword_match(documents, ctx.query(), ctx.language());
        debug!(
            documents = documents.len(),
            matched = hit.map(|d| d.id.as_str()),
            "Keyword scan complete"
        );
        Ok(hit.map(|doc| Payload::Service {
            service: doc.clone(),
        }))
    }
}
