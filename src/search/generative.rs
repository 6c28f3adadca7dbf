use std::borrow::Cow;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::error::StageError;
use super::stage::{QueryContext, StageHandler};
use super::types::{Payload, Stage};
use crate::corpus::{CorpusEntry, bounded_context, build_corpus};
use crate::generative::{CompletionPrompt, GenerativeProvider};

/// One grounded completion over a bounded slice of the corpus.
pub struct GenerativeStage {
    generator: Option<Arc<dyn GenerativeProvider>>,
    context_pairs: usize,
    timeout: Duration,
}

impl GenerativeStage {
    pub fn new(
        generator: Option<Arc<dyn GenerativeProvider>>,
        context_pairs: usize,
        timeout: Duration,
    ) -> Self {
        Self {
            generator,
            context_pairs,
            timeout,
        }
    }

    /// Entries from the served index, or freshly built from the documents
    /// when the index is empty.
    async fn corpus<'a>(&self, ctx: &'a QueryContext) -> Cow<'a, [CorpusEntry]> {
        if !ctx.index().is_empty() {
            return Cow::Borrowed(ctx.index().entries());
        }
        match ctx.documents().await {
            Ok(docs) => Cow::Owned(build_corpus(docs, ctx.language())),
            Err(e) => {
                warn!(error = %e, "No documents for generative context; asking without");
                Cow::Owned(Vec::new())
            }
        }
    }
}

#[async_trait]
impl StageHandler for GenerativeStage {
    fn stage(&self) -> Stage {
        Stage::GenerativeFallback
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn attempt(&self, ctx: &QueryContext) -> Result<Option<Payload>, StageError> {
        let Some(generator) = self.generator.as_deref() else {
            return Err(StageError::Unavailable {
                reason: "no generative model configured".to_string(),
            });
        };

        let corpus = self.corpus(ctx).await;
        let context = bounded_context(&corpus, self.context_pairs);
        let prompt = CompletionPrompt::grounded(ctx.query(), context);
        debug!(
            context_pairs = context.len(),
            model = generator.model(),
            "Requesting grounded completion"
        );

        let answer = generator.complete(&prompt).await?;
        Ok(Some(Payload::Generated { answer }))
    }
}
