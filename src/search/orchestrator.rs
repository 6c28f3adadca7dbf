use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, instrument, warn};

use super::error::{QueryError, StageError};
use super::generative::GenerativeStage;
use super::keyword::KeywordStage;
use super::stage::{QueryContext, StageHandler};
use super::types::{Payload, QueryResult, Stage};
use super::vector::VectorStage;
use crate::config::Config;
use crate::constants::NO_RESULT_MESSAGE;
use crate::embedding::EmbeddingProvider;
use crate::generative::GenerativeProvider;
use crate::index::IndexManager;
use crate::store::DocumentStore;

/// Knobs for the standard stage chain.
#[derive(Debug, Clone)]
pub struct StageSettings {
    pub language: String,
    pub vector_timeout: Duration,
    pub keyword_timeout: Duration,
    pub generative_timeout: Duration,
    pub context_pairs: usize,
}

impl StageSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            language: config.language.clone(),
            vector_timeout: config.vector_timeout,
            keyword_timeout: config.keyword_timeout,
            generative_timeout: config.generative_timeout,
            context_pairs: config.context_pairs,
        }
    }
}

impl Default for StageSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Runs stages in order and returns the first payload produced.
pub struct Orchestrator {
    stages: Vec<Box<dyn StageHandler>>,
    index: Arc<IndexManager>,
    store: Arc<dyn DocumentStore>,
    language: String,
}

impl Orchestrator {
    pub fn new(
        stages: Vec<Box<dyn StageHandler>>,
        index: Arc<IndexManager>,
        store: Arc<dyn DocumentStore>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            stages,
            index,
            store,
            language: language.into(),
        }
    }

    /// Vector, then keyword, then generative fallback.
    pub fn standard(
        index: Arc<IndexManager>,
        store: Arc<dyn DocumentStore>,
        embedder: Option<Arc<dyn EmbeddingProvider>>,
        generator: Option<Arc<dyn GenerativeProvider>>,
        settings: StageSettings,
    ) -> Self {
        let stages: Vec<Box<dyn StageHandler>> = vec![
            Box::new(VectorStage::new(embedder, settings.vector_timeout)),
            Box::new(KeywordStage::new(settings.keyword_timeout)),
            Box::new(GenerativeStage::new(
                generator,
                settings.context_pairs,
                settings.generative_timeout,
            )),
        ];
        Self::new(stages, index, store, settings.language)
    }

    pub fn stages(&self) -> impl Iterator<Item = Stage> + '_ {
        self.stages.iter().map(|s| s.stage())
    }

    /// Answers `query` through the full chain.
    #[instrument(skip(self, query), fields(query_len = query.len()))]
    pub async fn query(&self, query: &str) -> Result<QueryResult, QueryError> {
        self.run(query, |_| true).await
    }

    /// Answers `query` with the generative stage alone.
    #[instrument(skip(self, query), fields(query_len = query.len()))]
    pub async fn ask(&self, query: &str) -> Result<QueryResult, QueryError> {
        self.run(query, |stage| stage == Stage::GenerativeFallback)
            .await
    }

    async fn run(
        &self,
        query: &str,
        include: impl Fn(Stage) -> bool,
    ) -> Result<QueryResult, QueryError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(QueryError::EmptyQuery);
        }

        let ctx = QueryContext::new(
            query,
            self.language.as_str(),
            self.index.snapshot(),
            Arc::clone(&self.store),
        );

        for handler in self.stages.iter().filter(|h| include(h.stage())) {
            let stage = handler.stage();
            let outcome = match tokio::time::timeout(handler.timeout(), handler.attempt(&ctx)).await
            {
                Ok(outcome) => outcome,
                Err(_) => Err(StageError::Timeout {
                    stage,
                    after: handler.timeout(),
                }),
            };

            match outcome {
                Ok(Some(payload)) => {
                    info!(stage = %stage, "Query answered");
                    return Ok(QueryResult { stage, payload });
                }
                Ok(None) => debug!(stage = %stage, "Stage produced nothing; falling through"),
                Err(StageError::Unavailable { reason }) => {
                    debug!(stage = %stage, %reason, "Stage unavailable; falling through")
                }
                Err(e) => warn!(stage = %stage, error = %e, "Stage failed; falling through"),
            }
        }

        info!("No stage produced an answer");
        Ok(QueryResult {
            stage: Stage::None,
            payload: Payload::NotFound {
                message: NO_RESULT_MESSAGE.to_string(),
            },
        })
    }
}
