//! The [`Concierge`] facade: one handle over the store, the served index, the
//! query pipeline and the personalization rules.

mod error;


pub use error::{ServiceError, ServiceResult};

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::config::Config;
use crate::corpus::build_corpus;
use crate::documents::EngagementEvent;
use crate::embedding::{EmbeddingProvider, build_embedder};
use crate::generative::{GenerativeProvider, build_generator};
use crate::index::{IndexError, IndexManager, IndexStatus};
use crate::personalize::{
    EducationRecommendation, Personalizer, RankingWeights, Recommendation, Segment,
};
use crate::search::{
    Orchestrator, QueryError, QueryResult, SemanticHit, StageSettings, semantic_search,
};
use crate::store::{DocumentStore, MemoryStore};

pub struct Concierge {
    store: Arc<dyn DocumentStore>,
    index: Arc<IndexManager>,
    embedder: Option<Arc<dyn EmbeddingProvider>>,
    generator: Option<Arc<dyn GenerativeProvider>>,
    orchestrator: Orchestrator,
    personalizer: Personalizer,
    language: String,
}

impl Concierge {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        index: Arc<IndexManager>,
        embedder: Option<Arc<dyn EmbeddingProvider>>,
        generator: Option<Arc<dyn GenerativeProvider>>,
        settings: StageSettings,
        weights: RankingWeights,
    ) -> Self {
        let language = settings.language.clone();
        let orchestrator = Orchestrator::standard(
            Arc::clone(&index),
            Arc::clone(&store),
            embedder.clone(),
            generator.clone(),
            settings,
        );
        let personalizer = Personalizer::new(Arc::clone(&store), weights);

        Self {
            store,
            index,
            embedder,
            generator,
            orchestrator,
            personalizer,
            language,
        }
    }

    /// Wires every component from `config`.
    ///
    /// A seed file that cannot be read is an error. An embedder that fails to
    /// load is not: the vector stage is disabled and the rest keeps working.
    pub async fn from_config(config: &Config) -> ServiceResult<Self> {
        let store = match &config.seed_path {
            Some(path) => MemoryStore::from_seed_file(path).await?,
            None => {
                info!("No seed configured; starting with an empty document store");
                MemoryStore::new()
            }
        };

        let embedder = match build_embedder(config) {
            Ok(embedder) => embedder,
            Err(e) => {
                warn!(error = %e, "Embedder failed to load; vector stage disabled");
                None
            }
        };
        let generator = build_generator(config);

        let dir = config.index_dir.clone();
        let expected = embedder.as_ref().map(|e| e.id().to_string());
        let index = tokio::task::spawn_blocking(move || {
            IndexManager::open(dir, expected.as_deref())
        })
        .await
        .map_err(|e| IndexError::Io(std::io::Error::other(e)))?;

        Ok(Self::new(
            Arc::new(store),
            Arc::new(index),
            embedder,
            generator,
            StageSettings::from_config(config),
            config.ranking,
        ))
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    pub fn index(&self) -> &Arc<IndexManager> {
        &self.index
    }

    pub fn embedder_id(&self) -> Option<&str> {
        self.embedder.as_deref().map(|e| e.id())
    }

    pub fn generative_model(&self) -> Option<&str> {
        self.generator.as_deref().map(|g| g.model())
    }

    /// Re-derives the corpus from every service document and swaps in a fresh
    /// index. The previous index keeps serving if anything fails.
    #[instrument(skip(self))]
    pub async fn rebuild_index(&self) -> ServiceResult<IndexStatus> {
        let embedder = self
            .embedder
            .as_deref()
            .ok_or(IndexError::EmbedderUnavailable)?;

        let services = self.store.services().await?;
        let entries = build_corpus(&services, &self.language);
        info!(
            services = services.len(),
            entries = entries.len(),
            "Rebuilding index"
        );

        Ok(self.index.rebuild(entries, embedder).await?)
    }

    pub fn index_status(&self) -> IndexStatus {
        self.index.status()
    }

    pub async fn query(&self, text: &str) -> Result<QueryResult, QueryError> {
        self.orchestrator.query(text).await
    }

    pub async fn ask(&self, text: &str) -> Result<QueryResult, QueryError> {
        self.orchestrator.ask(text).await
    }

    /// The `k` nearest corpus entries, closest first.
    #[instrument(skip(self, text), fields(query_len = text.len()))]
    pub async fn semantic_search(
        &self,
        text: &str,
        k: usize,
    ) -> Result<Vec<SemanticHit>, QueryError> {
        let snapshot = self.index.snapshot();
        semantic_search(&snapshot, self.embedder.as_deref(), text, k).await
    }

    pub async fn segments(&self, user_id: &str) -> BTreeSet<Segment> {
        self.personalizer.segments(user_id).await
    }

    pub async fn recommend(&self, user_id: &str, limit: usize) -> Vec<Recommendation> {
        self.personalizer.recommend(user_id, limit).await
    }

    pub async fn education_recommendations(&self, user_id: &str) -> Vec<EducationRecommendation> {
        self.personalizer.education(user_id).await
    }

    /// Appends one event; the user id is trimmed and must not be blank.
    #[instrument(skip(self, event), fields(event_type = %event.event_type))]
    pub async fn record_engagement(&self, mut event: EngagementEvent) -> ServiceResult<()> {
        event.user_id = event.user_id.trim().to_string();
        if event.user_id.is_empty() {
            return Err(ServiceError::InvalidEvent("user_id is required".to_string()));
        }
        self.store.append_engagement(event).await?;
        Ok(())
    }
}
