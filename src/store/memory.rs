use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::info;

use super::{DocumentStore, StoreError, StoreResult};
use crate::documents::{AdCandidate, EngagementEvent, ServiceDocument, UserProfile};

/// On-disk seed shape for [`MemoryStore`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub services: Vec<ServiceDocument>,
    #[serde(default)]
    pub users: Vec<UserProfile>,
    #[serde(default)]
    pub engagements: Vec<EngagementEvent>,
    #[serde(default)]
    pub ads: Vec<AdCandidate>,
}

/// In-process document store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RwLock<SeedData>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_seed(seed: SeedData) -> Self {
        Self {
            data: RwLock::new(seed),
        }
    }

    /// Loads a JSON seed file. Malformed optional fields are defaulted by the
    /// record types; only unreadable or non-JSON files fail.
    pub async fn from_seed_file(path: &Path) -> StoreResult<Self> {
        let bytes = tokio::fs::read(path).await.map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let seed: SeedData =
            serde_json::from_slice(&bytes).map_err(|source| StoreError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        info!(
            path = %path.display(),
            services = seed.services.len(),
            users = seed.users.len(),
            ads = seed.ads.len(),
            "Loaded document seed"
        );
        Ok(Self::from_seed(seed))
    }

    pub async fn replace_services(&self, services: Vec<ServiceDocument>) {
        self.data.write().await.services = services;
    }

    pub async fn upsert_user(&self, profile: UserProfile) {
        let mut data = self.data.write().await;
        match data.users.iter_mut().find(|u| u.id == profile.id) {
            Some(existing) => *existing = profile,
            None => data.users.push(profile),
        }
    }

    pub async fn push_ad(&self, ad: AdCandidate) {
        self.data.write().await.ads.push(ad);
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn services(&self) -> StoreResult<Vec<ServiceDocument>> {
        Ok(self.data.read().await.services.clone())
    }

    async fn user_profile(&self, user_id: &str) -> StoreResult<Option<UserProfile>> {
        Ok(self
            .data
            .read()
            .await
            .users
            .iter()
            .find(|u| u.id == user_id)
            .cloned())
    }

    async fn engagements(&self, user_id: &str) -> StoreResult<Vec<EngagementEvent>> {
        Ok(self
            .data
            .read()
            .await
            .engagements
            .iter()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn active_ads(&self) -> StoreResult<Vec<AdCandidate>> {
        Ok(self
            .data
            .read()
            .await
            .ads
            .iter()
            .filter(|ad| ad.active)
            .cloned()
            .collect())
    }

    async fn append_engagement(&self, event: EngagementEvent) -> StoreResult<()> {
        self.data.write().await.engagements.push(event);
        Ok(())
    }
}
