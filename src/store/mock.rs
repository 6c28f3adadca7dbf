//! Store double whose every lookup fails.

use async_trait::async_trait;

use super::{DocumentStore, StoreError, StoreResult};
use crate::documents::{AdCandidate, EngagementEvent, ServiceDocument, UserProfile};

/// A [`DocumentStore`] that is always unavailable.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingStore;

impl FailingStore {
    fn err<T>() -> StoreResult<T> {
        Err(StoreError::Unavailable("failing store".to_string()))
    }
}

#[async_trait]
impl DocumentStore for FailingStore {
    async fn services(&self) -> StoreResult<Vec<ServiceDocument>> {
        Self::err()
    }

    async fn user_profile(&self, _user_id: &str) -> StoreResult<Option<UserProfile>> {
        Self::err()
    }

    async fn engagements(&self, _user_id: &str) -> StoreResult<Vec<EngagementEvent>> {
        Self::err()
    }

    async fn active_ads(&self) -> StoreResult<Vec<AdCandidate>> {
        Self::err()
    }

    async fn append_engagement(&self, _event: EngagementEvent) -> StoreResult<()> {
        Self::err()
    }
}
