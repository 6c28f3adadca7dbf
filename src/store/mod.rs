//! Read access to the external document store, plus the engagement log append.
//!
//! The storage engine is somebody else's concern; this crate only needs key and
//! range lookups. [`MemoryStore`] backs the binary (optionally seeded from JSON)
//! and the tests.

pub mod error;
mod memory;

#[cfg(any(test, feature = "mock"))]
mod mock;


pub use error::{StoreError, StoreResult};
pub use memory::{MemoryStore, SeedData};

#[cfg(any(test, feature = "mock"))]
pub use mock::FailingStore;

use async_trait::async_trait;

use crate::documents::{AdCandidate, EngagementEvent, ServiceDocument, UserProfile};

#[async_trait]
/// Lookups the query and personalization paths depend on.
pub trait DocumentStore: Send + Sync {
    /// Every service document, in store order.
    async fn services(&self) -> StoreResult<Vec<ServiceDocument>>;

    /// Profile for `user_id`, or `None` when no such user exists.
    async fn user_profile(&self, user_id: &str) -> StoreResult<Option<UserProfile>>;

    /// Engagement history for `user_id`, oldest first.
    async fn engagements(&self, user_id: &str) -> StoreResult<Vec<EngagementEvent>>;

    /// Candidates with `active == true`, in pool order.
    async fn active_ads(&self) -> StoreResult<Vec<AdCandidate>>;

    /// Appends one event to the log. Independent of every other record.
    async fn append_engagement(&self, event: EngagementEvent) -> StoreResult<()>;
}
