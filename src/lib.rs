//! Concierge library crate (used by the server and integration tests).
//!
//! # Public API Surface
//!
//! - [`Config`], [`ConfigError`] - environment-backed configuration
//! - [`Concierge`] - facade over every operation below
//!
//! ## Query answering
//! - [`Orchestrator`] runs the ordered stages (vector, keyword, generative
//!   fallback) and returns a tagged [`QueryResult`]
//! - [`VectorIndex`] / [`IndexManager`] - flat L2 index, persisted as an
//!   rkyv vector file plus JSON metadata, swapped atomically on rebuild
//! - [`EmbeddingProvider`] and [`GenerativeProvider`] are the seams for the
//!   external model capabilities
//!
//! ## Personalization
//! - [`Segment`], [`segment_profile`] - rule-based profile tags
//! - [`rank`], [`RankingWeights`] - candidate scoring with placeholder fallback
//! - [`education_recommendations`]
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod config;
pub mod constants;
pub mod corpus;
pub mod documents;
pub mod embedding;
pub mod gateway;
pub mod generative;
pub mod hashing;
pub mod index;
pub mod personalize;
pub mod search;
pub mod service;
pub mod store;

pub use config::{Config, ConfigError, EmbedderKind};
pub use constants::{DimValidationError, validate_embedding_dim};
pub use corpus::{CorpusEntry, build_corpus};
pub use documents::{AdCandidate, EngagementEvent, ServiceDocument, UserProfile};
pub use embedding::{EmbeddingError, EmbeddingProvider, build_embedder};
#[cfg(any(test, feature = "mock"))]
pub use embedding::MockEmbedder;
pub use generative::{GenerativeError, GenerativeProvider, build_generator};
#[cfg(any(test, feature = "mock"))]
pub use generative::MockGenerator;
pub use index::{IndexError, IndexManager, IndexStatus, VectorIndex};
pub use personalize::{
    EducationRecommendation, RankingWeights, Recommendation, Segment, education_recommendations,
    rank, segment_profile,
};
pub use search::{Orchestrator, Payload, QueryError, QueryResult, SemanticHit, Stage};
pub use service::{Concierge, ServiceError};
pub use store::{DocumentStore, MemoryStore, SeedData, StoreError};
#[cfg(any(test, feature = "mock"))]
pub use store::FailingStore;
