//! Hybrid query answering.
//!
//! A query runs through an ordered list of [`StageHandler`]s (vector, keyword,
//! generative fallback) and stops at the first one that produces a payload.
//! Failures and timeouts fall through to the next stage; when every stage
//! comes up empty the result is the `NONE` stage with a canned message. Only
//! an empty query is an error.

mod error;
mod generative;
mod keyword;
mod orchestrator;
mod stage;
mod types;
mod vector;


pub use error::{QueryError, StageError};
pub use generative::GenerativeStage;
pub use keyword::{KeywordStage, keyword_match};
pub use orchestrator::{Orchestrator, StageSettings};
pub use stage::{QueryContext, StageHandler};
pub use types::{Payload, QueryResult, SemanticHit, Stage};
pub use vector::{VectorStage, semantic_search};
