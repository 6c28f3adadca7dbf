use std::fmt;

use serde::{Deserialize, Serialize};

use crate::corpus::CorpusEntry;
use crate::documents::ServiceDocument;

/// Pipeline step that produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stage {
    Vector,
    Keyword,
    GenerativeFallback,
    None,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Vector => "VECTOR",
            Stage::Keyword => "KEYWORD",
            Stage::GenerativeFallback => "GENERATIVE_FALLBACK",
            Stage::None => "NONE",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Payload {
    /// Nearest corpus entry. `distance` is squared L2; no threshold is applied.
    Entry { entry: CorpusEntry, distance: f32 },
    /// First service document whose name or description contains the query.
    Service { service: ServiceDocument },
    /// Completion text.
    Generated { answer: String },
    NotFound { message: String },
}

impl Payload {
    /// Short answer text, when the payload has one.
    pub fn answer(&self) -> Option<&str> {
        match self {
            Payload::Entry { entry, .. } => Some(&entry.answer),
            Payload::Service { .. } => None,
            Payload::Generated { answer } => Some(answer),
            Payload::NotFound { message } => Some(message),
        }
    }
}

/// Tagged outcome of a query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    pub stage: Stage,
    pub payload: Payload,
}

/// One hit from a vector-only search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SemanticHit {
    pub id: usize,
    pub distance: f32,
    pub entry: CorpusEntry,
}
