use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::de::{lenient_bool, opt_trimmed_string, string_list, string_or_number};

/// A promotional item eligible for recommendation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdCandidate {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(alias = "message", default)]
    pub body: String,
    #[serde(default, deserialize_with = "opt_trimmed_string")]
    pub link: Option<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub target_segments: Vec<String>,
    /// Missing or unparseable timestamps earn no freshness bonus.
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub active: bool,
}

impl AdCandidate {
    /// Generic item returned when nothing else is available.
    pub fn placeholder() -> Self {
        Self {
            id: "default".to_string(),
            title: "Explore Our Services".to_string(),
            body: "Check out popular programs and courses tailored for you".to_string(),
            link: None,
            tags: Vec::new(),
            target_segments: Vec::new(),
            created: None,
            active: true,
        }
    }
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => DateTime::parse_from_rfc3339(s.trim())
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        serde_json::Value::Number(n) => n
            .as_i64()
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0)),
        _ => None,
    })
}
