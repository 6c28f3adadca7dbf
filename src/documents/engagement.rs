use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::de::{opt_trimmed_string, string_list, string_or_number};

/// A recorded user interaction. Source of interest tags for ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementEvent {
    #[serde(default, deserialize_with = "string_or_number")]
    pub user_id: String,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type", alias = "event_type", default)]
    pub event_type: String,
    #[serde(default, deserialize_with = "opt_trimmed_string")]
    pub service: Option<String>,
    #[serde(default, deserialize_with = "opt_trimmed_string")]
    pub question_clicked: Option<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub desires: Vec<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub search_terms: Vec<String>,
    #[serde(default, deserialize_with = "opt_trimmed_string")]
    pub ad: Option<String>,
    #[serde(default, deserialize_with = "opt_trimmed_string")]
    pub source: Option<String>,
}

impl EngagementEvent {
    pub fn new(user_id: impl Into<String>, event_type: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            timestamp: Utc::now(),
            event_type: event_type.into(),
            service: None,
            question_clicked: None,
            desires: Vec::new(),
            search_terms: Vec::new(),
            ad: None,
            source: None,
        }
    }

    /// Interest tags carried by this event: desires, clicked question, service.
    pub fn interest_tags(&self) -> impl Iterator<Item = &str> {
        self.desires
            .iter()
            .map(String::as_str)
            .chain(self.question_clicked.as_deref())
            .chain(self.service.as_deref())
    }
}
