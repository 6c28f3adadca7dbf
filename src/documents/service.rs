use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::de::{opt_trimmed_string, string_list, string_or_number};
use crate::constants::DEFAULT_LANGUAGE;

/// Text keyed by language code.
///
/// Deserializes from either a `{"en": "..", "si": ".."}` map or a plain
/// string, which is stored under [`DEFAULT_LANGUAGE`]. Non-string values in a
/// map are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LocalizedText(BTreeMap<String, String>);

impl LocalizedText {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-language text under the default language.
    pub fn plain(text: impl Into<String>) -> Self {
        let mut map = BTreeMap::new();
        map.insert(DEFAULT_LANGUAGE.to_string(), text.into());
        Self(map)
    }

    pub fn with(mut self, lang: impl Into<String>, text: impl Into<String>) -> Self {
        self.0.insert(lang.into(), text.into());
        self
    }

    /// Text for `lang`, or `""` when that language is absent.
    pub fn get(&self, lang: &str) -> &str {
        self.0.get(lang).map(String::as_str).unwrap_or("")
    }

    /// Text for `lang`, falling back to [`DEFAULT_LANGUAGE`] when `lang` has none.
    pub fn get_or_default(&self, lang: &str) -> &str {
        match self.get(lang) {
            "" => self.get(DEFAULT_LANGUAGE),
            text => text,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(|v| v.trim().is_empty())
    }
}

impl<'de> Deserialize<'de> for LocalizedText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let map = match Value::deserialize(deserializer)? {
            Value::String(s) => {
                let mut map = BTreeMap::new();
                map.insert(DEFAULT_LANGUAGE.to_string(), s);
                map
            }
            Value::Object(obj) => obj
                .into_iter()
                .filter_map(|(lang, v)| match v {
                    Value::String(s) => Some((lang, s)),
                    _ => None,
                })
                .collect(),
            _ => BTreeMap::new(),
        };
        Ok(Self(map))
    }
}

/// A government service with its nested question/answer tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceDocument {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub name: LocalizedText,
    #[serde(default)]
    pub description: LocalizedText,
    #[serde(default, deserialize_with = "opt_trimmed_string")]
    pub category: Option<String>,
    #[serde(default)]
    pub subservices: Vec<Subservice>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Subservice {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub name: LocalizedText,
    #[serde(default)]
    pub questions: Vec<QaItem>,
}

/// One question/answer pair plus the optional extras shown alongside it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QaItem {
    #[serde(rename = "q", alias = "question", default)]
    pub question: LocalizedText,
    #[serde(default)]
    pub answer: LocalizedText,
    #[serde(default, deserialize_with = "string_list")]
    pub downloads: Vec<String>,
    #[serde(default, deserialize_with = "opt_trimmed_string")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "opt_trimmed_string")]
    pub instructions: Option<String>,
}
