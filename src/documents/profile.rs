use serde::{Deserialize, Serialize};

use super::de::{lenient_age, lenient_bool, opt_trimmed_string, string_or_number};

/// Citizen profile used by the personalization rules. Read-only here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
    /// `None` when the stored age is missing or not a number.
    #[serde(default, deserialize_with = "lenient_age")]
    pub age: Option<i64>,
    #[serde(default, deserialize_with = "opt_trimmed_string")]
    pub education: Option<String>,
    #[serde(default, deserialize_with = "opt_trimmed_string")]
    pub job: Option<String>,
    #[serde(default)]
    pub family: FamilyProfile,
    #[serde(default)]
    pub consent: ConsentFlags,
}

impl UserProfile {
    /// Lowercased education level, if any.
    pub fn education_level(&self) -> Option<String> {
        self.education.as_deref().map(str::to_lowercase)
    }

    /// Lowercased job title, or `""`.
    pub fn job_lower(&self) -> String {
        self.job.as_deref().unwrap_or("").to_lowercase()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyProfile {
    #[serde(default)]
    pub children: Vec<ChildProfile>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildProfile {
    #[serde(default, deserialize_with = "opt_trimmed_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_age")]
    pub age: Option<i64>,
    #[serde(default, deserialize_with = "opt_trimmed_string")]
    pub education: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentFlags {
    #[serde(default, deserialize_with = "lenient_bool")]
    pub personalization: bool,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub marketing: bool,
}
