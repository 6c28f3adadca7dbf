use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::documents::UserProfile;

/// Personalization tag derived from a profile. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Segment {
    YoungAdult,
    EarlyCareer,
    MidCareerFamily,
    EstablishedProfessional,
    Senior,
    NeedsQualification,
    MidEducation,
    HighlyEducated,
    Parent,
    PrimarySchoolParent,
    SecondarySchoolParent,
    UniversityAgeParent,
    GovernmentEmployee,
    Management,
    /// The profile could not be looked up.
    Unknown,
}

impl Segment {
    pub const ALL: [Segment; 15] = [
        Segment::YoungAdult,
        Segment::EarlyCareer,
        Segment::MidCareerFamily,
        Segment::EstablishedProfessional,
        Segment::Senior,
        Segment::NeedsQualification,
        Segment::MidEducation,
        Segment::HighlyEducated,
        Segment::Parent,
        Segment::PrimarySchoolParent,
        Segment::SecondarySchoolParent,
        Segment::UniversityAgeParent,
        Segment::GovernmentEmployee,
        Segment::Management,
        Segment::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Segment::YoungAdult => "young_adult",
            Segment::EarlyCareer => "early_career",
            Segment::MidCareerFamily => "mid_career_family",
            Segment::EstablishedProfessional => "established_professional",
            Segment::Senior => "senior",
            Segment::NeedsQualification => "needs_qualification",
            Segment::MidEducation => "mid_education",
            Segment::HighlyEducated => "highly_educated",
            Segment::Parent => "parent",
            Segment::PrimarySchoolParent => "primary_school_parent",
            Segment::SecondarySchoolParent => "secondary_school_parent",
            Segment::UniversityAgeParent => "university_age_parent",
            Segment::GovernmentEmployee => "government_employee",
            Segment::Management => "management",
            Segment::Unknown => "unknown",
        }
    }

    /// Tag for a single age, inclusive bounds.
    pub fn for_age(age: i64) -> Segment {
        match age {
            ..=24 => Segment::YoungAdult,
            25..=35 => Segment::EarlyCareer,
            36..=45 => Segment::MidCareerFamily,
            46..=60 => Segment::EstablishedProfessional,
            _ => Segment::Senior,
        }
    }

    /// Tag for an education level; unrecognized levels map to nothing.
    pub fn for_education(level: &str) -> Option<Segment> {
        match level.trim().to_lowercase().as_str() {
            "none" | "school" | "ol" => Some(Segment::NeedsQualification),
            "al" | "diploma" => Some(Segment::MidEducation),
            "degree" | "masters" | "phd" => Some(Segment::HighlyEducated),
            _ => None,
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Segment {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Segment::ALL
            .into_iter()
            .find(|seg| seg.as_str() == s)
            .ok_or(())
    }
}

/// Child age bands and the tag each earns, inclusive bounds.
const CHILD_BANDS: [(i64, i64, Segment); 3] = [
    (5, 10, Segment::PrimarySchoolParent),
    (11, 16, Segment::SecondarySchoolParent),
    (17, 20, Segment::UniversityAgeParent),
];

const MANAGEMENT_WORDS: [&str; 3] = ["manager", "director", "head"];

/// Applies every rule independently and unions the results.
pub fn segment_profile(profile: &UserProfile) -> BTreeSet<Segment> {
    let mut segments = BTreeSet::new();

    if let Some(age) = profile.age {
        segments.insert(Segment::for_age(age));
    }

    if let Some(seg) = profile.education.as_deref().and_then(Segment::for_education) {
        segments.insert(seg);
    }

    let children = &profile.family.children;
    if !children.is_empty() {
        segments.insert(Segment::Parent);
    }
    for (low, high, seg) in CHILD_BANDS {
        if children
            .iter()
            .filter_map(|c| c.age)
            .any(|age| (low..=high).contains(&age))
        {
            segments.insert(seg);
        }
    }

    let job = profile.job_lower();
    if job.contains("government") {
        segments.insert(Segment::GovernmentEmployee);
    }
    if MANAGEMENT_WORDS.iter().any(|w| job.contains(w)) {
        segments.insert(Segment::Management);
    }

    segments
}

/// The set returned when a profile cannot be found.
pub fn unknown_segments() -> BTreeSet<Segment> {
    BTreeSet::from([Segment::Unknown])
}
