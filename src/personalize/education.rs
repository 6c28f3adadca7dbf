use serde::Serialize;

use crate::documents::UserProfile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EducationKind {
    /// For the user themself.
    Education,
    /// For one of the user's children.
    ChildEducation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EducationRecommendation {
    #[serde(rename = "type")]
    pub kind: EducationKind,
    pub title: &'static str,
    pub message: &'static str,
    pub priority: Priority,
    pub tags: &'static [&'static str],
}

const COMPLETE_DEGREE: EducationRecommendation = EducationRecommendation {
    kind: EducationKind::Education,
    title: "Complete Your Degree",
    message: "Enhance your career with a recognized degree program",
    priority: Priority::High,
    tags: &["degree", "government", "career_advancement"],
};

const OL_PREPARATION: EducationRecommendation = EducationRecommendation {
    kind: EducationKind::ChildEducation,
    title: "O/L Exam Preparation",
    message: "Special courses for your child's O/L exams",
    priority: Priority::Medium,
    tags: &["ol_exams", "tuition", "secondary_education"],
};

const AL_GUIDANCE: EducationRecommendation = EducationRecommendation {
    kind: EducationKind::ChildEducation,
    title: "A/L Stream Selection Guidance",
    message: "Expert guidance for A/L subject selection",
    priority: Priority::Medium,
    tags: &["al_exams", "career_guidance", "higher_education"],
};

/// Course suggestions for the user and each child with a known age.
pub fn education_recommendations(profile: &UserProfile) -> Vec<EducationRecommendation> {
    let mut out = Vec::new();

    let partially_qualified = matches!(
        profile.education_level().as_deref(),
        Some("ol" | "al" | "diploma")
    );
    if partially_qualified
        && profile.job_lower().contains("government")
        && profile.age.is_some_and(|age| (25..=50).contains(&age))
    {
        out.push(COMPLETE_DEGREE);
    }

    for child in &profile.family.children {
        let Some(age) = child.age else {
            continue;
        };
        let level = child.education.as_deref().unwrap_or("").to_lowercase();

        if (10..=18).contains(&age) && !level.contains("ol") {
            out.push(OL_PREPARATION);
        }
        if (17..=20).contains(&age) && !level.contains("al") {
            out.push(AL_GUIDANCE);
        }
    }

    out
}
