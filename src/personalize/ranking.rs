use std::collections::{BTreeSet, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::segments::Segment;
use crate::documents::{AdCandidate, EngagementEvent};

/// Scoring parameters. Defaults: 10 per shared segment, 5 per shared interest,
/// +5 under 7 days old, +2 under 30 days old.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingWeights {
    pub segment_weight: u32,
    pub interest_weight: u32,
    pub fresh_bonus: u32,
    pub fresh_days: i64,
    pub recent_bonus: u32,
    pub recent_days: i64,
}

impl Default for RankingWeights {
    fn default() -> Self {
        Self {
            segment_weight: 10,
            interest_weight: 5,
            fresh_bonus: 5,
            fresh_days: 7,
            recent_bonus: 2,
            recent_days: 30,
        }
    }
}

impl RankingWeights {
    pub fn recency_bonus(&self, created: Option<DateTime<Utc>>, now: DateTime<Utc>) -> u32 {
        let Some(created) = created else {
            return 0;
        };
        let days_old = (now - created).num_days();
        if days_old < self.fresh_days {
            self.fresh_bonus
        } else if days_old < self.recent_days {
            self.recent_bonus
        } else {
            0
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationSource {
    Ranked,
    /// Active candidate returned without a score.
    Unscored,
    Placeholder,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub ad: AdCandidate,
    pub score: Option<u32>,
    pub source: RecommendationSource,
}

/// Union of declared desires, clicked questions and viewed services.
pub fn interests_from(events: &[EngagementEvent]) -> BTreeSet<String> {
    events
        .iter()
        .flat_map(EngagementEvent::interest_tags)
        .map(str::to_string)
        .collect()
}

/// `segment_weight × |segments ∩ targets| + interest_weight × |interests ∩ tags| + recency`.
pub fn score_candidate(
    ad: &AdCandidate,
    segments: &BTreeSet<Segment>,
    interests: &BTreeSet<String>,
    weights: &RankingWeights,
    now: DateTime<Utc>,
) -> u32 {
    let targets: HashSet<&str> = ad.target_segments.iter().map(String::as_str).collect();
    let segment_hits = segments
        .iter()
        .filter(|seg| targets.contains(seg.as_str()))
        .count() as u32;

    let tags: HashSet<&str> = ad.tags.iter().map(String::as_str).collect();
    let interest_hits = tags.iter().filter(|t| interests.contains(**t)).count() as u32;

    weights.segment_weight * segment_hits
        + weights.interest_weight * interest_hits
        + weights.recency_bonus(ad.created, now)
}

/// Scores the active part of `pool`, best first, ties kept in pool order,
/// truncated to `limit`. Never returns an empty list.
pub fn rank(
    pool: &[AdCandidate],
    segments: &BTreeSet<Segment>,
    interests: &BTreeSet<String>,
    weights: &RankingWeights,
    now: DateTime<Utc>,
    limit: usize,
) -> Vec<Recommendation> {
    let active: Vec<&AdCandidate> = pool.iter().filter(|ad| ad.active).collect();

    let mut scored: Vec<(u32, &AdCandidate)> = active
        .iter()
        .map(|ad| (score_candidate(ad, segments, interests, weights, now), *ad))
        .collect();
    // Stable sort keeps pool order among equal scores.
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.truncate(limit);

    let mut out: Vec<Recommendation> = scored
        .into_iter()
        .map(|(score, ad)| Recommendation {
            ad: ad.clone(),
            score: Some(score),
            source: RecommendationSource::Ranked,
        })
        .collect();

    if out.is_empty() {
        out = active
            .iter()
            .take(limit)
            .map(|ad| Recommendation {
                ad: (*ad).clone(),
                score: None,
                source: RecommendationSource::Unscored,
            })
            .collect();
    }

    if out.is_empty() {
        out.push(Recommendation {
            ad: AdCandidate::placeholder(),
            score: None,
            source: RecommendationSource::Placeholder,
        });
    }

    out
}
