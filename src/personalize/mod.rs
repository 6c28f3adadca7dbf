//! Rule-based profile segmentation, candidate ranking and education
//! suggestions.
//!
//! The pure rules live in the submodules; [`Personalizer`] wires them to a
//! [`DocumentStore`] and turns every lookup failure into the documented
//! fallback instead of an error.

mod education;
mod ranking;
mod segments;


pub use education::{EducationKind, EducationRecommendation, Priority, education_recommendations};
pub use ranking::{
    RankingWeights, Recommendation, RecommendationSource, interests_from, rank, score_candidate,
};
pub use segments::{Segment, segment_profile, unknown_segments};

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, instrument, warn};

use crate::documents::UserProfile;
use crate::store::DocumentStore;

/// Store-backed entry point for segmentation and ranking.
#[derive(Clone)]
pub struct Personalizer {
    store: Arc<dyn DocumentStore>,
    weights: RankingWeights,
}

impl Personalizer {
    pub fn new(store: Arc<dyn DocumentStore>, weights: RankingWeights) -> Self {
        Self { store, weights }
    }

    pub fn weights(&self) -> &RankingWeights {
        &self.weights
    }

    async fn profile(&self, user_id: &str) -> Option<UserProfile> {
        match self.store.user_profile(user_id).await {
            Ok(found) => found,
            Err(e) => {
                warn!(user_id, error = %e, "Profile lookup failed");
                None
            }
        }
    }

    /// Segments for `user_id`; `{unknown}` when the profile is missing or
    /// unreadable.
    #[instrument(skip(self))]
    pub async fn segments(&self, user_id: &str) -> BTreeSet<Segment> {
        match self.profile(user_id).await {
            Some(profile) => segment_profile(&profile),
            None => unknown_segments(),
        }
    }

    /// Ranked candidates for `user_id`, never empty.
    #[instrument(skip(self))]
    pub async fn recommend(&self, user_id: &str, limit: usize) -> Vec<Recommendation> {
        self.recommend_at(user_id, limit, Utc::now()).await
    }

    /// [`Self::recommend`] with an explicit clock.
    pub async fn recommend_at(
        &self,
        user_id: &str,
        limit: usize,
        now: DateTime<Utc>,
    ) -> Vec<Recommendation> {
        let segments = self.segments(user_id).await;

        let interests = match self.store.engagements(user_id).await {
            Ok(events) => interests_from(&events),
            Err(e) => {
                warn!(user_id, error = %e, "Engagement lookup failed; ranking without interests");
                BTreeSet::new()
            }
        };

        let pool = match self.store.active_ads().await {
            Ok(pool) => pool,
            Err(e) => {
                warn!(error = %e, "Candidate lookup failed; using placeholder");
                Vec::new()
            }
        };

        let ranked = rank(&pool, &segments, &interests, &self.weights, now, limit);
        debug!(
            user_id,
            pool = pool.len(),
            returned = ranked.len(),
            segments = segments.len(),
            "Ranked candidates"
        );
        ranked
    }

    /// Education suggestions for `user_id`; empty for unknown users.
    #[instrument(skip(self))]
    pub async fn education(&self, user_id: &str) -> Vec<EducationRecommendation> {
        self.profile(user_id)
            .await
            .map(|profile| education_recommendations(&profile))
            .unwrap_or_default()
    }
}
