//! Segmentation and ranking through the store-backed personalizer.

mod common;

use std::collections::BTreeSet;
use std::sync::Arc;

use concierge::personalize::{
    Personalizer, RankingWeights, RecommendationSource, Segment, segment_profile,
};
use concierge::store::{DocumentStore, MemoryStore, SeedData};

use common::fixtures::{government_officer, seed};

fn personalizer(seed: SeedData) -> Personalizer {
    let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::from_seed(seed));
    Personalizer::new(store, RankingWeights::default())
}

#[test]
fn test_segmentation_example() {
    assert_eq!(
        segment_profile(&government_officer()),
        BTreeSet::from([
            Segment::EarlyCareer,
            Segment::HighlyEducated,
            Segment::GovernmentEmployee,
        ])
    );
}

#[tokio::test]
async fn test_missing_user_is_unknown() {
    let segments = personalizer(seed()).segments("nobody").await;
    assert_eq!(segments, BTreeSet::from([Segment::Unknown]));
}

#[tokio::test]
async fn test_ranking_example() {
    let ranked = personalizer(seed()).recommend("officer", 10).await;

    let ids: Vec<_> = ranked.iter().map(|r| r.ad.id.as_str()).collect();
    assert_eq!(ids, ["a", "b"], "inactive candidates are never offered");
    assert_eq!(ranked[0].score, Some(20));
    assert_eq!(ranked[1].score, Some(0));
}

#[tokio::test]
async fn test_empty_pool_returns_one_placeholder() {
    let seed = SeedData {
        ads: Vec::new(),
        ..seed()
    };
    let ranked = personalizer(seed).recommend("officer", 5).await;

    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].source, RecommendationSource::Placeholder);
    assert_eq!(ranked[0].ad.id, "default");
}

#[tokio::test]
async fn test_limit_truncates() {
    let ranked = personalizer(seed()).recommend("officer", 1).await;
    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].ad.id, "a");
}
