use super::*;
use crate::corpus::CorpusEntry;
use crate::embedding::{EmbeddingProvider, MockEmbedder};
use std::time::Duration;
use std::sync::Arc;
use tempfile::TempDir;

fn entry(q: &str) -> CorpusEntry {
    CorpusEntry {
        service: "Immigration".to_string(),
        subservice: "Passport".to_string(),
        question: q.to_string(),
        answer: format!("Answer to {q}"),
    }
}

fn small_index() -> VectorIndex {
    VectorIndex::from_parts(
        "mock:2",
        2,
        vec![vec![0.0, 0.0], vec![1.0, 0.0], vec![0.0, 3.0], vec![1.0, 0.0]],
        vec![entry("a"), entry("b"), entry("c"), entry("d")],
    )
    .unwrap()
}

#[test]
fn test_empty_index_searches_to_nothing() {
    let index = VectorIndex::empty();
    assert!(index.is_empty());
    assert!(index.search(&[1.0, 2.0], 1).unwrap().is_empty());
    assert_eq!(index.status().build_id, None);
}

#[test]
fn test_search_orders_by_squared_l2_with_position_tiebreak() {
    let index = small_index();
    let hits = index.search(&[1.0, 0.0], 4).unwrap();
    let ids: Vec<usize> = hits.iter().map(|n| n.id).collect();
    assert_eq!(ids, vec![1, 3, 0, 2]);
    assert_eq!(hits[0].distance, 0.0);
    assert_eq!(hits[2].distance, 1.0);
    assert_eq!(hits[3].distance, 10.0);
}

#[test]
fn test_search_top_k_truncates() {
    let index = small_index();
    let hits = index.search(&[0.0, 2.9], 1).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, 2);
    assert_eq!(index.entry(hits[0].id).unwrap().question, "c");
    assert!(index.search(&[0.0, 0.0], 0).unwrap().is_empty());
}

#[test]
fn test_search_rejects_wrong_dimension() {
    let index = small_index();
    assert!(matches!(
        index.search(&[1.0, 0.0, 0.0], 1),
        Err(IndexError::DimensionMismatch {
            expected: 2,
            actual: 3
        })
    ));
}

#[test]
fn test_from_parts_validates_lengths() {
    assert!(matches!(
        VectorIndex::from_parts("m", 2, vec![vec![0.0, 0.0]], vec![entry("a"), entry("b")]),
        Err(IndexError::LengthMismatch {
            vectors: 1,
            entries: 2
        })
    ));
    assert!(matches!(
        VectorIndex::from_parts("m", 2, vec![vec![0.0]], vec![entry("a")]),
        Err(IndexError::DimensionMismatch { .. })
    ));
}

#[test]
fn test_squared_l2() {
    assert_eq!(squared_l2(&[1.0, 2.0], &[4.0, 6.0]), 25.0);
}

#[tokio::test]
async fn test_build_embeds_every_entry_in_order() {
    let embedder = MockEmbedder::new(8);
    let entries = vec![entry("a"), entry("b"), entry("c")];
    let index = VectorIndex::build(entries.clone(), &embedder).await.unwrap();

    assert_eq!(index.len(), 3);
    assert_eq!(index.raw_vectors().len(), 3 * 8);
    assert_eq!(index.entries(), entries.as_slice());
    assert_eq!(index.embedder_id(), "mock:8");
    assert_eq!(embedder.call_count(), 3);

    let probe = embedder.embed(&entries[1].indexable_text()).await.unwrap();
    assert_eq!(index.search(&probe, 1).unwrap()[0].id, 1);
}

#[tokio::test]
async fn test_build_rejects_empty_corpus() {
    let embedder = MockEmbedder::new(8);
    assert!(matches!(
        VectorIndex::build(Vec::new(), &embedder).await,
        Err(IndexError::EmptyCorpus)
    ));
}

#[tokio::test]
async fn test_build_propagates_embedder_failure() {
    let embedder = MockEmbedder::new(8);
    embedder.set_failing(true);
    assert!(matches!(
        VectorIndex::build(vec![entry("a")], &embedder).await,
        Err(IndexError::Embedding(_))
    ));
}

#[test]
fn test_persist_then_load_round_trip() {
    let dir = TempDir::new().unwrap();
    let index = small_index();
    persist::persist(&index, dir.path()).unwrap();

    let loaded = persist::try_load(dir.path(), Some("mock:2")).unwrap();
    assert_eq!(loaded.len(), index.len());
    assert_eq!(loaded.raw_vectors().len(), loaded.len() * loaded.dimension());
    assert_eq!(loaded.build_id(), index.build_id());
    assert_eq!(loaded.entries(), index.entries());
    assert_eq!(loaded.search(&[1.0, 0.0], 1).unwrap()[0].id, 1);
}

#[test]
fn test_load_missing_dir_is_empty() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope");
    assert!(matches!(
        persist::try_load(&missing, None),
        Err(IndexError::NotFound { .. })
    ));
    assert!(persist::load(&missing, None).is_empty());
}

#[test]
fn test_load_corrupt_vector_file_is_empty() {
    let dir = TempDir::new().unwrap();
    persist::persist(&small_index(), dir.path()).unwrap();
    std::fs::write(persist::vector_path(dir.path()), b"garbage").unwrap();

    assert!(matches!(
        persist::try_load(dir.path(), None),
        Err(IndexError::Corrupt { .. })
    ));
    assert!(persist::load(dir.path(), None).is_empty());
}

#[test]
fn test_load_mismatched_pair_is_empty() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    persist::persist(&small_index(), first.path()).unwrap();
    persist::persist(&small_index(), second.path()).unwrap();

    // Vector file from one build next to metadata from another.
    std::fs::copy(
        persist::vector_path(second.path()),
        persist::vector_path(first.path()),
    )
    .unwrap();

    assert!(persist::load(first.path(), None).is_empty());
}

#[test]
fn test_load_corrupt_metadata_is_empty() {
    let dir = TempDir::new().unwrap();
    persist::persist(&small_index(), dir.path()).unwrap();
    std::fs::write(persist::metadata_path(dir.path()), b"{\"entries\": 3").unwrap();
    assert!(persist::load(dir.path(), None).is_empty());
}

#[test]
fn test_load_with_other_embedder_is_empty() {
    let dir = TempDir::new().unwrap();
    persist::persist(&small_index(), dir.path()).unwrap();

    assert!(matches!(
        persist::try_load(dir.path(), Some("remote:other:2")),
        Err(IndexError::EmbedderMismatch { .. })
    ));
    assert!(persist::load(dir.path(), Some("remote:other:2")).is_empty());
    assert_eq!(persist::load(dir.path(), Some("mock:2")).len(), 4);
}

#[tokio::test]
async fn test_manager_rebuild_publishes_and_persists() {
    let dir = TempDir::new().unwrap();
    let manager = IndexManager::new(dir.path());
    let embedder = MockEmbedder::new(4);

    let before = manager.snapshot();
    assert!(before.is_empty());

    let status = manager
        .rebuild(vec![entry("a"), entry("b")], &embedder)
        .await
        .unwrap();
    assert_eq!(status.entries, 2);

    // The snapshot taken earlier is unchanged.
    assert!(before.is_empty());
    assert_eq!(manager.snapshot().len(), 2);

    let reopened = IndexManager::open(dir.path(), Some("mock:4"));
    assert_eq!(reopened.status(), status);
}

#[tokio::test]
async fn test_manager_failed_rebuild_keeps_previous() {
    let dir = TempDir::new().unwrap();
    let manager = IndexManager::new(dir.path());
    let embedder = MockEmbedder::new(4);
    manager.rebuild(vec![entry("a")], &embedder).await.unwrap();
    let build_id = manager.snapshot().build_id().to_string();

    assert!(manager.rebuild(Vec::new(), &embedder).await.is_err());
    embedder.set_failing(true);
    assert!(manager.rebuild(vec![entry("b")], &embedder).await.is_err());

    assert_eq!(manager.snapshot().build_id(), build_id);
    assert_eq!(
        persist::load(dir.path(), None).build_id(),
        build_id.as_str()
    );
}

#[tokio::test]
async fn test_manager_rejects_concurrent_rebuild() {
    let dir = TempDir::new().unwrap();
    let manager = Arc::new(IndexManager::new(dir.path()));
    let embedder = Arc::new(MockEmbedder::new(4));
    embedder.set_delay(Some(Duration::from_millis(200)));

    let slow = {
        let manager = Arc::clone(&manager);
        let embedder = Arc::clone(&embedder);
        tokio::spawn(async move { manager.rebuild(vec![entry("a")], embedder.as_ref()).await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert!(matches!(
        manager.rebuild(vec![entry("b")], embedder.as_ref()).await,
        Err(IndexError::RebuildInProgress)
    ));

    let first = slow.await.unwrap().unwrap();
    assert_eq!(first.entries, 1);
    assert_eq!(manager.snapshot().entries()[0].question, "a");

    embedder.set_delay(None);
    assert!(manager.rebuild(vec![entry("b")], embedder.as_ref()).await.is_ok());
}
