//! Scriptable embedder for tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::error::EmbeddingError;
use super::stub::StubEmbedder;
use super::EmbeddingProvider;

/// Counts calls, can be told to fail, and returns pinned vectors for chosen texts.
///
/// Unpinned texts get the same deterministic vectors as [`StubEmbedder`].
#[derive(Debug)]
pub struct MockEmbedder {
    id: String,
    dimension: usize,
    calls: AtomicUsize,
    failing: AtomicBool,
    pinned: Mutex<HashMap<String, Vec<f32>>>,
    delay: Mutex<Option<Duration>>,
}

impl MockEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self::with_id(format!("mock:{dimension}"), dimension)
    }

    pub fn with_id(id: impl Into<String>, dimension: usize) -> Self {
        Self {
            id: id.into(),
            dimension,
            calls: AtomicUsize::new(0),
            failing: AtomicBool::new(false),
            pinned: Mutex::new(HashMap::new()),
            delay: Mutex::new(None),
        }
    }

    /// Returns `vector` whenever `text` is embedded.
    pub fn pin(&self, text: impl Into<String>, vector: Vec<f32>) {
        self.pinned.lock().insert(text.into(), vector);
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Sleeps this long before answering each call.
    pub fn set_delay(&self, delay: Option<Duration>) {
        *self.delay.lock() = delay;
    }

    /// Texts embedded so far (a batch counts each text).
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbedder {
    fn id(&self) -> &str {
        &self.id
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(EmbeddingError::Request {
                reason: "mock embedder failure".to_string(),
            });
        }
        let pinned = self.pinned.lock().get(text).cloned();
        if let Some(v) = pinned {
            return Ok(v);
        }
        Ok(StubEmbedder::vector_for(text, self.dimension))
    }
}
