use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

use super::{IndexError, IndexResult, IndexStatus, VectorIndex, persist};
use crate::corpus::CorpusEntry;
use crate::embedding::EmbeddingProvider;

/// Owns the served index and serializes rebuilds.
///
/// Readers take an `Arc` snapshot and keep it for the whole query. A rebuild
/// builds and persists off to the side, then swaps the `Arc` in one write, so
/// a reader sees the old pair or the new pair and nothing in between.
pub struct IndexManager {
    dir: PathBuf,
    current: RwLock<Arc<VectorIndex>>,
    rebuild: Mutex<()>,
}

impl std::fmt::Debug for IndexManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexManager")
            .field("dir", &self.dir)
            .field("entries", &self.current.read().len())
            .finish()
    }
}

impl IndexManager {
    /// Starts with the empty index; nothing is read from `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_index(dir, VectorIndex::empty())
    }

    pub fn with_index(dir: impl Into<PathBuf>, index: VectorIndex) -> Self {
        Self {
            dir: dir.into(),
            current: RwLock::new(Arc::new(index)),
            rebuild: Mutex::new(()),
        }
    }

    /// Loads whatever valid pair is in `dir`, else starts empty.
    pub fn open(dir: impl Into<PathBuf>, expected_embedder: Option<&str>) -> Self {
        let dir = dir.into();
        let index = persist::load(&dir, expected_embedder);
        Self::with_index(dir, index)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The index to use for one whole query.
    pub fn snapshot(&self) -> Arc<VectorIndex> {
        Arc::clone(&self.current.read())
    }

    pub fn status(&self) -> IndexStatus {
        self.snapshot().status()
    }

    /// Full rebuild from `entries`. At most one runs at a time; a second caller
    /// gets [`IndexError::RebuildInProgress`] instead of queueing.
    ///
    /// On any failure the served index is left untouched.
    #[instrument(skip(self, entries, embedder), fields(entries = entries.len()))]
    pub async fn rebuild(
        &self,
        entries: Vec<CorpusEntry>,
        embedder: &dyn EmbeddingProvider,
    ) -> IndexResult<IndexStatus> {
        let _guard = self
            .rebuild
            .try_lock()
            .map_err(|_| IndexError::RebuildInProgress)?;

        let index = Arc::new(VectorIndex::build(entries, embedder).await?);

        let dir = self.dir.clone();
        let to_write = Arc::clone(&index);
        tokio::task::spawn_blocking(move || persist::persist(&to_write, &dir))
            .await
            .map_err(|e| IndexError::Io(std::io::Error::other(e)))?
            .inspect_err(|e| warn!(error = %e, "Persisting rebuilt index failed; keeping previous index"))?;

        let status = index.status();
        *self.current.write() = index;

        info!(
            entries = status.entries,
            build_id = status.build_id.as_deref().unwrap_or(""),
            "Rebuilt index published"
        );
        Ok(status)
    }
}
