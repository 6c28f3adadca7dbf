//! Exact nearest-neighbour index over corpus entries.
//!
//! Vectors are stored row-major in one flat buffer; row `i` belongs to
//! `entries[i]`. The only ways to obtain a [`VectorIndex`] are [`VectorIndex::empty`],
//! [`VectorIndex::from_parts`], [`VectorIndex::build`] and [`persist::load`], all of
//! which check that the row count equals the entry count.
//!
//! Distance is squared Euclidean; lower is closer.

pub mod error;
mod manager;
pub mod persist;

#[cfg(test)]
mod tests;

pub use error::{IndexError, IndexResult};
pub use manager::IndexManager;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::corpus::CorpusEntry;
use crate::embedding::EmbeddingProvider;

/// One search hit: entry position and its squared L2 distance to the query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Neighbor {
    pub id: usize,
    pub distance: f32,
}

/// Summary of the index currently being served.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexStatus {
    pub entries: usize,
    pub dimension: usize,
    pub build_id: Option<String>,
    pub embedder_id: Option<String>,
    pub built_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VectorIndex {
    dimension: usize,
    embedder_id: String,
    build_id: String,
    built_at: Option<DateTime<Utc>>,
    vectors: Vec<f32>,
    entries: Vec<CorpusEntry>,
}

impl Default for VectorIndex {
    fn default() -> Self {
        Self::empty()
    }
}

impl VectorIndex {
    /// The explicit empty state. A valid index that answers every search with nothing.
    pub fn empty() -> Self {
        Self {
            dimension: 0,
            embedder_id: String::new(),
            build_id: String::new(),
            built_at: None,
            vectors: Vec::new(),
            entries: Vec::new(),
        }
    }

    /// Assembles an index from one vector per entry.
    pub fn from_parts(
        embedder_id: impl Into<String>,
        dimension: usize,
        vectors: Vec<Vec<f32>>,
        entries: Vec<CorpusEntry>,
    ) -> IndexResult<Self> {
        if vectors.len() != entries.len() {
            return Err(IndexError::LengthMismatch {
                vectors: vectors.len(),
                entries: entries.len(),
            });
        }
        if dimension == 0 && !entries.is_empty() {
            return Err(IndexError::DimensionMismatch {
                expected: 0,
                actual: vectors.first().map_or(0, Vec::len),
            });
        }

        let mut flat = Vec::with_capacity(vectors.len() * dimension);
        for v in &vectors {
            if v.len() != dimension {
                return Err(IndexError::DimensionMismatch {
                    expected: dimension,
                    actual: v.len(),
                });
            }
            flat.extend_from_slice(v);
        }

        Ok(Self {
            dimension,
            embedder_id: embedder_id.into(),
            build_id: Uuid::new_v4().to_string(),
            built_at: Some(Utc::now()),
            vectors: flat,
            entries,
        })
    }

    /// Rebuilds from scratch: embeds every entry's indexable text in order.
    ///
    /// An empty corpus is an error, not an empty index, so a rebuild never
    /// replaces a good index with nothing.
    #[instrument(skip(entries, embedder), fields(entries = entries.len(), embedder = embedder.id()))]
    pub async fn build(
        entries: Vec<CorpusEntry>,
        embedder: &dyn EmbeddingProvider,
    ) -> IndexResult<Self> {
        if entries.is_empty() {
            return Err(IndexError::EmptyCorpus);
        }

        let texts: Vec<String> = entries.iter().map(CorpusEntry::indexable_text).collect();
        let vectors = embedder.embed_batch(&texts).await?;
        let index = Self::from_parts(embedder.id(), embedder.dimension(), vectors, entries)?;

        info!(
            entries = index.len(),
            dimension = index.dimension,
            build_id = %index.build_id,
            "Vector index built"
        );
        Ok(index)
    }

    /// Reassembles a persisted index. `vectors` is the flat row-major buffer.
    pub(crate) fn from_persisted(
        embedder_id: String,
        build_id: String,
        built_at: DateTime<Utc>,
        dimension: usize,
        vectors: Vec<f32>,
        entries: Vec<CorpusEntry>,
    ) -> IndexResult<Self> {
        let rows = if dimension == 0 {
            if !vectors.is_empty() {
                return Err(IndexError::DimensionMismatch {
                    expected: 0,
                    actual: vectors.len(),
                });
            }
            0
        } else {
            if vectors.len() % dimension != 0 {
                return Err(IndexError::DimensionMismatch {
                    expected: dimension,
                    actual: vectors.len() % dimension,
                });
            }
            vectors.len() / dimension
        };
        if rows != entries.len() {
            return Err(IndexError::LengthMismatch {
                vectors: rows,
                entries: entries.len(),
            });
        }

        Ok(Self {
            dimension,
            embedder_id,
            build_id,
            built_at: Some(built_at),
            vectors,
            entries,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn embedder_id(&self) -> &str {
        &self.embedder_id
    }

    pub fn build_id(&self) -> &str {
        &self.build_id
    }

    pub fn built_at(&self) -> Option<DateTime<Utc>> {
        self.built_at
    }

    pub fn entries(&self) -> &[CorpusEntry] {
        &self.entries
    }

    pub fn entry(&self, id: usize) -> Option<&CorpusEntry> {
        self.entries.get(id)
    }

    pub(crate) fn raw_vectors(&self) -> &[f32] {
        &self.vectors
    }

    fn row(&self, id: usize) -> &[f32] {
        let start = id * self.dimension;
        &self.vectors[start..start + self.dimension]
    }

    /// The `k` nearest entries, ascending by distance (ties by position).
    ///
    /// An empty index returns no neighbours. A query of the wrong length is an
    /// error rather than a meaningless ranking.
    pub fn search(&self, query: &[f32], k: usize) -> IndexResult<Vec<Neighbor>> {
        if self.is_empty() || k == 0 {
            return Ok(Vec::new());
        }
        if query.len() != self.dimension {
            return Err(IndexError::DimensionMismatch {
                expected: self.dimension,
                actual: query.len(),
            });
        }

        let mut hits: Vec<Neighbor> = (0..self.len())
            .map(|id| Neighbor {
                id,
                distance: squared_l2(query, self.row(id)),
            })
            .collect();

        let by_distance =
            |a: &Neighbor, b: &Neighbor| a.distance.total_cmp(&b.distance).then(a.id.cmp(&b.id));
        if k < hits.len() {
            hits.select_nth_unstable_by(k - 1, by_distance);
            hits.truncate(k);
        }
        hits.sort_unstable_by(by_distance);

        debug!(k, best = ?hits.first(), "Index search complete");
        Ok(hits)
    }

    pub fn status(&self) -> IndexStatus {
        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());
        IndexStatus {
            entries: self.len(),
            dimension: self.dimension,
            build_id: non_empty(&self.build_id),
            embedder_id: non_empty(&self.embedder_id),
            built_at: self.built_at,
        }
    }
}

/// Squared Euclidean distance. Callers guarantee equal lengths.
#[inline]
pub fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}
