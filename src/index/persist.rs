//! On-disk format for a [`VectorIndex`]: a vector file and a metadata file.
//!
//! `vectors.rkyv` holds the flat vector buffer (rkyv, read through a memory
//! map); `metadata.json` holds the ordered entries plus the BLAKE3 checksum of
//! the vector file. Both carry the same build id. Each file is written to a
//! temp file in the same directory, fsynced, then renamed over the old one,
//! vectors first. A reader that finds the two out of step (crash between the
//! renames, partial copy, bit rot) gets the empty index.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use memmap2::Mmap;
use rkyv::rancor::Error as RkyvError;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{info, warn};

use super::{IndexError, IndexResult, VectorIndex};
use crate::constants::{INDEX_FORMAT_VERSION, METADATA_FILE_NAME, VECTOR_FILE_NAME};
use crate::corpus::CorpusEntry;
use crate::hashing::checksum_hex;

#[derive(Debug, rkyv::Archive, rkyv::Serialize, rkyv::Deserialize)]
struct VectorFile {
    format_version: u32,
    build_id: String,
    embedder_id: String,
    dimension: u64,
    vectors: Vec<f32>,
}

#[derive(Debug, Serialize, Deserialize)]
struct MetadataFile {
    format_version: u32,
    build_id: String,
    embedder_id: String,
    dimension: usize,
    created_at: DateTime<Utc>,
    vectors_checksum: String,
    entries: Vec<CorpusEntry>,
}

pub fn vector_path(dir: &Path) -> PathBuf {
    dir.join(VECTOR_FILE_NAME)
}

pub fn metadata_path(dir: &Path) -> PathBuf {
    dir.join(METADATA_FILE_NAME)
}

/// Writes the pair into `dir`, creating it if needed.
pub fn persist(index: &VectorIndex, dir: &Path) -> IndexResult<()> {
    fs::create_dir_all(dir)?;

    let vector_file = VectorFile {
        format_version: INDEX_FORMAT_VERSION,
        build_id: index.build_id().to_string(),
        embedder_id: index.embedder_id().to_string(),
        dimension: index.dimension() as u64,
        vectors: index.raw_vectors().to_vec(),
    };
    let vector_bytes = rkyv::to_bytes::<RkyvError>(&vector_file)
        .map_err(|e| IndexError::Serialization(e.to_string()))?;

    let metadata = MetadataFile {
        format_version: INDEX_FORMAT_VERSION,
        build_id: index.build_id().to_string(),
        embedder_id: index.embedder_id().to_string(),
        dimension: index.dimension(),
        created_at: index.built_at().unwrap_or_else(Utc::now),
        vectors_checksum: checksum_hex(&vector_bytes),
        entries: index.entries().to_vec(),
    };
    let metadata_bytes =
        serde_json::to_vec(&metadata).map_err(|e| IndexError::Serialization(e.to_string()))?;

    write_atomic(dir, &vector_path(dir), &vector_bytes)?;
    write_atomic(dir, &metadata_path(dir), &metadata_bytes)?;
    sync_dir(dir);

    info!(
        dir = %dir.display(),
        entries = index.len(),
        build_id = %index.build_id(),
        "Vector index persisted"
    );
    Ok(())
}

fn write_atomic(dir: &Path, target: &Path, bytes: &[u8]) -> IndexResult<()> {
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(target).map_err(|e| IndexError::Io(e.error))?;
    Ok(())
}

#[cfg(unix)]
fn sync_dir(dir: &Path) {
    if let Err(e) = File::open(dir).and_then(|d| d.sync_all()) {
        warn!(dir = %dir.display(), error = %e, "Failed to fsync index directory");
    }
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) {}

/// Loads the pair from `dir`, or explains why it cannot.
///
/// With `expected_embedder` set, an index built by any other embedder is
/// rejected with [`IndexError::EmbedderMismatch`].
pub fn try_load(dir: &Path, expected_embedder: Option<&str>) -> IndexResult<VectorIndex> {
    let meta_path = metadata_path(dir);
    let vec_path = vector_path(dir);
    for path in [&meta_path, &vec_path] {
        if !path.exists() {
            return Err(IndexError::NotFound { path: path.clone() });
        }
    }

    let corrupt = |path: &Path, reason: String| IndexError::Corrupt {
        path: path.to_path_buf(),
        reason,
    };

    let metadata: MetadataFile = serde_json::from_slice(&fs::read(&meta_path)?)
        .map_err(|e| corrupt(&meta_path, e.to_string()))?;
    if metadata.format_version != INDEX_FORMAT_VERSION {
        return Err(corrupt(
            &meta_path,
            format!("unsupported format version {}", metadata.format_version),
        ));
    }

    if let Some(expected) = expected_embedder
        && metadata.embedder_id != expected
    {
        return Err(IndexError::EmbedderMismatch {
            expected: expected.to_string(),
            found: metadata.embedder_id,
        });
    }

    let file = File::open(&vec_path)?;
    if file.metadata()?.len() == 0 {
        return Err(corrupt(&vec_path, "empty vector file".to_string()));
    }
    // SAFETY: the file is opened read-only and only replaced by rename, which
    // leaves this mapping pointing at the old inode.
    let mmap = unsafe { Mmap::map(&file)? };

    if checksum_hex(&mmap) != metadata.vectors_checksum {
        return Err(corrupt(&vec_path, "checksum does not match metadata".to_string()));
    }

    let vector_file = rkyv::from_bytes::<VectorFile, RkyvError>(&mmap)
        .map_err(|e| corrupt(&vec_path, e.to_string()))?;

    if vector_file.format_version != INDEX_FORMAT_VERSION
        || vector_file.build_id != metadata.build_id
        || vector_file.embedder_id != metadata.embedder_id
        || vector_file.dimension != metadata.dimension as u64
    {
        return Err(corrupt(
            &vec_path,
            "vector file and metadata describe different builds".to_string(),
        ));
    }

    VectorIndex::from_persisted(
        metadata.embedder_id,
        metadata.build_id,
        metadata.created_at,
        metadata.dimension,
        vector_file.vectors,
        metadata.entries,
    )
    .map_err(|e| corrupt(dir, e.to_string()))
}

/// Loads the pair from `dir`. Never fails: anything unusable yields the
/// empty index, logged.
pub fn load(dir: &Path, expected_embedder: Option<&str>) -> VectorIndex {
    match try_load(dir, expected_embedder) {
        Ok(index) => {
            info!(
                dir = %dir.display(),
                entries = index.len(),
                build_id = %index.build_id(),
                "Loaded persisted vector index"
            );
            index
        }
        Err(IndexError::NotFound { path }) => {
            info!(path = %path.display(), "No persisted vector index; starting empty");
            VectorIndex::empty()
        }
        Err(e @ IndexError::EmbedderMismatch { .. }) => {
            warn!(error = %e, "Persisted index ignored; rebuild required");
            VectorIndex::empty()
        }
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "Persisted index unusable; starting empty");
            VectorIndex::empty()
        }
    }
}
