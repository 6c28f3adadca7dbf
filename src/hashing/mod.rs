//! BLAKE3 helpers for cache keys and persisted-file checksums.

use blake3::Hasher;

/// Full 32-byte BLAKE3 digest of `text`, used as the query-embedding cache key.
#[inline]
pub fn hash_text(text: &str) -> [u8; 32] {
    *blake3::hash(text.as_bytes()).as_bytes()
}

/// Cache key scoped to an embedder id, so two models never share a slot.
pub fn hash_scoped(scope: &str, text: &str) -> [u8; 32] {
    let mut hasher = Hasher::new();
    hasher.update(scope.as_bytes());
    // Separator byte so ("ab", "c") and ("a", "bc") differ.
    hasher.update(&[0u8]);
    hasher.update(text.as_bytes());
    *hasher.finalize().as_bytes()
}

/// Lowercase hex checksum of a byte slice.
///
/// The metadata file stores this for the vector file so a mismatched pair is
/// detected at load time.
pub fn checksum_hex(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}
