//! Flat vector index with paired on-disk artifacts.
//!
//! The store is two files written together and read together:
//!
//! - `index.bin`: header (magic, format version, dimension, vector count,
//!   embedding-model identifier) followed by the vectors as little-endian
//!   f32 rows.
//! - `meta.json`: a JSON array of `{"text", "source"}` records, one per
//!   vector, in vector order.
//!
//! Vector `i` corresponds exactly to metadata record `i`. Any inconsistency
//! between the two files (count mismatch, parse failure, model-identifier
//! mismatch) makes the whole store unavailable; it is never partially used.
//!
//! Search is exact inner-product top-k. With unit-norm vectors this equals
//! cosine similarity.

use crate::types::ChunkMeta;
use beatline_core::{AppError, AppResult};
use std::fs;
use std::path::Path;

/// File magic for the index artifact.
const INDEX_MAGIC: &[u8; 4] = b"BLIX";

/// Current index format version.
const INDEX_VERSION: u32 = 1;

/// In-memory flat vector index supporting exact inner-product search.
#[derive(Debug, Clone)]
pub struct VectorIndex {
    dim: usize,
    data: Vec<f32>,
}

impl VectorIndex {
    /// Create an empty index for vectors of the given dimension.
    pub fn new(dim: usize) -> Self {
        Self { dim, data: Vec::new() }
    }

    /// Vector dimension.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of stored vectors.
    pub fn len(&self) -> usize {
        if self.dim == 0 {
            0
        } else {
            self.data.len() / self.dim
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append a vector to the index.
    pub fn add(&mut self, vector: &[f32]) -> AppResult<()> {
        if vector.len() != self.dim {
            return Err(AppError::Retrieval(format!(
                "Vector dimension {} does not match index dimension {}",
                vector.len(),
                self.dim
            )));
        }
        self.data.extend_from_slice(vector);
        Ok(())
    }

    /// Exact top-k search by inner product, descending score.
    ///
    /// Returns at most `k` `(position, score)` pairs; every returned
    /// position is a valid row of the index.
    pub fn search(&self, query: &[f32], k: usize) -> AppResult<Vec<(usize, f32)>> {
        if query.len() != self.dim {
            return Err(AppError::Retrieval(format!(
                "Query dimension {} does not match index dimension {}",
                query.len(),
                self.dim
            )));
        }

        let mut scored: Vec<(usize, f32)> = self
            .data
            .chunks_exact(self.dim)
            .enumerate()
            .map(|(i, row)| {
                let score: f32 = row.iter().zip(query.iter()).map(|(x, y)| x * y).sum();
                (i, score)
            })
            .collect();

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);

        Ok(scored)
    }
}

/// Serialize the index with its embedding-model identifier.
fn index_to_bytes(index: &VectorIndex, model: &str) -> Vec<u8> {
    let model_bytes = model.as_bytes();

    let mut bytes = Vec::with_capacity(20 + model_bytes.len() + index.data.len() * 4);
    bytes.extend_from_slice(INDEX_MAGIC);
    bytes.extend_from_slice(&INDEX_VERSION.to_le_bytes());
    bytes.extend_from_slice(&(index.dim as u32).to_le_bytes());
    bytes.extend_from_slice(&(index.len() as u32).to_le_bytes());
    bytes.extend_from_slice(&(model_bytes.len() as u32).to_le_bytes());
    bytes.extend_from_slice(model_bytes);
    for value in &index.data {
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    bytes
}

fn corrupt(what: &str) -> AppError {
    AppError::StoreUnavailable(format!("Index file corrupt: {}", what))
}

/// Advance the cursor by `n` bytes, failing on truncated input.
fn take<'a>(bytes: &'a [u8], offset: &mut usize, n: usize) -> AppResult<&'a [u8]> {
    let end = offset
        .checked_add(n)
        .filter(|&end| end <= bytes.len())
        .ok_or_else(|| corrupt("truncated"))?;
    let slice = &bytes[*offset..end];
    *offset = end;
    Ok(slice)
}

fn take_u32(bytes: &[u8], offset: &mut usize) -> AppResult<u32> {
    let slice = take(bytes, offset, 4)?;
    Ok(u32::from_le_bytes([slice[0], slice[1], slice[2], slice[3]]))
}

/// Deserialize an index file, returning the index and the model identifier
/// it was built with.
fn index_from_bytes(bytes: &[u8]) -> AppResult<(VectorIndex, String)> {
    let mut offset = 0usize;

    if take(bytes, &mut offset, 4)? != INDEX_MAGIC {
        return Err(corrupt("bad magic"));
    }

    let version = take_u32(bytes, &mut offset)?;
    if version != INDEX_VERSION {
        return Err(corrupt(&format!("unsupported version {}", version)));
    }

    let dim = take_u32(bytes, &mut offset)? as usize;
    let count = take_u32(bytes, &mut offset)? as usize;
    let model_len = take_u32(bytes, &mut offset)? as usize;

    let model = String::from_utf8(take(bytes, &mut offset, model_len)?.to_vec())
        .map_err(|_| corrupt("model identifier not UTF-8"))?;

    let payload_len = count
        .checked_mul(dim)
        .and_then(|n| n.checked_mul(4))
        .ok_or_else(|| corrupt("size overflow"))?;
    let payload = take(bytes, &mut offset, payload_len)?;
    if offset != bytes.len() {
        return Err(corrupt("trailing bytes"));
    }

    let data: Vec<f32> = payload
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect();

    Ok((VectorIndex { dim, data }, model))
}

/// Write the store pair atomically.
///
/// Both artifacts are written to temporary paths in the store directory and
/// renamed into place afterwards, so a crash mid-write never leaves one
/// updated file next to a stale one.
pub fn save_store(
    index_path: &Path,
    meta_path: &Path,
    index: &VectorIndex,
    meta: &[ChunkMeta],
    model: &str,
) -> AppResult<()> {
    if index.len() != meta.len() {
        return Err(AppError::StoreUnavailable(format!(
            "Refusing to write inconsistent store: {} vectors, {} metadata entries",
            index.len(),
            meta.len()
        )));
    }

    if let Some(parent) = index_path.parent() {
        fs::create_dir_all(parent)?;
    }
    if let Some(parent) = meta_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let index_tmp = index_path.with_extension("bin.tmp");
    let meta_tmp = meta_path.with_extension("json.tmp");

    fs::write(&index_tmp, index_to_bytes(index, model))?;

    let meta_json = serde_json::to_string_pretty(meta)?;
    fs::write(&meta_tmp, meta_json)?;

    fs::rename(&index_tmp, index_path)?;
    fs::rename(&meta_tmp, meta_path)?;

    tracing::info!(
        "Wrote store: {} vectors ({}-dim, model '{}') to {:?} / {:?}",
        index.len(),
        index.dim(),
        model,
        index_path,
        meta_path
    );

    Ok(())
}

/// Load and validate the store pair.
///
/// Fails with `StoreUnavailable` when either file is malformed, the vector
/// and metadata counts differ, or the index was built with a different
/// embedding model than `expected_model`.
pub fn load_store(
    index_path: &Path,
    meta_path: &Path,
    expected_model: &str,
) -> AppResult<(VectorIndex, Vec<ChunkMeta>)> {
    let index_bytes = fs::read(index_path).map_err(|e| {
        AppError::StoreUnavailable(format!("Failed to read {:?}: {}", index_path, e))
    })?;
    let (index, model) = index_from_bytes(&index_bytes)?;

    if model != expected_model {
        return Err(AppError::StoreUnavailable(format!(
            "Index was built with embedding model '{}' but '{}' is configured; \
             similarity scores would be meaningless. Re-run the indexer.",
            model, expected_model
        )));
    }

    let meta_bytes = fs::read(meta_path).map_err(|e| {
        AppError::StoreUnavailable(format!("Failed to read {:?}: {}", meta_path, e))
    })?;
    let meta: Vec<ChunkMeta> = serde_json::from_slice(&meta_bytes).map_err(|e| {
        AppError::StoreUnavailable(format!("Metadata file malformed: {}", e))
    })?;

    if index.len() != meta.len() {
        return Err(AppError::StoreUnavailable(format!(
            "Store inconsistent: {} vectors but {} metadata entries",
            index.len(),
            meta.len()
        )));
    }

    tracing::info!(
        "Loaded store: {} vectors and {} metadata entries from {:?}",
        index.len(),
        meta.len(),
        index_path
    );

    Ok((index, meta))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn meta(text: &str, source: &str) -> ChunkMeta {
        ChunkMeta {
            text: text.to_string(),
            source: source.to_string(),
        }
    }

    fn sample_index() -> (VectorIndex, Vec<ChunkMeta>) {
        let mut index = VectorIndex::new(3);
        index.add(&[1.0, 0.0, 0.0]).unwrap();
        index.add(&[0.0, 1.0, 0.0]).unwrap();
        index.add(&[0.0, 0.0, 1.0]).unwrap();
        let meta = vec![
            meta("first", "a.txt"),
            meta("second", "b.txt"),
            meta("third", "c.txt"),
        ];
        (index, meta)
    }

    #[test]
    fn test_add_dimension_check() {
        let mut index = VectorIndex::new(3);
        assert!(index.add(&[1.0, 0.0]).is_err());
        assert!(index.add(&[1.0, 0.0, 0.0]).is_ok());
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_search_ordering_and_bound() {
        let (index, _) = sample_index();
        let results = index.search(&[0.9, 0.3, 0.1], 2).unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].0, 0);
        assert!(results[0].1 >= results[1].1);
    }

    #[test]
    fn test_search_k_larger_than_index() {
        let (index, _) = sample_index();
        let results = index.search(&[1.0, 0.0, 0.0], 10).unwrap();
        assert_eq!(results.len(), 3);
    }

    #[test]
    fn test_search_query_dimension_mismatch() {
        let (index, _) = sample_index();
        assert!(index.search(&[1.0, 0.0], 5).is_err());
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let index_path = dir.path().join("index.bin");
        let meta_path = dir.path().join("meta.json");

        let (index, meta_records) = sample_index();
        save_store(&index_path, &meta_path, &index, &meta_records, "bge-m3").unwrap();

        let (loaded, loaded_meta) = load_store(&index_path, &meta_path, "bge-m3").unwrap();
        assert_eq!(loaded.len(), 3);
        assert_eq!(loaded.dim(), 3);
        assert_eq!(loaded_meta, meta_records);

        // No leftover temporary files
        assert!(!index_path.with_extension("bin.tmp").exists());
        assert!(!meta_path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_empty_store_round_trip() {
        let dir = TempDir::new().unwrap();
        let index_path = dir.path().join("index.bin");
        let meta_path = dir.path().join("meta.json");

        save_store(&index_path, &meta_path, &VectorIndex::new(8), &[], "bge-m3").unwrap();

        let (loaded, loaded_meta) = load_store(&index_path, &meta_path, "bge-m3").unwrap();
        assert!(loaded.is_empty());
        assert!(loaded_meta.is_empty());
    }

    #[test]
    fn test_model_mismatch_refused() {
        let dir = TempDir::new().unwrap();
        let index_path = dir.path().join("index.bin");
        let meta_path = dir.path().join("meta.json");

        let (index, meta_records) = sample_index();
        save_store(&index_path, &meta_path, &index, &meta_records, "bge-m3").unwrap();

        let result = load_store(&index_path, &meta_path, "all-minilm");
        assert!(matches!(result, Err(AppError::StoreUnavailable(_))));
    }

    #[test]
    fn test_count_mismatch_refused() {
        let dir = TempDir::new().unwrap();
        let index_path = dir.path().join("index.bin");
        let meta_path = dir.path().join("meta.json");

        let (index, meta_records) = sample_index();
        save_store(&index_path, &meta_path, &index, &meta_records, "bge-m3").unwrap();

        // Drop one metadata record behind the store's back
        let truncated = serde_json::to_string(&meta_records[..2]).unwrap();
        fs::write(&meta_path, truncated).unwrap();

        let result = load_store(&index_path, &meta_path, "bge-m3");
        assert!(matches!(result, Err(AppError::StoreUnavailable(_))));
    }

    #[test]
    fn test_corrupt_index_refused() {
        let dir = TempDir::new().unwrap();
        let index_path = dir.path().join("index.bin");
        let meta_path = dir.path().join("meta.json");

        fs::write(&index_path, b"not an index").unwrap();
        fs::write(&meta_path, "[]").unwrap();

        let result = load_store(&index_path, &meta_path, "bge-m3");
        assert!(matches!(result, Err(AppError::StoreUnavailable(_))));
    }

    #[test]
    fn test_write_refuses_inconsistent_pair() {
        let dir = TempDir::new().unwrap();
        let (index, _) = sample_index();
        let result = save_store(
            &dir.path().join("index.bin"),
            &dir.path().join("meta.json"),
            &index,
            &[meta("only one", "a.txt")],
            "bge-m3",
        );
        assert!(result.is_err());
    }
}
