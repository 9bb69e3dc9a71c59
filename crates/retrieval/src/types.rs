//! Retrieval subsystem type definitions.

use serde::{Deserialize, Serialize};

/// A unit of raw source content produced by the loader.
///
/// Documents are transient: they exist between extraction and chunking and
/// are never persisted.
#[derive(Debug, Clone)]
pub struct Document {
    /// Stable, human-readable identifier (path or URL), used for citation
    pub source_id: String,

    /// Extracted text; may be empty when extraction failed
    pub raw_text: String,
}

impl Document {
    pub fn new(source_id: impl Into<String>, raw_text: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            raw_text: raw_text.into(),
        }
    }
}

/// A chunk metadata record, persisted to `meta.json`.
///
/// Record `i` describes vector `i` of the index; the two files are written
/// and read together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMeta {
    /// Whitespace-joined chunk text, non-empty after trimming
    pub text: String,

    /// `source_id` of the parent document
    pub source: String,
}

/// Load status of the serving-side store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadStatus {
    /// Store files present and consistent
    Loaded,
    /// Store files missing (indexer has not run)
    NotLoaded,
    /// Store files malformed or inconsistent
    Error,
}

impl LoadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Loaded => "loaded",
            Self::NotLoaded => "not_loaded",
            Self::Error => "error",
        }
    }
}

/// Read-only operational statistics for the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexStats {
    /// Load state of the store
    pub status: LoadStatus,

    /// Number of vectors in the index
    pub vectors: usize,

    /// Number of metadata records
    pub metadata_entries: usize,

    /// Embedding model identifier the serving process is configured with
    pub embedding_model: String,
}

/// Statistics from an indexing run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildStats {
    /// Documents that yielded any text
    pub documents: usize,

    /// Chunks produced before language filtering
    pub chunks_total: usize,

    /// Chunks kept after language filtering and embedded
    pub chunks_indexed: usize,

    /// Embedding dimension of the written index
    pub dimension: usize,

    /// Wall-clock duration of the run in seconds
    pub duration_secs: f64,
}
