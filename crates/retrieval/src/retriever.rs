//! Query-time retrieval over the persisted store.
//!
//! The `Retriever` is the serving process's handle to the store pair. It is
//! created once by the composition root and shared; the store files are
//! loaded lazily on the first call and cached for the process lifetime.
//!
//! Retrieval never propagates an error to its caller: a missing or corrupt
//! store, an embedding failure, or a search failure all degrade to an empty
//! context string. The chat route answers ungrounded in that case; absent
//! context lowers answer quality but never breaks the user flow.

use crate::embedding::EmbeddingProvider;
use crate::store::{self, VectorIndex};
use crate::types::{ChunkMeta, IndexStats, LoadStatus};
use beatline_core::{AppError, AppResult, RagConfig};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Default number of chunks retrieved per query.
pub const DEFAULT_TOP_K: usize = 5;

/// Store label used when a metadata record carries no source.
const UNKNOWN_SOURCE: &str = "unknown source";

/// Immutable store snapshot shared across requests once loaded.
#[derive(Debug)]
struct LoadedStore {
    index: VectorIndex,
    meta: Vec<ChunkMeta>,
}

/// Load state over the process lifetime.
///
/// `Unavailable` is sticky: after a failed load, every later call returns
/// empty context without retrying (no reload storm), until `reload()` or a
/// process restart.
#[derive(Debug)]
enum LoadState {
    Unloaded,
    Loaded(Arc<LoadedStore>),
    Unavailable(LoadStatus),
}

/// Serving-side retrieval handle.
#[derive(Debug)]
pub struct Retriever {
    config: RagConfig,
    embedder: Arc<dyn EmbeddingProvider>,
    state: Mutex<LoadState>,
}

impl Retriever {
    /// Create a retriever over the configured store and a shared embedder.
    ///
    /// The embedder must be the same model the indexer was configured with;
    /// the store refuses to load otherwise.
    pub fn new(config: RagConfig, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            config,
            embedder,
            state: Mutex::new(LoadState::Unloaded),
        }
    }

    /// Retrieve relevant context chunks for the given query.
    ///
    /// Returns a formatted context string of at most `k` source-labeled
    /// blocks, or an empty string when nothing relevant is available or any
    /// internal step fails.
    pub async fn retrieve(&self, query: &str, k: usize) -> String {
        match self.try_retrieve(query, k).await {
            Ok(context) => context,
            Err(e) => {
                tracing::error!("Error in retrieval: {}", e);
                String::new()
            }
        }
    }

    /// Read-only operational statistics. No side effects beyond triggering
    /// the one-shot lazy load.
    pub async fn stats(&self) -> IndexStats {
        let (status, vectors, metadata_entries) = match self.load_or_cached().await {
            Ok(store) => (LoadStatus::Loaded, store.index.len(), store.meta.len()),
            Err(status) => (status, 0, 0),
        };

        IndexStats {
            status,
            vectors,
            metadata_entries,
            embedding_model: self.embedder.model_name().to_string(),
        }
    }

    /// Drop any cached or failed load state, forcing a fresh load on the
    /// next call. Used by tests and after an offline reindex.
    pub async fn reload(&self) {
        let mut state = self.state.lock().await;
        *state = LoadState::Unloaded;
        tracing::info!("Retriever state reset; store will reload on next call");
    }

    async fn try_retrieve(&self, query: &str, k: usize) -> AppResult<String> {
        let store = match self.load_or_cached().await {
            Ok(store) => store,
            Err(_) => {
                tracing::info!("No RAG store available, returning empty context");
                return Ok(String::new());
            }
        };

        if store.meta.is_empty() {
            return Ok(String::new());
        }

        let query_embedding = self
            .embedder
            .embed(query)
            .await
            .map_err(|e| AppError::Retrieval(format!("Query embedding failed: {}", e)))?;

        let results = store.index.search(&query_embedding, k)?;

        let mut context_chunks = Vec::new();
        for (idx, _score) in results {
            // Defensive: an index/metadata mismatch drops the single result,
            // never the request
            let Some(record) = store.meta.get(idx) else {
                tracing::warn!("Search returned position {} with no metadata entry", idx);
                continue;
            };

            let text = record.text.trim();
            if text.is_empty() {
                continue;
            }

            context_chunks.push(format!("[Source: {}]\n{}", source_label(&record.source), text));
        }

        if context_chunks.is_empty() {
            tracing::info!("No relevant chunks found for query");
            return Ok(String::new());
        }

        tracing::info!(
            "Retrieved {} relevant chunks for query: {:.50}",
            context_chunks.len(),
            query
        );

        Ok(context_chunks.join("\n\n"))
    }

    /// One-shot lazy load. At most one caller performs the load; the result
    /// (including failure) is cached until `reload()`.
    async fn load_or_cached(&self) -> Result<Arc<LoadedStore>, LoadStatus> {
        let mut state = self.state.lock().await;

        match &*state {
            LoadState::Loaded(store) => return Ok(Arc::clone(store)),
            LoadState::Unavailable(status) => return Err(*status),
            LoadState::Unloaded => {}
        }

        let index_path = self.config.index_path();
        let meta_path = self.config.meta_path();

        if !index_path.exists() || !meta_path.exists() {
            tracing::warn!(
                "RAG store not found at {:?} / {:?}; run the indexer to create it",
                index_path,
                meta_path
            );
            *state = LoadState::Unavailable(LoadStatus::NotLoaded);
            return Err(LoadStatus::NotLoaded);
        }

        match store::load_store(&index_path, &meta_path, self.embedder.model_name()) {
            Ok((index, meta)) => {
                let store = Arc::new(LoadedStore { index, meta });
                *state = LoadState::Loaded(Arc::clone(&store));
                Ok(store)
            }
            Err(e) => {
                tracing::error!("Error loading RAG store: {}", e);
                *state = LoadState::Unavailable(LoadStatus::Error);
                Err(LoadStatus::Error)
            }
        }
    }
}

/// Basename of the source path or URL, for display in context blocks.
fn source_label(source: &str) -> String {
    let trimmed = source.trim();
    if trimmed.is_empty() {
        return UNKNOWN_SOURCE.to_string();
    }

    Path::new(trimmed)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| trimmed.to_string())
}
