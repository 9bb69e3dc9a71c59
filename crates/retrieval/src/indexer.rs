//! Offline indexing pipeline.
//!
//! One-shot full rebuild: load documents, chunk, filter by language, embed,
//! and write the store pair. Runs offline (model load plus encoding of
//! potentially thousands of chunks can take minutes) and is never part of
//! the request path.

use crate::chunker::chunk_text;
use crate::embedding::EmbeddingProvider;
use crate::language::keep_chunk;
use crate::loader::load_documents;
use crate::store::{save_store, VectorIndex};
use crate::types::{BuildStats, ChunkMeta};
use beatline_core::{AppResult, RagConfig};
use std::sync::Arc;
use std::time::Instant;

/// Number of chunks embedded per provider call.
const EMBED_BATCH_SIZE: usize = 32;

/// Build the vector store from all configured sources.
///
/// Zero surviving chunks still writes a valid, empty store so the serving
/// process loads cleanly and degrades to empty context.
pub async fn build_index(
    config: &RagConfig,
    embedder: Arc<dyn EmbeddingProvider>,
) -> AppResult<BuildStats> {
    let start = Instant::now();

    tracing::info!("Starting content indexing");
    tracing::info!("Store directory: {:?}", config.store_dir);
    tracing::info!("Embedding model: {}", embedder.model_name());

    let documents = load_documents(&config.content_roots, config.site_url.as_deref()).await;

    // Chunk every document into overlapping word windows
    let mut candidates: Vec<ChunkMeta> = Vec::new();
    for doc in &documents {
        let chunks = chunk_text(&doc.raw_text, config.chunk_size, config.chunk_overlap);
        if !chunks.is_empty() {
            tracing::debug!("Added {} chunks from {}", chunks.len(), doc.source_id);
        }
        for text in chunks {
            candidates.push(ChunkMeta {
                text,
                source: doc.source_id.clone(),
            });
        }
    }

    let chunks_total = candidates.len();
    tracing::info!("Total chunks produced: {}", chunks_total);

    // Keep the index focused on the supported languages
    let kept: Vec<ChunkMeta> = candidates
        .into_iter()
        .filter(|c| keep_chunk(&c.text, &config.languages))
        .collect();

    tracing::info!("Chunks after language filtering: {}", kept.len());

    // Embed in batches and build the flat index
    let mut index = VectorIndex::new(embedder.dimensions());
    for batch in kept.chunks(EMBED_BATCH_SIZE) {
        let texts: Vec<String> = batch.iter().map(|c| c.text.clone()).collect();
        let embeddings = embedder.embed_batch(&texts).await?;
        for embedding in &embeddings {
            index.add(embedding)?;
        }
    }

    save_store(
        &config.index_path(),
        &config.meta_path(),
        &index,
        &kept,
        embedder.model_name(),
    )?;

    let stats = BuildStats {
        documents: documents.len(),
        chunks_total,
        chunks_indexed: kept.len(),
        dimension: embedder.dimensions(),
        duration_secs: start.elapsed().as_secs_f64(),
    };

    tracing::info!(
        "Indexing complete: {} chunks from {} documents in {:.2}s",
        stats.chunks_indexed,
        stats.documents,
        stats.duration_secs
    );

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::hash::HashProvider;
    use crate::store::load_store;
    use tempfile::TempDir;

    fn test_config(dir: &TempDir) -> RagConfig {
        let mut config = RagConfig::default();
        config.store_dir = dir.path().join("rag_store");
        config.content_roots = vec![dir.path().join("content")];
        config.site_url = None;
        config.chunk_size = 50;
        config.chunk_overlap = 10;
        config
    }

    fn embedder() -> Arc<dyn EmbeddingProvider> {
        Arc::new(HashProvider::new("hash-trigram", 64))
    }

    #[tokio::test]
    async fn test_build_from_text_files() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        std::fs::create_dir_all(&config.content_roots[0]).unwrap();
        std::fs::write(
            config.content_roots[0].join("pricing.txt"),
            "A full club night booking costs five hundred euros and includes \
             a two hour set with lights and sound equipment provided.",
        )
        .unwrap();

        let stats = build_index(&config, embedder()).await.unwrap();

        assert_eq!(stats.documents, 1);
        assert!(stats.chunks_indexed >= 1);
        assert_eq!(stats.dimension, 64);

        let (index, meta) =
            load_store(&config.index_path(), &config.meta_path(), "hash-trigram").unwrap();
        assert_eq!(index.len(), meta.len());
        assert!(meta.iter().all(|m| !m.text.trim().is_empty()));
        assert!(meta[0].source.ends_with("pricing.txt"));
    }

    #[tokio::test]
    async fn test_zero_documents_writes_empty_store() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        // Content root exists but holds nothing indexable
        std::fs::create_dir_all(&config.content_roots[0]).unwrap();

        let stats = build_index(&config, embedder()).await.unwrap();
        assert_eq!(stats.chunks_indexed, 0);

        let (index, meta) =
            load_store(&config.index_path(), &config.meta_path(), "hash-trigram").unwrap();
        assert!(index.is_empty());
        assert!(meta.is_empty());
    }

    #[tokio::test]
    async fn test_rebuild_replaces_store() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        std::fs::create_dir_all(&config.content_roots[0]).unwrap();
        let file = config.content_roots[0].join("about.txt");

        std::fs::write(
            &file,
            "The artist has played club nights and festivals across the \
             Netherlands for more than ten years running.",
        )
        .unwrap();
        build_index(&config, embedder()).await.unwrap();

        std::fs::remove_file(&file).unwrap();
        let stats = build_index(&config, embedder()).await.unwrap();

        assert_eq!(stats.chunks_indexed, 0);
        let (index, _) =
            load_store(&config.index_path(), &config.meta_path(), "hash-trigram").unwrap();
        assert!(index.is_empty());
    }
}
