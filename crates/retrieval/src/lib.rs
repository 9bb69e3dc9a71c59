//! Retrieval subsystem for the Beatline "ask the DJ" feature.
//!
//! An offline indexer builds a vector store over chunked site and document
//! content; at request time the retriever embeds the query, runs exact
//! inner-product search, and formats the top-k chunks into a context string
//! for the chat route.
//!
//! Build-time flow: loader → chunker → language filter → embedder → store.
//! Query-time flow: query → embedder → store search → formatted context.

pub mod chunker;
pub mod embedding;
pub mod indexer;
pub mod language;
pub mod loader;
pub mod retriever;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use embedding::{create_provider, EmbeddingProvider};
pub use indexer::build_index;
pub use retriever::{Retriever, DEFAULT_TOP_K};
pub use types::{BuildStats, ChunkMeta, Document, IndexStats, LoadStatus};
