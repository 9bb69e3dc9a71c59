//! Configuration management for the Beatline backend.
//!
//! Handles loading and merging configuration from multiple sources:
//! - Environment variables (`BEATLINE_*`)
//! - Command-line flags
//! - Config file (`rag.yaml`)
//!
//! The same file is read by the offline indexer and the serving process, so
//! the embedding model identifier is guaranteed to come from one place.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Default embedding model. Multilingual, handles Dutch and English well.
pub const DEFAULT_EMBEDDING_MODEL: &str = "bge-m3";

/// Default embedding dimension for the default model.
pub const DEFAULT_EMBEDDING_DIM: usize = 1024;

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RagConfig {
    /// Directory holding the persisted store pair (index.bin + meta.json)
    #[serde(default = "default_store_dir")]
    pub store_dir: PathBuf,

    /// Root directories scanned by the indexer
    #[serde(default = "default_content_roots")]
    pub content_roots: Vec<PathBuf>,

    /// Live website page fetched during indexing (optional)
    #[serde(default)]
    pub site_url: Option<String>,

    /// Embedding provider settings
    #[serde(default)]
    pub embedding: EmbeddingSettings,

    /// Text generation settings (ask path)
    #[serde(default)]
    pub generation: GenerationSettings,

    /// Chunk size in words
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Overlap between consecutive chunks, in words
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,

    /// Languages kept by the index-time filter (whatlang ISO 639-3 codes)
    #[serde(default = "default_languages")]
    pub languages: Vec<String>,

    /// Default number of chunks retrieved per query
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Log level override
    #[serde(default)]
    pub log_level: Option<String>,

    /// Disable colored output
    #[serde(default)]
    pub no_color: bool,
}

/// Embedding provider configuration.
///
/// The model identifier must be identical between the offline indexer and
/// the serving process; the store refuses to load when it differs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingSettings {
    /// Provider name: "ollama" or "hash"
    pub provider: String,

    /// Model identifier (e.g., "bge-m3")
    pub model: String,

    /// Embedding vector dimension
    pub dimensions: usize,

    /// Provider endpoint (Ollama base URL)
    #[serde(default)]
    pub endpoint: Option<String>,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            provider: "ollama".to_string(),
            model: DEFAULT_EMBEDDING_MODEL.to_string(),
            dimensions: DEFAULT_EMBEDDING_DIM,
            endpoint: None,
        }
    }
}

/// Text generation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationSettings {
    /// Ordered model fallback list; the first model that answers wins
    pub models: Vec<String>,

    /// Generation endpoint (Ollama base URL)
    #[serde(default)]
    pub endpoint: Option<String>,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            models: vec!["llama3.2".to_string()],
            endpoint: None,
        }
    }
}

fn default_store_dir() -> PathBuf {
    PathBuf::from("rag_store")
}

fn default_content_roots() -> Vec<PathBuf> {
    vec![PathBuf::from("content")]
}

fn default_chunk_size() -> usize {
    1000
}

fn default_chunk_overlap() -> usize {
    150
}

fn default_languages() -> Vec<String> {
    vec!["eng".to_string(), "nld".to_string()]
}

fn default_top_k() -> usize {
    5
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            store_dir: default_store_dir(),
            content_roots: default_content_roots(),
            site_url: None,
            embedding: EmbeddingSettings::default(),
            generation: GenerationSettings::default(),
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            languages: default_languages(),
            top_k: default_top_k(),
            log_level: None,
            no_color: false,
        }
    }
}

impl RagConfig {
    /// Load configuration from the config file and environment variables.
    ///
    /// Environment variables:
    /// - `BEATLINE_CONFIG`: path to the config file (default `rag.yaml`)
    /// - `BEATLINE_STORE_DIR`: override store directory
    /// - `BEATLINE_EMBED_PROVIDER` / `BEATLINE_EMBED_MODEL`: embedder override
    /// - `RUST_LOG`: log level
    /// - `NO_COLOR`: disable colored output
    pub fn load() -> AppResult<Self> {
        let config_path = std::env::var("BEATLINE_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("rag.yaml"));

        let mut config = if config_path.exists() {
            Self::from_file(&config_path)?
        } else {
            Self::default()
        };

        // Environment variables override the file
        if let Ok(dir) = std::env::var("BEATLINE_STORE_DIR") {
            config.store_dir = PathBuf::from(dir);
        }

        if let Ok(provider) = std::env::var("BEATLINE_EMBED_PROVIDER") {
            config.embedding.provider = provider;
        }

        if let Ok(model) = std::env::var("BEATLINE_EMBED_MODEL") {
            config.embedding.model = model;
        }

        config.log_level = std::env::var("RUST_LOG").ok().or(config.log_level);

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Parse a YAML config file.
    pub fn from_file(path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })
    }

    /// Apply CLI overrides, which take precedence over file and environment.
    pub fn with_overrides(
        mut self,
        store_dir: Option<PathBuf>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(store_dir) = store_dir {
            self.store_dir = store_dir;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose && self.log_level.is_none() {
            self.log_level = Some("debug".to_string());
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Path of the persisted vector index file.
    pub fn index_path(&self) -> PathBuf {
        self.store_dir.join("index.bin")
    }

    /// Path of the persisted chunk metadata file.
    pub fn meta_path(&self) -> PathBuf {
        self.store_dir.join("meta.json")
    }

    /// Validate configuration invariants.
    pub fn validate(&self) -> AppResult<()> {
        if self.chunk_size == 0 {
            return Err(AppError::Config("chunk_size must be at least 1".to_string()));
        }

        if self.chunk_overlap >= self.chunk_size {
            return Err(AppError::Config(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }

        let known_providers = ["ollama", "hash"];
        if !known_providers.contains(&self.embedding.provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown embedding provider: {}. Supported: {}",
                self.embedding.provider,
                known_providers.join(", ")
            )));
        }

        if self.embedding.dimensions == 0 {
            return Err(AppError::Config(
                "embedding dimensions must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
