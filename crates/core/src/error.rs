//! Error types for the Beatline backend.
//!
//! This module defines a unified error enum covering all error categories
//! in the application: configuration, I/O, source extraction, the vector
//! store, retrieval, and text generation.

use thiserror::Error;

/// Unified error type for the Beatline backend.
///
/// All fallible functions in the workspace return `Result<T, AppError>`.
/// We never panic; errors must be represented and propagated.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Per-document extraction failures (indexing time, never fatal to a batch)
    #[error("Source read error: {0}")]
    SourceRead(String),

    /// Vector store missing, malformed, or inconsistent at load time
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// Embedding or search failure during an otherwise-loaded store
    #[error("Retrieval error: {0}")]
    Retrieval(String),

    /// Text generation provider errors
    #[error("LLM error: {0}")]
    Llm(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
