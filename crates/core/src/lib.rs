//! Beatline Core Library
//!
//! Foundational utilities shared across the Beatline backend:
//! - Error handling (`AppError`, `AppResult`)
//! - Logging infrastructure
//! - Configuration management

pub mod config;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use config::RagConfig;
pub use error::{AppError, AppResult};
