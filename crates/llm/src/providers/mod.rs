//! Text generation provider implementations.

pub mod ollama;
