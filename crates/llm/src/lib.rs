//! Text generation for the Beatline "ask the DJ" feature.
//!
//! Provides the `TextGenerator` capability, an Ollama backend, and an
//! explicit ordered fallback chain across configured models.

pub mod fallback;
pub mod generator;
pub mod providers;

pub use fallback::FallbackGenerator;
pub use generator::{build_prompt, TextGenerator};
pub use providers::ollama::OllamaGenerator;

use beatline_core::config::GenerationSettings;
use std::sync::Arc;

/// Build the configured generation chain.
///
/// One Ollama backend per configured model, tried in list order.
pub fn create_generator(settings: &GenerationSettings) -> FallbackGenerator {
    let backends: Vec<Arc<dyn TextGenerator>> = settings
        .models
        .iter()
        .map(|model| {
            Arc::new(OllamaGenerator::new(settings.endpoint.as_deref(), model))
                as Arc<dyn TextGenerator>
        })
        .collect();

    FallbackGenerator::new(backends)
}
