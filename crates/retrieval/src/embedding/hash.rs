//! Deterministic trigram-hash embedding provider.
//!
//! Not semantically accurate like a real sentence-embedding model, but
//! deterministic and content-aware: shared words and character trigrams pull
//! vectors together. Used in tests and offline development, where the full
//! model is unavailable.

use super::{normalize, EmbeddingProvider};
use beatline_core::AppResult;
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

/// English and Dutch stop words; they add noise without discriminating
/// content.
fn stop_words() -> &'static HashSet<&'static str> {
    static STOP_WORDS: OnceLock<HashSet<&'static str>> = OnceLock::new();
    STOP_WORDS.get_or_init(|| {
        [
            "the", "is", "at", "which", "on", "a", "an", "as", "are", "was", "were", "for", "to",
            "of", "in", "and", "or", "but", "with", "by", "from", "this", "that", "be", "have",
            "has", "had", "it", "its", "their", "they", "them", "de", "het", "een", "en", "van",
        ]
        .into_iter()
        .collect()
    })
}

/// Offline hash-based embedding provider.
#[derive(Debug)]
pub struct HashProvider {
    model: String,
    dimensions: usize,
}

impl HashProvider {
    pub fn new(model: &str, dimensions: usize) -> Self {
        Self {
            model: model.to_string(),
            dimensions,
        }
    }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut embedding = vec![0.0f32; self.dimensions];

        let lower = text.to_lowercase();

        let stop_words = stop_words();
        let words: Vec<&str> = lower
            .split_whitespace()
            .filter(|w| !stop_words.contains(w) && w.len() > 2)
            .collect();

        let mut word_freq: HashMap<&str, u32> = HashMap::new();
        for &word in &words {
            *word_freq.entry(word).or_insert(0) += 1;
        }

        for (word, freq) in &word_freq {
            // Character trigrams spread each word over several dimensions
            let chars: Vec<char> = word.chars().collect();
            for i in 0..chars.len().saturating_sub(2) {
                let trigram = format!("{}{}{}", chars[i], chars[i + 1], chars[i + 2]);
                let trigram_hash = trigram
                    .bytes()
                    .fold(0u64, |acc, b| acc.wrapping_mul(37).wrapping_add(b as u64));

                let dim_idx = (trigram_hash as usize) % self.dimensions;
                embedding[dim_idx] += (*freq as f32).sqrt();
            }

            // Whole-word component
            let word_hash = word
                .bytes()
                .fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));
            let base_dim = (word_hash as usize) % self.dimensions;
            embedding[base_dim] += *freq as f32;
        }

        normalize(&mut embedding);
        embedding
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for HashProvider {
    fn model_name(&self) -> &str {
        &self.model
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_one(t)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> HashProvider {
        HashProvider::new("hash-trigram", 384)
    }

    #[tokio::test]
    async fn test_unit_norm() {
        let texts = vec![
            "Club night pricing is 500 euros".to_string(),
            "Contact via the website form".to_string(),
        ];
        for v in provider().embed_batch(&texts).await.unwrap() {
            let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
            assert!((norm - 1.0).abs() < 1e-5, "norm was {}", norm);
        }
    }

    #[tokio::test]
    async fn test_deterministic() {
        let p = provider();
        let a = p.embed("booking a club night").await.unwrap();
        let b = p.embed("booking a club night").await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_similar_text_scores_higher() {
        let p = provider();
        let doc_a = p.embed("club night pricing costs euros").await.unwrap();
        let doc_b = p.embed("contact website form email").await.unwrap();
        let query = p.embed("how much does a club night cost").await.unwrap();

        let dot = |a: &[f32], b: &[f32]| -> f32 {
            a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
        };

        assert!(dot(&query, &doc_a) > dot(&query, &doc_b));
    }

    #[tokio::test]
    async fn test_stop_words_carry_no_signal() {
        let p = provider();
        let v = p.embed("the and was het van een").await.unwrap();
        assert!(v.iter().all(|&x| x == 0.0));
    }

    #[tokio::test]
    async fn test_empty_text_is_zero_vector() {
        let v = provider().embed("").await.unwrap();
        assert!(v.iter().all(|&x| x == 0.0));
    }
}
