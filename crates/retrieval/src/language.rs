//! Index-time language filtering.
//!
//! The index stays focused on the site's audience languages (Dutch and
//! English by default). Detection runs on a bounded sample of each chunk;
//! when detection cannot decide, the chunk is kept; content is never
//! dropped because the detector itself failed.

use whatlang::detect;

/// Number of characters sampled for detection.
const SAMPLE_LEN: usize = 1000;

/// Decide whether a chunk should be kept, given allowed ISO 639-3 codes
/// (whatlang codes, e.g. "eng", "nld").
pub fn keep_chunk(text: &str, allowed: &[String]) -> bool {
    let sample: String = text.chars().take(SAMPLE_LEN).collect();

    match detect(&sample) {
        Some(info) => {
            let code = info.lang().code();
            let keep = allowed.iter().any(|a| a == code);
            if !keep {
                tracing::debug!("Dropping chunk in unsupported language: {}", code);
            }
            keep
        }
        // Fail open: ambiguous or undetectable text is kept
        None => true,
    }
}
