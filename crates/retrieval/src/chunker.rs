//! Text chunking into overlapping word windows.

/// Minimum trimmed input length, in characters, worth chunking at all.
/// Shorter fragments carry no useful retrieval signal.
const MIN_TEXT_LEN: usize = 50;

/// Split text into overlapping word-window chunks.
///
/// Each chunk is `chunk_size` whitespace-delimited words joined by single
/// spaces; consecutive chunks share `overlap` words. The start offset
/// advances by `chunk_size - overlap`, clamped to at least one word, so the
/// loop terminates for every parameter combination.
pub fn chunk_text(text: &str, chunk_size: usize, overlap: usize) -> Vec<String> {
    if chunk_size == 0 || text.trim().chars().count() < MIN_TEXT_LEN {
        return vec![];
    }

    let words: Vec<&str> = text.split_whitespace().collect();
    let stride = chunk_size.saturating_sub(overlap).max(1);

    let mut chunks = Vec::new();
    let mut start = 0;

    while start < words.len() {
        let end = (start + chunk_size).min(words.len());
        let chunk = words[start..end].join(" ");

        if !chunk.trim().is_empty() {
            chunks.push(chunk);
        }

        start += stride;
    }

    tracing::debug!(
        "Chunked {} words into {} chunks (size: {}, overlap: {})",
        words.len(),
        chunks.len(),
        chunk_size,
        overlap
    );

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered_words(n: usize) -> String {
        (0..n).map(|i| format!("w{}", i)).collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn test_short_input_yields_nothing() {
        assert!(chunk_text("too short", 1000, 150).is_empty());
        assert!(chunk_text("", 1000, 150).is_empty());
        assert!(chunk_text("   \n\t  ", 1000, 150).is_empty());
    }

    #[test]
    fn test_min_length_counts_characters_not_bytes() {
        // 40 accented characters encode as 80 UTF-8 bytes; still too short
        let accented = "é".repeat(40);
        assert!(chunk_text(&accented, 1000, 150).is_empty());

        // 50 accented characters is exactly long enough
        let long_enough = "é".repeat(50);
        assert_eq!(chunk_text(&long_enough, 1000, 150).len(), 1);
    }

    #[test]
    fn test_single_window() {
        let text = numbered_words(40);
        let chunks = chunk_text(&text, 1000, 150);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0], text);
    }

    #[test]
    fn test_overlap_between_windows() {
        let text = numbered_words(30);
        let chunks = chunk_text(&text, 20, 5);
        // stride 15: windows start at 0, 15
        assert_eq!(chunks.len(), 2);
        assert!(chunks[0].ends_with("w15 w16 w17 w18 w19"));
        assert!(chunks[1].starts_with("w15 w16 w17 w18 w19"));
    }

    #[test]
    fn test_every_word_covered() {
        let text = numbered_words(137);
        let chunks = chunk_text(&text, 20, 7);

        let mut seen = vec![false; 137];
        for chunk in &chunks {
            for word in chunk.split_whitespace() {
                let i: usize = word[1..].parse().unwrap();
                seen[i] = true;
            }
        }
        assert!(seen.iter().all(|&s| s), "stride left a gap in coverage");
    }

    #[test]
    fn test_terminates_when_overlap_exceeds_size() {
        // stride clamps to 1 instead of looping forever
        let text = numbered_words(25);
        let chunks = chunk_text(&text, 10, 50);
        assert_eq!(chunks.len(), 25);
    }

    #[test]
    fn test_no_empty_chunks() {
        let text = numbered_words(100);
        for chunk in chunk_text(&text, 13, 4) {
            assert!(!chunk.trim().is_empty());
        }
    }
}
