//! Byte-bounded text chunking for speech synthesis requests.

use super::sentences::split_sentences;

/// Per-request byte budget; Google caps synthesis input at 5000 bytes.
pub const MAX_CHUNK_BYTES: usize = 4500;

/// Split text into chunks whose UTF-8 length stays under `max_bytes`.
///
/// Sentences are packed greedily. Text without any `.` or `?` is packed word
/// by word instead. A single sentence or word longer than the budget becomes
/// its own chunk; nothing is ever truncated.
///
/// Each chunk is a trimmed slice of the input, so whitespace inside a chunk
/// is preserved as written.
pub fn split_text(text: &str, max_bytes: usize) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    // No sentence terminator anywhere: fall back to words
    if !text.contains(['.', '?']) {
        let words: Vec<(usize, usize)> = text
            .split_whitespace()
            .map(|word| {
                let start = word.as_ptr() as usize - text.as_ptr() as usize;
                (start, start + word.len())
            })
            .collect();

        return pack(text, &words, max_bytes);
    }

    let sentences: Vec<(usize, usize)> = split_sentences(text)
        .into_iter()
        .scan(0, |offset, piece| {
            let start = *offset;
            *offset += piece.len();
            Some(trimmed_span(start, piece))
        })
        .flatten()
        .collect();

    pack(text, &sentences, max_bytes)
}

/// Byte span of `piece` without surrounding whitespace, or None if blank.
fn trimmed_span(offset: usize, piece: &str) -> Option<(usize, usize)> {
    let trimmed = piece.trim();
    if trimmed.is_empty() {
        return None;
    }
    let leading = piece.len() - piece.trim_start().len();
    let start = offset + leading;
    Some((start, start + trimmed.len()))
}

/// Greedily merge consecutive spans while the merged slice stays under budget.
fn pack(text: &str, units: &[(usize, usize)], max_bytes: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current: Option<(usize, usize)> = None;

    for &(start, end) in units {
        current = match current {
            None => Some((start, end)),
            Some((chunk_start, _)) if end - chunk_start < max_bytes => Some((chunk_start, end)),
            Some((chunk_start, chunk_end)) => {
                chunks.push(text[chunk_start..chunk_end].to_string());
                Some((start, end))
            }
        };
    }

    if let Some((chunk_start, chunk_end)) = current {
        chunks.push(text[chunk_start..chunk_end].to_string());
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn collapse(text: &str) -> String {
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn test_chunk_short_text() {
        let chunks = split_text("Hello world. This is a test.", 100);
        assert_eq!(chunks, vec!["Hello world. This is a test."]);
    }

    #[test]
    fn test_chunk_empty_text() {
        assert!(split_text("", 100).is_empty());
    }

    #[test]
    fn test_chunk_whitespace_only() {
        assert!(split_text("   \n\n   ", 100).is_empty());
    }

    #[test]
    fn test_chunk_sentences_split_at_budget() {
        let text = "First sentence. Second sentence. Third sentence.";
        let chunks = split_text(text, 20);
        assert_eq!(
            chunks,
            vec!["First sentence.", "Second sentence.", "Third sentence."]
        );
    }

    #[test]
    fn test_chunk_packs_multiple_sentences() {
        let text = "One. Two. Three. Four.";
        let chunks = split_text(text, 12);
        assert_eq!(chunks, vec!["One. Two.", "Three.", "Four."]);
    }

    #[test]
    fn test_chunk_length_is_strictly_under_budget() {
        // The merged slice is 13 bytes
        let chunks = split_text("Ab cd. Ef gh.", 13);
        assert_eq!(chunks, vec!["Ab cd.", "Ef gh."]);
        let chunks = split_text("Ab cd. Ef gh.", 14);
        assert_eq!(chunks, vec!["Ab cd. Ef gh."]);
    }

    #[test]
    fn test_chunk_preserves_inner_whitespace() {
        let text = "  First line.\nSecond line.  ";
        let chunks = split_text(text, 100);
        assert_eq!(chunks, vec!["First line.\nSecond line."]);
    }

    #[test]
    fn test_oversized_sentence_emitted_whole() {
        let long = format!("Word{}.", " word".repeat(9));
        let text = format!("Short one. {} Tail.", long);
        let chunks = split_text(&text, 20);
        assert_eq!(chunks, vec!["Short one.".to_string(), long, "Tail.".to_string()]);
    }

    #[test]
    fn test_word_fallback_without_punctuation() {
        let text = "one two three four five";
        let chunks = split_text(text, 11);
        assert_eq!(chunks, vec!["one two", "three four", "five"]);
    }

    #[test]
    fn test_lone_oversized_sentence_emitted_whole() {
        let text = "This single sentence is far longer than the budget allows.";
        assert_eq!(split_text(text, 20), vec![text]);

        let text = "Short. This single sentence is far longer than the budget allows.";
        assert_eq!(
            split_text(text, 20),
            vec!["Short.", "This single sentence is far longer than the budget allows."]
        );
    }

    #[test]
    fn test_unsplittable_punctuated_text_kept_whole() {
        // A terminator without a following uppercase letter is no boundary
        let text = "see fig. and more words here";
        assert_eq!(split_text(text, 10), vec![text]);
    }

    #[test]
    fn test_single_huge_word() {
        let word = "x".repeat(6000);
        let chunks = split_text(&word, MAX_CHUNK_BYTES);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0], word);
    }

    #[test]
    fn test_initials_keep_content() {
        let chunks = split_text("A. B. C.", 4);
        assert!(!chunks.is_empty());
        assert!(chunks.iter().all(|c| !c.is_empty()));
        assert_eq!(collapse(&chunks.join(" ")), "A. B. C.");
    }

    #[test]
    fn test_multibyte_budget_counts_bytes() {
        // Each "é" and "É" is 2 bytes, so the whole text is 11 bytes
        let chunks = split_text("éé. Éé.", 11);
        assert_eq!(chunks, vec!["éé.", "Éé."]);
        let chunks = split_text("éé. Éé.", 12);
        assert_eq!(chunks, vec!["éé. Éé."]);
    }

    fn is_single_unit(chunk: &str) -> bool {
        split_sentences(chunk)
            .iter()
            .filter(|s| !s.trim().is_empty())
            .count()
            == 1
    }

    proptest! {
        #[test]
        fn prop_chunks_within_budget_or_single_unit(
            text in "[A-Za-zé .?\n]{0,300}",
            budget in 1usize..80,
        ) {
            for chunk in split_text(&text, budget) {
                prop_assert!(chunk.len() < budget || is_single_unit(&chunk), "chunk {:?}", chunk);
            }
        }

        #[test]
        fn prop_no_empty_or_untrimmed_chunks(
            text in "[A-Za-z .?\n\t]{0,300}",
            budget in 1usize..80,
        ) {
            for chunk in split_text(&text, budget) {
                prop_assert!(!chunk.is_empty());
                prop_assert_eq!(chunk.trim(), chunk.as_str());
            }
        }

        #[test]
        fn prop_content_preserved(
            text in "[A-Za-zÜ .?\n]{0,300}",
            budget in 1usize..80,
        ) {
            let chunks = split_text(&text, budget);
            prop_assert_eq!(collapse(&chunks.join(" ")), collapse(&text));
        }

        #[test]
        fn prop_rechunking_fitting_chunk_is_identity(
            text in "[A-Za-z .?\n]{0,300}",
            budget in 1usize..80,
        ) {
            for chunk in split_text(&text, budget) {
                if chunk.len() < budget {
                    prop_assert_eq!(split_text(&chunk, budget), vec![chunk.clone()]);
                }
            }
        }
    }
}
