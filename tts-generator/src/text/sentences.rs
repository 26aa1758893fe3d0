//! Sentence boundary heuristic.
//!
//! A boundary sits right after `.` or `?` when whitespace follows and the next
//! non-space character is uppercase (or the text ends). Candidates after
//! abbreviations like "U.S.", "Mr." and single-letter initials ("J. Smith")
//! are ignored. Decimals, ellipses and rarer abbreviations can still split
//! wrongly.

use regex::Regex;
use std::sync::OnceLock;

/// Global pattern instance (lazy initialization).
static SENTENCE_END: OnceLock<Regex> = OnceLock::new();

fn sentence_end() -> &'static Regex {
    SENTENCE_END.get_or_init(|| {
        Regex::new(r"[.?]\s+(?:\p{Lu}|$)").expect("sentence boundary pattern should compile")
    })
}

/// Split text into untrimmed sentence slices that partition the input.
///
/// Concatenating the returned slices yields `text` exactly.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;

    for m in sentence_end().find_iter(text) {
        // The punctuation is a single ASCII byte
        let boundary = m.start() + 1;
        if is_abbreviation(&text[..boundary]) {
            continue;
        }
        sentences.push(&text[start..boundary]);
        start = boundary;
    }

    if start < text.len() {
        sentences.push(&text[start..]);
    }

    sentences
}

/// Check whether the text ending in `.`/`?` ends with an abbreviation or initial.
fn is_abbreviation(prefix: &str) -> bool {
    let mut rev = prefix.chars().rev();
    let punct = rev.next();
    let c1 = rev.next();
    let c2 = rev.next();
    let c3 = rev.next();

    // "U.S." / "e.g."
    if let (Some(c1), Some('.'), Some(c3)) = (c1, c2, c3) {
        if is_word_char(c1) && is_word_char(c3) {
            return true;
        }
    }

    if punct != Some('.') {
        return false;
    }

    match (c1, c2) {
        // "Mr." / "Dr."
        (Some(c1), Some(c2)) if c2.is_ascii_uppercase() && c1.is_ascii_lowercase() => true,
        // Lone initial: "J." at the start of the text or after a non-word character
        (Some(c1), c2) if c1.is_uppercase() => c2.is_none_or(|c| !is_word_char(c)),
        _ => false,
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
