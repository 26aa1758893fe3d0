//! Text processing for synthesis: decoding, sentence detection and byte-bounded chunking.

pub mod chunker;
mod sentences;

pub use chunker::{MAX_CHUNK_BYTES, split_text};

/// Decode uploaded bytes as UTF-8, replacing invalid sequences with U+FFFD.
pub fn decode_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
