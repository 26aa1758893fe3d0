//! Audio inspection for synthesized WAV payloads.

mod wav;

pub use wav::{format_duration, wav_duration};

#[cfg(test)]
pub use wav::test_wav;
