//! Chunk-by-chunk synthesis of a whole document.
//!
//! Chunks are synthesized strictly in order, one request at a time. Each
//! result is handed to the caller's callback as soon as it arrives, so a UI
//! can show progress on long documents. The first failure ends the run.

use std::time::Duration;
use thiserror::Error;
use tts_client::{SpeechSynthesizer, SynthesisRequest, TtsError, VoiceConfig};

use crate::audio::wav_duration;
use crate::naming::NamingParams;
use crate::text::{MAX_CHUNK_BYTES, split_text};

/// Audio for one chunk of the document.
#[derive(Debug, Clone)]
pub struct SynthesisResult {
    /// 1-based position of the chunk
    pub index: usize,
    /// Number of chunks in the run
    pub total: usize,
    /// The chunk text that was synthesized
    pub text: String,
    /// WAV bytes returned by the service
    pub audio: Vec<u8>,
    /// Derived download/output file name
    pub filename: String,
    /// Playback length, when the WAV header could be read
    pub duration: Option<Duration>,
}

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("chunk {index} of {total}: {error}")]
    Synthesis {
        index: usize,
        total: usize,
        error: TtsError,
    },

    #[error("chunk {index} of {total}: {error:#}")]
    Present {
        index: usize,
        total: usize,
        error: anyhow::Error,
    },
}

/// Split `text`, synthesize every chunk in order, and report each result.
///
/// `on_result` runs right after each successful chunk; an error from it ends
/// the run like a synthesis failure. No retries: the first failure is
/// returned and the remaining chunks are never requested.
pub async fn generate<F>(
    synth: &dyn SpeechSynthesizer,
    text: &str,
    voice: &VoiceConfig,
    naming: &NamingParams,
    mut on_result: F,
) -> Result<Vec<SynthesisResult>, GenerateError>
where
    F: FnMut(&SynthesisResult) -> anyhow::Result<()>,
{
    let chunks = split_text(text, MAX_CHUNK_BYTES);
    let total = chunks.len();
    log::info!(
        "Synthesizing {} chunk(s) with {} via {}",
        total,
        voice.voice,
        synth.name()
    );

    let mut results = Vec::with_capacity(total);

    for (i, chunk) in chunks.into_iter().enumerate() {
        let index = i + 1;
        log::debug!("Chunk {}/{}: {} bytes", index, total, chunk.len());

        let request = SynthesisRequest::new(chunk, voice.clone());
        let response = synth.synthesize(&request).await.map_err(|error| {
            log::error!("Chunk {}/{} failed: {}", index, total, error);
            GenerateError::Synthesis {
                index,
                total,
                error,
            }
        })?;

        let result = SynthesisResult {
            index,
            total,
            duration: wav_duration(&response.audio),
            filename: naming.file_name(index),
            text: request.text,
            audio: response.audio,
        };

        on_result(&result).map_err(|error| GenerateError::Present {
            index,
            total,
            error,
        })?;

        log::info!("Chunk {}/{} done ({} bytes of audio)", index, total, result.audio.len());
        results.push(result);
    }

    Ok(results)
}
