use async_trait::async_trait;

use crate::error::Result;
use crate::voice::VoiceConfig;

/// One chunk of text to synthesize
#[derive(Debug, Clone)]
pub struct SynthesisRequest {
    pub text: String,
    pub voice: VoiceConfig,
}

impl SynthesisRequest {
    pub fn new(text: impl Into<String>, voice: VoiceConfig) -> Self {
        Self {
            text: text.into(),
            voice,
        }
    }
}

/// Audio returned by a synthesizer
#[derive(Debug, Clone)]
pub struct SynthesisResponse {
    /// LINEAR16 PCM in a WAV container
    pub audio: Vec<u8>,
}

/// Trait for speech synthesis backends
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Convert one chunk of text into audio
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<SynthesisResponse>;

    /// Get the backend name for display
    fn name(&self) -> &'static str;

    /// Check if the backend is usable (credentials resolved, etc.)
    fn is_available(&self) -> Result<()>;
}
