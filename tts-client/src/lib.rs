//! Google Cloud Text-to-Speech client for the tts-generator workspace
//!
//! Provides:
//! - A `SpeechSynthesizer` trait with a REST implementation for Google
//! - Ambient credential resolution (API key, access token, gcloud ADC)
//! - A scriptable mock for tests

pub mod config;
pub mod credentials;
pub mod error;
pub mod provider;
pub mod providers;
pub mod voice;

pub use config::Config;
pub use credentials::Credential;
pub use error::{Result, TtsError};
pub use provider::{SpeechSynthesizer, SynthesisRequest, SynthesisResponse};
pub use providers::{GoogleTtsProvider, MockSynthesizer, get_synthesizer};
pub use voice::{DEFAULT_VOICE, PRESET_VOICES, VoiceConfig, is_preset_voice};
