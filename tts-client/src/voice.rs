//! Voice selection and audio tuning parameters.

use serde::{Deserialize, Serialize};

/// Voice used when nothing else is configured.
pub const DEFAULT_VOICE: &str = "en-US-Neural2-J";

pub const MIN_SPEAKING_RATE: f32 = 0.25;
pub const MAX_SPEAKING_RATE: f32 = 4.0;
pub const DEFAULT_SPEAKING_RATE: f32 = 1.0;

pub const MIN_PITCH: f32 = -20.0;
pub const MAX_PITCH: f32 = 20.0;
pub const DEFAULT_PITCH: f32 = 0.0;

/// Preset voices offered to the user.
pub const PRESET_VOICES: &[&str] = &[
    "en-US-Neural2-J",
    "en-US-Neural2-C",
    "en-US-Neural2-D",
    "en-US-Neural2-F",
    "en-GB-Neural2-A",
    "en-GB-Neural2-B",
    "en-GB-Neural2-C",
    "en-GB-Neural2-D",
    "en-GB-Neural2-F",
    "fr-FR-Neural2-A",
    "fr-FR-Neural2-B",
    "fr-FR-Neural2-C",
    "fr-FR-Neural2-D",
    "fr-FR-Neural2-E",
    "es-ES-Neural2-A",
    "es-ES-Neural2-B",
    "es-ES-Neural2-C",
    "es-ES-Neural2-D",
    "es-ES-Neural2-F",
];

/// Clamp a speaking rate into range; NaN and infinities fall back to the default.
pub fn clamp_speaking_rate(rate: f32) -> f32 {
    if rate.is_finite() {
        rate.clamp(MIN_SPEAKING_RATE, MAX_SPEAKING_RATE)
    } else {
        DEFAULT_SPEAKING_RATE
    }
}

/// Clamp a pitch into range; NaN and infinities fall back to the default.
pub fn clamp_pitch(pitch: f32) -> f32 {
    if pitch.is_finite() {
        pitch.clamp(MIN_PITCH, MAX_PITCH)
    } else {
        DEFAULT_PITCH
    }
}

/// Whether `name` is one of the preset voices.
pub fn is_preset_voice(name: &str) -> bool {
    PRESET_VOICES.contains(&name)
}

/// Voice identifier, speaking rate and pitch shared by every chunk of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceConfig {
    /// Voice name, e.g. "en-US-Neural2-J"
    pub voice: String,
    /// Speaking rate (0.25-4.0, default 1.0)
    pub speaking_rate: f32,
    /// Pitch in semitones (-20.0-20.0, default 0.0)
    pub pitch: f32,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            voice: DEFAULT_VOICE.to_string(),
            speaking_rate: DEFAULT_SPEAKING_RATE,
            pitch: DEFAULT_PITCH,
        }
    }
}

impl VoiceConfig {
    /// Create a voice config with default rate and pitch.
    pub fn new(voice: impl Into<String>) -> Self {
        Self {
            voice: voice.into(),
            ..Self::default()
        }
    }

    /// Set the speaking rate.
    pub fn with_speaking_rate(mut self, rate: f32) -> Self {
        self.speaking_rate = clamp_speaking_rate(rate);
        self
    }

    /// Set the pitch.
    pub fn with_pitch(mut self, pitch: f32) -> Self {
        self.pitch = clamp_pitch(pitch);
        self
    }

    /// BCP-47 language code taken from the voice name ("fr-FR-Neural2-A" -> "fr-FR").
    ///
    /// Falls back to "en-US" for names that don't start with a language tag.
    pub fn language_code(&self) -> String {
        let mut parts = self.voice.splitn(3, '-');
        match (parts.next(), parts.next()) {
            (Some(lang), Some(region))
                if lang.len() >= 2
                    && lang.chars().all(|c| c.is_ascii_lowercase())
                    && region.chars().all(|c| c.is_ascii_uppercase())
                    && !region.is_empty() =>
            {
                format!("{}-{}", lang, region)
            }
            _ => "en-US".to_string(),
        }
    }
}
