//! tts-generator configuration: default voice settings and server address.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tts_client::voice::{
    DEFAULT_PITCH, DEFAULT_SPEAKING_RATE, DEFAULT_VOICE, clamp_pitch, clamp_speaking_rate,
};
use tts_client::VoiceConfig;

const DEFAULT_LISTEN: &str = "127.0.0.1:8501";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Default voice preset
    #[serde(default = "default_voice")]
    pub voice: String,

    /// Speaking rate (0.25-4.0)
    #[serde(default = "default_speaking_rate")]
    pub speaking_rate: f32,

    /// Pitch in semitones (-20.0-20.0)
    #[serde(default = "default_pitch")]
    pub pitch: f32,

    /// Address the web UI listens on
    #[serde(default = "default_listen")]
    pub listen: String,
}

fn default_voice() -> String {
    DEFAULT_VOICE.to_string()
}

fn default_speaking_rate() -> f32 {
    DEFAULT_SPEAKING_RATE
}

fn default_pitch() -> f32 {
    DEFAULT_PITCH
}

fn default_listen() -> String {
    DEFAULT_LISTEN.to_string()
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            voice: default_voice(),
            speaking_rate: default_speaking_rate(),
            pitch: default_pitch(),
            listen: default_listen(),
        }
    }
}

impl GeneratorConfig {
    /// Get the config file path: ~/.config/cli-programs/tts-generator.toml
    pub fn config_path() -> Result<PathBuf> {
        let home = std::env::var("HOME").or_else(|_| std::env::var("USERPROFILE"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("cli-programs")
            .join("tts-generator.toml"))
    }

    /// Load config from file, returning default if file doesn't exist
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let config: GeneratorConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    /// Voice settings with rate and pitch clamped to their valid ranges
    pub fn voice_config(&self) -> VoiceConfig {
        VoiceConfig::new(self.voice.clone())
            .with_speaking_rate(self.speaking_rate)
            .with_pitch(self.pitch)
    }

    pub fn set_speaking_rate(&mut self, rate: f32) {
        self.speaking_rate = clamp_speaking_rate(rate);
    }

    pub fn set_pitch(&mut self, pitch: f32) {
        self.pitch = clamp_pitch(pitch);
    }
}
