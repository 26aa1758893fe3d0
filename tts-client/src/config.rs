use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, TtsError};

/// Public endpoint of the Google Cloud Text-to-Speech REST API
pub const DEFAULT_BASE_URL: &str = "https://texttospeech.googleapis.com";

/// Client configuration: endpoint and credential overrides
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// API key (optional, GOOGLE_API_KEY is used otherwise)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Pre-minted OAuth access token (optional, GOOGLE_OAUTH_ACCESS_TOKEN is used otherwise)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    /// Project billed for requests made with user credentials
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quota_project: Option<String>,

    /// Custom base URL (proxies, tests)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Path to the gcloud binary used for Application Default Credentials
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gcloud_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from `path`, returning defaults if it doesn't exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let home =
            std::env::var("HOME").map_err(|_| TtsError::ConfigError("HOME not set".into()))?;
        Ok(PathBuf::from(home).join(".config/cli-programs/google-tts.toml"))
    }

    /// Base URL with any trailing slash removed
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
    }
}
