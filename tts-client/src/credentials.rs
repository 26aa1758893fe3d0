//! Ambient credential resolution for Google Cloud.
//!
//! Order: API key (config, then `GOOGLE_API_KEY`), access token (config, then
//! `GOOGLE_OAUTH_ACCESS_TOKEN`), then Application Default Credentials through
//! `gcloud auth application-default print-access-token`.

use reqwest::RequestBuilder;
use std::path::PathBuf;
use tokio::process::Command;

use crate::config::Config;
use crate::error::{Result, TtsError};

pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";
pub const ACCESS_TOKEN_ENV: &str = "GOOGLE_OAUTH_ACCESS_TOKEN";
pub const QUOTA_PROJECT_ENV: &str = "GOOGLE_CLOUD_QUOTA_PROJECT";

/// A resolved credential, ready to attach to requests
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    ApiKey(String),
    AccessToken(String),
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ApiKey(_) => f.write_str("ApiKey(..)"),
            Self::AccessToken(_) => f.write_str("AccessToken(..)"),
        }
    }
}

impl Credential {
    /// Whether the key or token is blank
    pub fn is_blank(&self) -> bool {
        match self {
            Self::ApiKey(secret) | Self::AccessToken(secret) => secret.trim().is_empty(),
        }
    }

    /// Attach this credential to an outgoing request
    pub fn apply(&self, builder: RequestBuilder) -> RequestBuilder {
        match self {
            Self::ApiKey(key) => builder.header("x-goog-api-key", key),
            Self::AccessToken(token) => builder.bearer_auth(token),
        }
    }
}

/// Resolve credentials from config, environment, then gcloud
pub async fn resolve_credential(config: &Config) -> Result<Credential> {
    if let Some(credential) = from_static_sources(config, |name| std::env::var(name).ok()) {
        log::debug!("Using {:?} from config or environment", credential);
        return Ok(credential);
    }

    let gcloud = find_gcloud(config.gcloud_path.clone())?;
    log::debug!("Fetching access token via {}", gcloud.display());
    let token = gcloud_access_token(&gcloud).await?;
    Ok(Credential::AccessToken(token))
}

/// Quota project from config or environment
pub fn resolve_quota_project(config: &Config) -> Option<String> {
    config
        .quota_project
        .clone()
        .or_else(|| std::env::var(QUOTA_PROJECT_ENV).ok())
        .filter(|p| !p.trim().is_empty())
}

/// Credentials that need no subprocess: config values first, then environment.
fn from_static_sources(
    config: &Config,
    env: impl Fn(&str) -> Option<String>,
) -> Option<Credential> {
    let non_empty = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

    if let Some(key) = non_empty(config.api_key.clone()).or_else(|| non_empty(env(API_KEY_ENV))) {
        return Some(Credential::ApiKey(key));
    }

    non_empty(config.access_token.clone())
        .or_else(|| non_empty(env(ACCESS_TOKEN_ENV)))
        .map(Credential::AccessToken)
}

fn find_gcloud(configured: Option<PathBuf>) -> Result<PathBuf> {
    match configured {
        Some(path) => {
            if !path.exists() {
                return Err(TtsError::ConfigError(format!(
                    "gcloud not found at specified path: {}",
                    path.display()
                )));
            }
            Ok(path)
        }
        None => which::which("gcloud").map_err(|_| TtsError::MissingCredentials),
    }
}

async fn gcloud_access_token(gcloud: &PathBuf) -> Result<String> {
    let output = Command::new(gcloud)
        .args(["auth", "application-default", "print-access-token"])
        .output()
        .await
        .map_err(|e| TtsError::CredentialCommand(format!("Failed to execute gcloud: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(TtsError::CredentialCommand(format!(
            "gcloud failed: {}",
            stderr.trim()
        )));
    }

    let token = String::from_utf8(output.stdout)
        .map_err(|e| TtsError::CredentialCommand(format!("Invalid UTF-8: {}", e)))?
        .trim()
        .to_string();

    if token.is_empty() {
        return Err(TtsError::CredentialCommand(
            "gcloud returned an empty access token".into(),
        ));
    }

    Ok(token)
}
