//! Speech synthesis provider implementations

mod google;
pub mod mock;

pub use google::GoogleTtsProvider;
pub use mock::MockSynthesizer;

use crate::config::Config;
use crate::credentials::{resolve_credential, resolve_quota_project};
use crate::error::Result;
use crate::provider::SpeechSynthesizer;

/// Create a Google synthesizer, resolving credentials from config and environment.
///
/// Called once per generation run; nothing is cached between runs.
pub async fn get_synthesizer(config: &Config) -> Result<Box<dyn SpeechSynthesizer>> {
    let credential = resolve_credential(config).await?;
    let quota_project = resolve_quota_project(config);

    let provider = GoogleTtsProvider::new(config.base_url(), credential, quota_project);
    provider.is_available()?;

    Ok(Box::new(provider))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TtsError;

    #[tokio::test]
    async fn test_get_synthesizer_with_config_key() {
        let config = Config {
            api_key: Some("test-key".to_string()),
            ..Config::default()
        };
        let synth = get_synthesizer(&config).await.unwrap();
        assert_eq!(synth.name(), "Google Cloud Text-to-Speech");
    }

    #[tokio::test]
    async fn test_get_synthesizer_rejects_bad_base_url() {
        let config = Config {
            api_key: Some("test-key".to_string()),
            base_url: Some("localhost without scheme".to_string()),
            ..Config::default()
        };
        let err = get_synthesizer(&config).await.err().unwrap();
        assert!(matches!(err, TtsError::ConfigError(_)));
    }
}
