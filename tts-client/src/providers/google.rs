//! Google Cloud Text-to-Speech provider
//!
//! Direct HTTP implementation of `POST /v1/text:synthesize`.

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::credentials::Credential;
use crate::error::{Result, TtsError};
use crate::provider::{SpeechSynthesizer, SynthesisRequest, SynthesisResponse};

/// Uncompressed 16-bit PCM, returned inside a WAV container
const AUDIO_ENCODING: &str = "LINEAR16";

/// Provider for the Google Cloud Text-to-Speech REST API
pub struct GoogleTtsProvider {
    base_url: String,
    credential: Credential,
    quota_project: Option<String>,
    client: Client,
}

impl GoogleTtsProvider {
    /// Create a new provider against `base_url`
    pub fn new(base_url: &str, credential: Credential, quota_project: Option<String>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            credential,
            quota_project,
            client: Client::new(),
        }
    }
}

// Google API request/response types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeRequest<'a> {
    input: SynthesisInput<'a>,
    voice: VoiceSelectionParams<'a>,
    audio_config: AudioConfig,
}

#[derive(Debug, Serialize)]
struct SynthesisInput<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceSelectionParams<'a> {
    language_code: String,
    name: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AudioConfig {
    audio_encoding: &'static str,
    speaking_rate: f32,
    pitch: f32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeResponse {
    #[serde(default)]
    audio_content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

fn build_request(request: &SynthesisRequest) -> SynthesizeRequest<'_> {
    SynthesizeRequest {
        input: SynthesisInput {
            text: &request.text,
        },
        voice: VoiceSelectionParams {
            language_code: request.voice.language_code(),
            name: &request.voice.voice,
        },
        audio_config: AudioConfig {
            audio_encoding: AUDIO_ENCODING,
            speaking_rate: request.voice.speaking_rate,
            pitch: request.voice.pitch,
        },
    }
}

/// Map a non-success status and body to an error
fn error_from_status(status: u16, body: &str) -> TtsError {
    let message = match serde_json::from_str::<ErrorResponse>(body) {
        Ok(error_response) => error_response.error.message,
        Err(_) => body.to_string(),
    };

    match status {
        401 | 403 => TtsError::Unauthorized {
            message,
            status_code: status,
        },
        429 => TtsError::RateLimited { message },
        _ => TtsError::ApiError {
            message,
            status_code: Some(status),
        },
    }
}

fn decode_audio(response: SynthesizeResponse) -> Result<Vec<u8>> {
    let content = response
        .audio_content
        .filter(|c| !c.is_empty())
        .ok_or_else(|| TtsError::InvalidResponse("response has no audioContent".into()))?;

    BASE64
        .decode(content.as_bytes())
        .map_err(|e| TtsError::InvalidResponse(format!("audioContent is not base64: {}", e)))
}

#[async_trait]
impl SpeechSynthesizer for GoogleTtsProvider {
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<SynthesisResponse> {
        let url = format!("{}/v1/text:synthesize", self.base_url);
        let body = build_request(request);

        let mut builder = self
            .client
            .post(&url)
            .header("Content-Type", "application/json");
        builder = self.credential.apply(builder);
        if let Some(project) = &self.quota_project {
            builder = builder.header("x-goog-user-project", project);
        }

        let response = builder
            .json(&body)
            .send()
            .await
            .map_err(|e| TtsError::ApiError {
                message: format!("Request failed: {}", e),
                status_code: None,
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(error_from_status(status.as_u16(), &error_text));
        }

        let api_response: SynthesizeResponse =
            response.json().await.map_err(|e| TtsError::InvalidResponse(format!(
                "Failed to parse response: {}",
                e
            )))?;

        let audio = decode_audio(api_response)?;
        log::debug!(
            "Synthesized {} bytes of text into {} bytes of audio",
            request.text.len(),
            audio.len()
        );

        Ok(SynthesisResponse { audio })
    }

    fn name(&self) -> &'static str {
        "Google Cloud Text-to-Speech"
    }

    fn is_available(&self) -> Result<()> {
        let url = reqwest::Url::parse(&self.base_url).map_err(|e| {
            TtsError::ConfigError(format!("Invalid base_url '{}': {}", self.base_url, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(TtsError::ConfigError(format!(
                "base_url must be http or https, got '{}'",
                self.base_url
            )));
        }

        if self.credential.is_blank() {
            return Err(TtsError::MissingCredentials);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voice::VoiceConfig;

    #[test]
    fn test_request_body_shape() {
        let request = SynthesisRequest::new(
            "Bonjour.",
            VoiceConfig::new("fr-FR-Neural2-B")
                .with_speaking_rate(1.25)
                .with_pitch(-2.0),
        );
        let value = serde_json::to_value(build_request(&request)).unwrap();

        assert_eq!(value["input"]["text"], "Bonjour.");
        assert_eq!(value["voice"]["languageCode"], "fr-FR");
        assert_eq!(value["voice"]["name"], "fr-FR-Neural2-B");
        assert_eq!(value["audioConfig"]["audioEncoding"], "LINEAR16");
        assert_eq!(value["audioConfig"]["speakingRate"], 1.25);
        assert_eq!(value["audioConfig"]["pitch"], -2.0);
    }

    #[test]
    fn test_error_envelope_parsed() {
        let body = r#"{"error":{"code":400,"message":"Invalid voice name","status":"INVALID_ARGUMENT"}}"#;
        match error_from_status(400, body) {
            TtsError::ApiError {
                message,
                status_code,
            } => {
                assert_eq!(message, "Invalid voice name");
                assert_eq!(status_code, Some(400));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_auth_and_quota_statuses() {
        assert!(matches!(
            error_from_status(403, "forbidden"),
            TtsError::Unauthorized {
                status_code: 403,
                ..
            }
        ));
        assert!(matches!(
            error_from_status(401, "{}"),
            TtsError::Unauthorized {
                status_code: 401,
                ..
            }
        ));
        match error_from_status(429, "slow down") {
            TtsError::RateLimited { message } => assert_eq!(message, "slow down"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_decode_audio() {
        let response: SynthesizeResponse =
            serde_json::from_str(r#"{"audioContent":"UklGRg=="}"#).unwrap();
        assert_eq!(decode_audio(response).unwrap(), b"RIFF");
    }

    #[test]
    fn test_decode_audio_missing_content() {
        let response: SynthesizeResponse = serde_json::from_str("{}").unwrap();
        assert!(matches!(
            decode_audio(response),
            Err(TtsError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_decode_audio_bad_base64() {
        let response: SynthesizeResponse =
            serde_json::from_str(r#"{"audioContent":"not base64!"}"#).unwrap();
        assert!(matches!(
            decode_audio(response),
            Err(TtsError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_base_url_normalized() {
        let provider = GoogleTtsProvider::new(
            "http://localhost:8080/",
            Credential::ApiKey("k".into()),
            None,
        );
        assert_eq!(provider.base_url, "http://localhost:8080");
        assert_eq!(provider.name(), "Google Cloud Text-to-Speech");
        assert!(provider.is_available().is_ok());
    }

    #[test]
    fn test_unavailable_with_bad_base_url() {
        let provider = GoogleTtsProvider::new("not a url", Credential::ApiKey("k".into()), None);
        assert!(matches!(
            provider.is_available(),
            Err(TtsError::ConfigError(_))
        ));

        let provider = GoogleTtsProvider::new("ftp://example.com", Credential::ApiKey("k".into()), None);
        assert!(matches!(
            provider.is_available(),
            Err(TtsError::ConfigError(_))
        ));
    }

    #[test]
    fn test_unavailable_with_blank_credential() {
        let provider = GoogleTtsProvider::new(
            "https://texttospeech.googleapis.com",
            Credential::AccessToken("  ".into()),
            None,
        );
        assert!(matches!(
            provider.is_available(),
            Err(TtsError::MissingCredentials)
        ));
    }
}
