//! Mock synthesizer for testing
//!
//! Scriptable stand-in for the remote service: succeed, fail always, or fail
//! on one specific call. Records every text it was asked to synthesize.

use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{Result, TtsError};
use crate::provider::{SpeechSynthesizer, SynthesisRequest, SynthesisResponse};

/// A mock synthesizer for exercising success and failure paths
pub struct MockSynthesizer {
    /// 1-based call number that fails (None = never)
    fail_on_call: Option<usize>,
    /// Fail every call
    always_fail: bool,
    /// Current call count
    call_count: AtomicUsize,
    /// Error to return on failure
    fail_with: Mutex<Option<TtsError>>,
    /// Audio returned on success
    audio: Vec<u8>,
    /// Texts received, in call order
    requests: Mutex<Vec<String>>,
}

impl MockSynthesizer {
    /// Create a synthesizer that always returns `audio`
    pub fn always_succeeds(audio: &[u8]) -> Self {
        Self {
            fail_on_call: None,
            always_fail: false,
            call_count: AtomicUsize::new(0),
            fail_with: Mutex::new(None),
            audio: audio.to_vec(),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Create a synthesizer that always fails with the given error
    pub fn always_fails(error: TtsError) -> Self {
        Self {
            always_fail: true,
            fail_with: Mutex::new(Some(error)),
            ..Self::always_succeeds(&[])
        }
    }

    /// Create a synthesizer whose `n`th call (1-based) fails; every other call succeeds
    pub fn fails_on_call(n: usize, error: TtsError, audio: &[u8]) -> Self {
        Self {
            fail_on_call: Some(n),
            fail_with: Mutex::new(Some(error)),
            ..Self::always_succeeds(audio)
        }
    }

    /// Get the number of times synthesize() was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Texts passed to synthesize(), in order
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl SpeechSynthesizer for MockSynthesizer {
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<SynthesisResponse> {
        let call_num = self.call_count.fetch_add(1, Ordering::SeqCst) + 1;
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.text.clone());
        }

        if self.always_fail || self.fail_on_call == Some(call_num) {
            let error = self
                .fail_with
                .lock()
                .ok()
                .and_then(|e| e.as_ref().map(clone_error));
            if let Some(err) = error {
                return Err(err);
            }
        }

        Ok(SynthesisResponse {
            audio: self.audio.clone(),
        })
    }

    fn name(&self) -> &'static str {
        "mock"
    }

    fn is_available(&self) -> Result<()> {
        Ok(())
    }
}

/// Clone a TtsError (needed because TtsError doesn't implement Clone)
fn clone_error(err: &TtsError) -> TtsError {
    match err {
        TtsError::MissingCredentials => TtsError::MissingCredentials,
        TtsError::Unauthorized {
            message,
            status_code,
        } => TtsError::Unauthorized {
            message: message.clone(),
            status_code: *status_code,
        },
        TtsError::RateLimited { message } => TtsError::RateLimited {
            message: message.clone(),
        },
        TtsError::ApiError {
            message,
            status_code,
        } => TtsError::ApiError {
            message: message.clone(),
            status_code: *status_code,
        },
        TtsError::InvalidResponse(s) => TtsError::InvalidResponse(s.clone()),
        TtsError::CredentialCommand(s) => TtsError::CredentialCommand(s.clone()),
        TtsError::ConfigError(s) => TtsError::ConfigError(s.clone()),
        // Io and Toml errors can't be cloned
        TtsError::Io(_) => TtsError::ConfigError("IO error (mock)".to_string()),
        TtsError::TomlParse(_) => TtsError::ConfigError("TOML parse error (mock)".to_string()),
        TtsError::TomlSerialize(_) => {
            TtsError::ConfigError("TOML serialize error (mock)".to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voice::VoiceConfig;

    fn request(text: &str) -> SynthesisRequest {
        SynthesisRequest::new(text, VoiceConfig::default())
    }

    #[tokio::test]
    async fn test_always_succeeds() {
        let synth = MockSynthesizer::always_succeeds(b"RIFF");
        let result = synth.synthesize(&request("hello")).await;
        assert_eq!(result.unwrap().audio, b"RIFF");
        assert_eq!(synth.call_count(), 1);
        assert_eq!(synth.requests(), vec!["hello".to_string()]);
    }

    #[tokio::test]
    async fn test_always_fails() {
        let synth = MockSynthesizer::always_fails(TtsError::RateLimited {
            message: "quota".to_string(),
        });
        for _ in 0..3 {
            assert!(synth.synthesize(&request("x")).await.is_err());
        }
        assert_eq!(synth.call_count(), 3);
    }

    #[tokio::test]
    async fn test_fails_on_second_call() {
        let synth = MockSynthesizer::fails_on_call(
            2,
            TtsError::ApiError {
                message: "boom".to_string(),
                status_code: Some(500),
            },
            b"ok",
        );

        assert!(synth.synthesize(&request("one")).await.is_ok());
        let err = synth.synthesize(&request("two")).await.unwrap_err();
        assert_eq!(err.to_string(), "API error (HTTP 500): boom");
        assert!(synth.synthesize(&request("three")).await.is_ok());
        assert_eq!(synth.call_count(), 3);
    }
}
