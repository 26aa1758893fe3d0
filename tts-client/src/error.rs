use thiserror::Error;

#[derive(Error, Debug)]
pub enum TtsError {
    #[error(
        "No Google Cloud credentials found. Set GOOGLE_API_KEY or GOOGLE_OAUTH_ACCESS_TOKEN, or run 'gcloud auth application-default login'."
    )]
    MissingCredentials,

    #[error("Authentication failed (HTTP {status_code}): {message}")]
    Unauthorized { message: String, status_code: u16 },

    #[error("Quota or rate limit exceeded (HTTP 429): {message}")]
    RateLimited { message: String },

    #[error("API error{}: {message}", status_code.map(|c| format!(" (HTTP {})", c)).unwrap_or_default())]
    ApiError {
        message: String,
        status_code: Option<u16>,
    },

    #[error("Invalid response from speech service: {0}")]
    InvalidResponse(String),

    #[error("Credential command failed: {0}")]
    CredentialCommand(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, TtsError>;
