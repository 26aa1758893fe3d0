//! Web UI: upload form and a streamed results page.
//!
//! `POST /generate` answers with a `text/html` body that grows as chunks are
//! synthesized. Generation runs on its own task and pushes rendered fragments
//! through a channel into the response stream.

use anyhow::{Context, Result};
use axum::{
    Router,
    body::Body,
    extract::{DefaultBodyLimit, Multipart, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedSender};
use tts_client::{SpeechSynthesizer, VoiceConfig, is_preset_voice};

use crate::config::GeneratorConfig;
use crate::generator::generate;
use crate::naming::NamingParams;
use crate::presenter;
use crate::text::decode_text;

/// Uploads above this size are rejected by the extractor.
const UPLOAD_LIMIT_BYTES: usize = 16 * 1024 * 1024;

/// Shared, read-only server state
#[derive(Clone)]
pub struct AppState {
    /// Defaults for the form
    pub settings: Arc<GeneratorConfig>,
    /// Endpoint and credential settings for each run's client
    pub client_config: Arc<tts_client::Config>,
}

impl AppState {
    pub fn new(settings: GeneratorConfig, client_config: tts_client::Config) -> Self {
        Self {
            settings: Arc::new(settings),
            client_config: Arc::new(client_config),
        }
    }
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route(
            "/generate",
            post(generate_audio).layer(DefaultBodyLimit::max(UPLOAD_LIMIT_BYTES)),
        )
        .route("/health", get(health_check))
        .with_state(state)
}

/// Run the web UI until Ctrl+C or SIGTERM.
pub async fn serve(addr: SocketAddr, state: AppState) -> Result<()> {
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    log::info!("Listening on http://{}", addr);
    eprintln!("Open http://{} in your browser (Ctrl+C to stop)", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    log::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                log::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => log::info!("Received Ctrl+C, shutting down"),
        _ = terminate => log::info!("Received SIGTERM, shutting down"),
    }
}

async fn index(State(state): State<AppState>) -> Html<String> {
    Html(presenter::index_page(&state.settings.voice_config()))
}

async fn health_check() -> &'static str {
    "ok"
}

/// Raw multipart fields from the upload form
#[derive(Debug, Default)]
struct GenerateForm {
    file_name: Option<String>,
    text: Option<String>,
    voice: Option<String>,
    speaking_rate: Option<f32>,
    pitch: Option<f32>,
}

/// A validated generation request
#[derive(Debug, Clone)]
pub struct GenerationJob {
    pub text: String,
    pub voice: VoiceConfig,
    pub naming: NamingParams,
}

impl GenerationJob {
    /// Validate the form; an Err carries a user-facing warning.
    fn from_form(form: GenerateForm, defaults: &VoiceConfig) -> std::result::Result<Self, String> {
        let text = match form.text {
            Some(text) if !text.trim().is_empty() => text,
            _ => return Err("Please upload a text file first.".to_string()),
        };

        let voice_name = form
            .voice
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| defaults.voice.clone());
        if !is_preset_voice(&voice_name) {
            return Err(format!("Voice '{}' is not supported.", voice_name));
        }

        let voice = VoiceConfig::new(voice_name)
            .with_speaking_rate(form.speaking_rate.unwrap_or(defaults.speaking_rate))
            .with_pitch(form.pitch.unwrap_or(defaults.pitch));

        let naming = form
            .file_name
            .as_deref()
            .map(NamingParams::from_file_name)
            .unwrap_or_default();

        Ok(Self { text, voice, naming })
    }
}

async fn read_form(mut multipart: Multipart) -> Result<GenerateForm> {
    let mut form = GenerateForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let file_name = field.file_name().map(str::to_string);
                let bytes = field.bytes().await?;
                if !bytes.is_empty() {
                    form.file_name = file_name;
                    form.text = Some(decode_text(&bytes));
                }
            }
            "voice" => form.voice = Some(field.text().await?),
            "speaking_rate" => form.speaking_rate = field.text().await?.trim().parse().ok(),
            "pitch" => form.pitch = field.text().await?.trim().parse().ok(),
            _ => {}
        }
    }

    Ok(form)
}

async fn generate_audio(State(state): State<AppState>, multipart: Multipart) -> Response {
    let form = match read_form(multipart).await {
        Ok(form) => form,
        Err(e) => {
            log::warn!("Rejected upload: {:#}", e);
            let mut page = presenter::page_start();
            page.push_str(&presenter::warning(&format!("Could not read the upload: {:#}", e)));
            page.push_str(&presenter::page_end());
            return (StatusCode::BAD_REQUEST, Html(page)).into_response();
        }
    };

    log::info!(
        "Generate request: {} ({} bytes)",
        form.file_name.as_deref().unwrap_or("<no file>"),
        form.text.as_ref().map(String::len).unwrap_or(0)
    );

    let defaults = state.settings.voice_config();
    let client_config = Arc::clone(&state.client_config);
    let (tx, rx) = mpsc::unbounded_channel::<String>();

    tokio::spawn(async move {
        run_request(form, defaults, client_config, tx).await;
    });

    let stream = futures_util::stream::unfold(rx, |mut rx| async move {
        rx.recv().await.map(|html| (Ok::<_, Infallible>(html), rx))
    });

    (
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        Body::from_stream(stream),
    )
        .into_response()
}

/// Render the full results page for one request into `tx`.
async fn run_request(
    form: GenerateForm,
    defaults: VoiceConfig,
    client_config: Arc<tts_client::Config>,
    tx: UnboundedSender<String>,
) {
    // The browser may have gone away; the run still finishes
    let send = |html: String| {
        let _ = tx.send(html);
    };

    send(presenter::page_start());

    match GenerationJob::from_form(form, &defaults) {
        Err(message) => send(presenter::warning(&message)),
        Ok(job) => {
            send(presenter::preview(&job.text));
            match tts_client::get_synthesizer(&client_config).await {
                Ok(synth) => stream_results(synth.as_ref(), &job, &tx).await,
                Err(e) => {
                    log::error!("Failed to create synthesizer: {}", e);
                    send(presenter::error(&e.to_string()));
                }
            }
        }
    }

    send(presenter::page_end());
}

/// Synthesize a job, sending each chunk's fragment as soon as it is ready.
pub async fn stream_results(
    synth: &dyn SpeechSynthesizer,
    job: &GenerationJob,
    tx: &UnboundedSender<String>,
) {
    let outcome = generate(synth, &job.text, &job.voice, &job.naming, |result| {
        let _ = tx.send(presenter::chunk(result));
        Ok(())
    })
    .await;

    let html = match outcome {
        Ok(results) => presenter::summary(&results),
        Err(e) => presenter::error(&e.to_string()),
    };
    let _ = tx.send(html);
}
