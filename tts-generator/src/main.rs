//! tts-generator - Turn long text files into chunked WAV audio with Google Cloud Text-to-Speech

mod audio;
mod config;
mod generator;
mod naming;
mod presenter;
mod text;
mod web;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::GeneratorConfig;
use env_logger::Env;
use generator::{SynthesisResult, generate};
use indicatif::{ProgressBar, ProgressStyle};
use naming::NamingParams;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tts_client::{PRESET_VOICES, VoiceConfig, is_preset_voice};

#[derive(Parser, Debug)]
#[command(name = "tts-generator")]
#[command(about = "Turn long text files into chunked WAV audio using Google Cloud Text-to-Speech", long_about = None)]
#[command(version)]
struct Args {
    /// Path to the text file
    text_file: Option<PathBuf>,

    /// Output directory (default: the text file's directory)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Voice preset (see `tts-generator voices`)
    #[arg(long)]
    voice: Option<String>,

    /// Speaking rate (0.25-4.0)
    #[arg(long)]
    rate: Option<f32>,

    /// Pitch in semitones (-20.0-20.0)
    #[arg(long, allow_hyphen_values = true)]
    pitch: Option<f32>,

    /// Enable debug output
    #[arg(short, long, default_value_t = false)]
    debug: bool,

    /// Subcommands
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the web UI
    Serve {
        /// Address to listen on (default from config, 127.0.0.1:8501)
        #[arg(long)]
        listen: Option<SocketAddr>,
    },
    /// List the available voice presets
    Voices,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Set default voice preset
    SetVoice {
        /// Voice name, e.g. en-GB-Neural2-B
        voice: String,
    },
    /// Set default speaking rate
    SetRate {
        /// Value (0.25-4.0)
        value: f32,
    },
    /// Set default pitch
    SetPitch {
        /// Value in semitones (-20.0-20.0)
        #[arg(allow_hyphen_values = true)]
        value: f32,
    },
    /// Set default listen address for `serve`
    SetListen {
        /// Socket address, e.g. 127.0.0.1:8501
        addr: SocketAddr,
    },
    /// Store a Google API key in the client config
    SetApiKey {
        /// API key
        key: String,
    },
    /// Set the project billed for requests (x-goog-user-project)
    SetQuotaProject {
        /// Google Cloud project ID
        project: String,
    },
    /// Point the client at a different endpoint (proxies, local testing)
    SetBaseUrl {
        /// Base URL, e.g. https://texttospeech.googleapis.com
        url: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    match &args.command {
        Some(Commands::Config { action }) => {
            return handle_config_command(action);
        }
        Some(Commands::Voices) => {
            let config = GeneratorConfig::load().context("Failed to load configuration")?;
            for voice in PRESET_VOICES {
                let marker = if *voice == config.voice { " (default)" } else { "" };
                println!("{}{}", voice, marker);
            }
            return Ok(());
        }
        Some(Commands::Serve { listen }) => {
            return serve(*listen).await;
        }
        None => {}
    }

    let text_path = args
        .text_file
        .clone()
        .ok_or_else(|| anyhow::anyhow!("Text file path is required. Run 'tts-generator --help' for usage."))?;

    if !text_path.exists() {
        anyhow::bail!("Text file not found: {}", text_path.display());
    }

    let config = GeneratorConfig::load().context("Failed to load configuration")?;
    let voice = voice_from_args(&args, &config)?;

    let output_dir = args.output.clone().unwrap_or_else(|| {
        text_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default()
    });

    log::debug!("Text file: {}", text_path.display());
    log::debug!("Output directory: {}", output_dir.display());
    log::debug!(
        "Voice: {} (rate {}, pitch {})",
        voice.voice,
        voice.speaking_rate,
        voice.pitch
    );

    let bytes = std::fs::read(&text_path)
        .with_context(|| format!("Failed to read {}", text_path.display()))?;
    let text = text::decode_text(&bytes);

    if text.trim().is_empty() {
        eprintln!("Warning: {} contains no text, nothing to do.", text_path.display());
        return Ok(());
    }

    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    let client_config = tts_client::Config::load().context("Failed to load client configuration")?;
    let synth = tts_client::get_synthesizer(&client_config)
        .await
        .context("Failed to create speech synthesizer")?;

    let naming = text_path
        .file_name()
        .map(|name| NamingParams::from_file_name(&name.to_string_lossy()))
        .unwrap_or_default();

    eprintln!("Generating audio for {}...", text_path.display());

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")?
            .progress_chars("#>-"),
    );

    let outcome = generate(synth.as_ref(), &text, &voice, &naming, |result| {
        let path = write_chunk(&output_dir, result)?;
        pb.set_length(result.total as u64);
        pb.set_position(result.index as u64);
        pb.set_message(result.filename.clone());
        log::debug!("Wrote {}", path.display());
        Ok(())
    })
    .await;

    match outcome {
        Ok(results) => {
            pb.finish_and_clear();
            let total: Duration = results.iter().filter_map(|r| r.duration).sum();
            eprintln!(
                "Wrote {} file(s) to {} ({} of audio)",
                results.len(),
                output_dir.display(),
                audio::format_duration(total)
            );
            Ok(())
        }
        Err(e) => {
            pb.abandon();
            anyhow::bail!("Text-to-Speech Error: {}", e);
        }
    }
}

/// Merge CLI overrides onto the configured defaults.
fn voice_from_args(args: &Args, config: &GeneratorConfig) -> Result<VoiceConfig> {
    let defaults = config.voice_config();
    let name = args.voice.clone().unwrap_or(defaults.voice);

    if !is_preset_voice(&name) {
        anyhow::bail!(
            "Unknown voice '{}'. Run 'tts-generator voices' to list presets.",
            name
        );
    }

    Ok(VoiceConfig::new(name)
        .with_speaking_rate(args.rate.unwrap_or(defaults.speaking_rate))
        .with_pitch(args.pitch.unwrap_or(defaults.pitch)))
}

/// Write one chunk's audio into `dir` under its derived file name.
fn write_chunk(dir: &Path, result: &SynthesisResult) -> Result<PathBuf> {
    let path = dir.join(&result.filename);
    std::fs::write(&path, &result.audio)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

async fn serve(listen: Option<SocketAddr>) -> Result<()> {
    let settings = GeneratorConfig::load().context("Failed to load configuration")?;
    let client_config = tts_client::Config::load().context("Failed to load client configuration")?;

    let addr = match listen {
        Some(addr) => addr,
        None => settings
            .listen
            .parse()
            .with_context(|| format!("Invalid listen address in config: {}", settings.listen))?,
    };

    web::serve(addr, web::AppState::new(settings, client_config)).await
}

fn handle_config_command(action: &ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = GeneratorConfig::load()?;
            println!("Configuration file: {:?}", GeneratorConfig::config_path()?);
            println!();
            println!("voice = \"{}\"", config.voice);
            println!("speaking_rate = {}", config.speaking_rate);
            println!("pitch = {}", config.pitch);
            println!("listen = \"{}\"", config.listen);

            let client = tts_client::Config::load()?;
            println!();
            println!("Client configuration file: {:?}", tts_client::Config::config_path()?);
            println!(
                "api_key = {}",
                if client.api_key.is_some() { "(set)" } else { "(none)" }
            );
            println!(
                "access_token = {}",
                if client.access_token.is_some() { "(set)" } else { "(none)" }
            );
            println!(
                "quota_project = {}",
                client.quota_project.as_deref().unwrap_or("(none)")
            );
            println!("base_url = \"{}\"", client.base_url());
        }
        ConfigAction::SetVoice { voice } => {
            if !is_preset_voice(voice) {
                anyhow::bail!(
                    "Unknown voice '{}'. Run 'tts-generator voices' to list presets.",
                    voice
                );
            }
            let mut config = GeneratorConfig::load()?;
            config.voice = voice.clone();
            config.save()?;
            println!("Default voice set to: {}", config.voice);
        }
        ConfigAction::SetRate { value } => {
            let mut config = GeneratorConfig::load()?;
            config.set_speaking_rate(*value);
            config.save()?;
            println!("Default speaking rate set to: {}", config.speaking_rate);
        }
        ConfigAction::SetPitch { value } => {
            let mut config = GeneratorConfig::load()?;
            config.set_pitch(*value);
            config.save()?;
            println!("Default pitch set to: {}", config.pitch);
        }
        ConfigAction::SetListen { addr } => {
            let mut config = GeneratorConfig::load()?;
            config.listen = addr.to_string();
            config.save()?;
            println!("Default listen address set to: {}", config.listen);
        }
        ConfigAction::SetApiKey { key } => {
            let mut client = tts_client::Config::load()?;
            client.api_key = Some(key.trim().to_string());
            client.save()?;
            println!("API key saved to {:?}", tts_client::Config::config_path()?);
        }
        ConfigAction::SetQuotaProject { project } => {
            let mut client = tts_client::Config::load()?;
            client.quota_project = Some(project.trim().to_string());
            client.save()?;
            println!("Quota project set to: {}", project.trim());
        }
        ConfigAction::SetBaseUrl { url } => {
            let mut client = tts_client::Config::load()?;
            client.base_url = Some(url.trim().to_string());
            client.save()?;
            println!("Base URL set to: {}", client.base_url());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_parse_synthesis_args() {
        let args = parse(&["tts-generator", "book.txt", "-o", "out", "--rate", "1.25", "--pitch", "-3"]);
        assert_eq!(args.text_file, Some(PathBuf::from("book.txt")));
        assert_eq!(args.output, Some(PathBuf::from("out")));
        assert_eq!(args.rate, Some(1.25));
        assert_eq!(args.pitch, Some(-3.0));
        assert!(args.command.is_none());
    }

    #[test]
    fn test_parse_serve() {
        let args = parse(&["tts-generator", "serve", "--listen", "0.0.0.0:9000"]);
        match args.command {
            Some(Commands::Serve { listen }) => {
                assert_eq!(listen, Some("0.0.0.0:9000".parse().unwrap()));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_client_config_setters() {
        let args = parse(&["tts-generator", "config", "set-api-key", "abc123"]);
        match args.command {
            Some(Commands::Config {
                action: ConfigAction::SetApiKey { key },
            }) => assert_eq!(key, "abc123"),
            other => panic!("unexpected command: {:?}", other),
        }

        let args = parse(&["tts-generator", "config", "set-base-url", "http://localhost:9000"]);
        assert!(matches!(
            args.command,
            Some(Commands::Config {
                action: ConfigAction::SetBaseUrl { .. }
            })
        ));
    }

    #[test]
    fn test_voice_from_args_overrides_config() {
        let args = parse(&["tts-generator", "a.txt", "--voice", "es-ES-Neural2-B", "--rate", "9"]);
        let voice = voice_from_args(&args, &GeneratorConfig::default()).unwrap();
        assert_eq!(voice.voice, "es-ES-Neural2-B");
        assert_eq!(voice.speaking_rate, 4.0);
        assert_eq!(voice.pitch, 0.0);
    }

    #[test]
    fn test_voice_from_args_rejects_unknown_voice() {
        let args = parse(&["tts-generator", "a.txt", "--voice", "en-US-Robot"]);
        assert!(voice_from_args(&args, &GeneratorConfig::default()).is_err());
    }

    #[test]
    fn test_write_chunk() {
        let dir = tempfile::tempdir().unwrap();
        let result = SynthesisResult {
            index: 2,
            total: 3,
            text: "Hello.".to_string(),
            audio: b"RIFF".to_vec(),
            filename: "story_Part002.wav".to_string(),
            duration: None,
        };

        let path = write_chunk(dir.path(), &result).unwrap();
        assert_eq!(path, dir.path().join("story_Part002.wav"));
        assert_eq!(std::fs::read(&path).unwrap(), b"RIFF");
    }

    #[test]
    fn test_write_chunk_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = SynthesisResult {
            index: 1,
            total: 1,
            text: String::new(),
            audio: Vec::new(),
            filename: "x_Part001.wav".to_string(),
            duration: None,
        };
        assert!(write_chunk(&dir.path().join("missing"), &result).is_err());
    }
}
