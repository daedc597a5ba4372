//! md-audio - Narrate markdown documents to audio using text-to-speech

mod audio;
mod config;
mod narrate;
mod text;
mod tts;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::{AudiobookConfig, Overrides};
use log::{info, warn};
use narrate::{NarrationReport, Narrator};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "md-audio")]
#[command(about = "Narrate markdown documents to audio using text-to-speech", long_about = None)]
#[command(version)]
struct Args {
    /// Enable debug output
    #[arg(short, long, global = true, default_value_t = false)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by the narration commands.
#[derive(clap::Args, Debug, Clone)]
struct VoiceArgs {
    /// Voice ID (overrides ELEVEN_LABS_VOICE_ID and the config file)
    #[arg(long)]
    voice: Option<String>,

    /// Model ID (overrides ELEVEN_LABS_MODEL_ID and the config file)
    #[arg(long)]
    model: Option<String>,

    /// Maximum characters per synthesis request
    #[arg(long)]
    chunk_limit: Option<usize>,
}

impl VoiceArgs {
    fn overrides(&self) -> Overrides {
        Overrides {
            voice_id: self.voice.clone(),
            model_id: self.model.clone(),
            chunk_limit: self.chunk_limit,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Narrate a single markdown file
    File {
        /// Input markdown file
        input: PathBuf,
        /// Output audio file (MP3)
        output: PathBuf,
        #[command(flatten)]
        voice: VoiceArgs,
    },
    /// Narrate chapter files, in order, into one audiobook
    Chapters {
        /// Output audio file (MP3)
        output: PathBuf,
        /// Chapter markdown files, in reading order
        #[arg(required = true)]
        chapters: Vec<PathBuf>,
        #[command(flatten)]
        voice: VoiceArgs,
    },
    /// Show how a markdown file would be split, without calling the API
    Preview {
        /// Input markdown file
        input: PathBuf,
        /// Maximum characters per synthesis request
        #[arg(long)]
        chunk_limit: Option<usize>,
    },
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
    /// Set default voice ID
    SetVoice {
        /// Voice identifier
        id: String,
    },
    /// Set default model ID
    SetModel {
        /// Model identifier
        id: String,
    },
    /// Set default chunk limit
    SetChunkLimit {
        /// Maximum characters per synthesis request
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.debug);

    match args.command {
        Commands::File {
            input,
            output,
            voice,
        } => {
            if !input.exists() {
                anyhow::bail!("Input file not found: {}", input.display());
            }
            let narrator = build_narrator(&voice)?;
            info!("Reading markdown file: {}", input.display());
            let markdown = std::fs::read_to_string(&input)
                .with_context(|| format!("Failed to read {}", input.display()))?;
            let report = narrator.narrate_document(&markdown, &output).await?;
            print_report(&report, &output);
        }
        Commands::Chapters {
            output,
            chapters,
            voice,
        } => {
            let narrator = build_narrator(&voice)?;
            info!("Generating audiobook from {} chapter(s)", chapters.len());
            let report = narrator.narrate_chapters(&chapters, &output).await?;
            print_report(&report, &output);
        }
        Commands::Preview { input, chunk_limit } => {
            let config = AudiobookConfig::load().context("Failed to load configuration")?;
            let limit = chunk_limit.unwrap_or(config.chunk_limit);
            let markdown = std::fs::read_to_string(&input)
                .with_context(|| format!("Failed to read {}", input.display()))?;
            let segments = narrate::preview_segments(&markdown, limit)?;
            for (i, segment) in segments.iter().enumerate() {
                println!(
                    "--- segment {}/{} ({} characters) ---",
                    i + 1,
                    segments.len(),
                    segment.chars().count()
                );
                println!("{}", segment);
            }
        }
        Commands::Config { action } => handle_config_command(&action)?,
    }

    Ok(())
}

fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

/// Load configuration, resolve settings and connect the speech provider.
fn build_narrator(voice: &VoiceArgs) -> Result<Narrator> {
    let config = AudiobookConfig::load().context("Failed to load configuration")?;
    let settings = config.resolve(&voice.overrides());

    let provider = tts_client::get_provider(&config.provider)?;
    provider.is_available()?;

    let narrator = Narrator::new(provider, settings).with_progress(std::io::stderr().is_terminal());
    let settings = narrator.settings();
    info!(
        "Voice: {}, model: {}, chunk limit: {}",
        settings.voice_id, settings.model_id, settings.chunk_limit
    );
    Ok(narrator)
}

fn print_report(report: &NarrationReport, output: &Path) {
    let size_mb = report.bytes as f64 / (1024.0 * 1024.0);
    println!("Audiobook generated: {}", output.display());
    println!(
        "  {} chapter(s), {} segment(s), {} characters, {:.2} MB",
        report.chapters, report.segments, report.characters, size_mb
    );

    match audio::get_audio_duration_ms(output) {
        Ok(ms) => println!("  duration: {}", format_duration(ms)),
        Err(e) => warn!("Could not read duration: {}", e),
    }
}

/// Format milliseconds as `H:MM:SS`.
fn format_duration(ms: u64) -> String {
    let secs = ms / 1000;
    format!("{}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}

fn handle_config_command(action: &ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = AudiobookConfig::load()?;
            let settings = config.resolve(&Overrides::default());
            println!("Configuration file: {:?}", AudiobookConfig::config_path()?);
            println!();
            println!("voice_id = \"{}\"", settings.voice_id);
            println!("model_id = \"{}\"", settings.model_id);
            println!("chunk_limit = {}", settings.chunk_limit);
            println!("provider = \"{}\"", config.provider.kind);
            println!(
                "voice_settings = {{ stability = {}, similarity_boost = {}, style = {}, use_speaker_boost = {} }}",
                settings.voice_settings.stability,
                settings.voice_settings.similarity_boost,
                settings.voice_settings.style,
                settings.voice_settings.use_speaker_boost
            );
        }
        ConfigAction::SetVoice { id } => {
            let mut config = AudiobookConfig::load()?;
            config.voice_id = Some(id.clone());
            config.save()?;
            println!("Default voice set to: {}", id);
        }
        ConfigAction::SetModel { id } => {
            let mut config = AudiobookConfig::load()?;
            config.model_id = Some(id.clone());
            config.save()?;
            println!("Default model set to: {}", id);
        }
        ConfigAction::SetChunkLimit { limit } => {
            if *limit == 0 {
                anyhow::bail!("Chunk limit must be at least 1");
            }
            let mut config = AudiobookConfig::load()?;
            config.chunk_limit = *limit;
            config.save()?;
            println!("Default chunk limit set to: {}", limit);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_chapters_command() {
        let args = Args::try_parse_from([
            "md-audio",
            "chapters",
            "book.mp3",
            "ch1.md",
            "ch2.md",
            "--voice",
            "abc",
            "--chunk-limit",
            "5000",
        ])
        .unwrap();

        match args.command {
            Commands::Chapters {
                output,
                chapters,
                voice,
            } => {
                assert_eq!(output, PathBuf::from("book.mp3"));
                assert_eq!(chapters, vec![PathBuf::from("ch1.md"), PathBuf::from("ch2.md")]);
                let overrides = voice.overrides();
                assert_eq!(overrides.voice_id.as_deref(), Some("abc"));
                assert_eq!(overrides.model_id, None);
                assert_eq!(overrides.chunk_limit, Some(5000));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_chapters_requires_input() {
        assert!(Args::try_parse_from(["md-audio", "chapters", "book.mp3"]).is_err());
    }

    #[test]
    fn test_debug_flag_is_global() {
        let args = Args::try_parse_from(["md-audio", "file", "in.md", "out.mp3", "-d"]).unwrap();
        assert!(args.debug);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0:00:00");
        assert_eq!(format_duration(61_500), "0:01:01");
        assert_eq!(format_duration(3_723_000), "1:02:03");
    }
}
