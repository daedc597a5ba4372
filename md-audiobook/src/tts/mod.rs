//! Speech synthesis of text chunks into audio files.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tts_client::{SpeechProvider, SpeechRequest, VoiceSettings};

use crate::config::NarrationSettings;
use crate::text::TextChunk;

/// Extension of the audio the provider returns (MP3).
pub const AUDIO_EXTENSION: &str = "mp3";

/// Options for one narration voice.
#[derive(Debug, Clone, PartialEq)]
pub struct TtsOptions {
    pub voice_id: String,
    pub model_id: String,
    pub voice_settings: VoiceSettings,
}

impl TtsOptions {
    /// Create options for a voice and model with default voice settings.
    pub fn new(voice_id: impl Into<String>, model_id: impl Into<String>) -> Self {
        Self {
            voice_id: voice_id.into(),
            model_id: model_id.into(),
            voice_settings: VoiceSettings::default(),
        }
    }

    /// Set the voice settings.
    pub fn with_voice_settings(mut self, settings: VoiceSettings) -> Self {
        self.voice_settings = settings;
        self
    }

    /// Build the provider request for one chunk of text.
    pub fn request(&self, text: &str) -> SpeechRequest {
        SpeechRequest::new(text, &self.voice_id, &self.model_id)
            .with_voice_settings(self.voice_settings.clone())
    }
}

impl From<&NarrationSettings> for TtsOptions {
    fn from(settings: &NarrationSettings) -> Self {
        Self::new(settings.voice_id.clone(), settings.model_id.clone())
            .with_voice_settings(settings.voice_settings.clone())
    }
}

/// Synthesize one chunk and write its audio into `dir`.
///
/// Returns the path of the written file, named after the chunk so that
/// files sort in narration order.
pub async fn synthesize_chunk(
    provider: &dyn SpeechProvider,
    chunk: &TextChunk,
    options: &TtsOptions,
    dir: &Path,
) -> Result<PathBuf> {
    let audio = provider
        .synthesize(&options.request(&chunk.text))
        .await
        .with_context(|| {
            format!(
                "{} synthesis failed for chapter {} chunk {}",
                provider.name(),
                chunk.chapter_id + 1,
                chunk.chunk_id + 1
            )
        })?;

    let path = dir.join(format!("{}.{}", chunk.file_stem(), AUDIO_EXTENSION));
    tokio::fs::write(&path, &audio.bytes)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(path)
}
