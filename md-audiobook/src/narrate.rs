//! Narration drivers for a single document and for ordered chapter files.
//!
//! Both drivers share one pipeline: normalize, split, synthesize every chunk
//! in order into a scratch directory, then concatenate into the output file.
//! The scratch directory is removed on every exit path.

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tts_client::SpeechProvider;

use crate::audio;
use crate::config::NarrationSettings;
use crate::text::{self, TextChunk};
use crate::tts::{self, TtsOptions};

/// Summary of a finished narration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NarrationReport {
    /// Chapters that produced audio
    pub chapters: usize,
    /// Synthesis requests made
    pub segments: usize,
    /// Characters sent for synthesis
    pub characters: usize,
    /// Size of the output file
    pub bytes: u64,
}

pub struct Narrator {
    provider: Box<dyn SpeechProvider>,
    settings: NarrationSettings,
    show_progress: bool,
    scratch_root: Option<PathBuf>,
}

impl Narrator {
    pub fn new(provider: Box<dyn SpeechProvider>, settings: NarrationSettings) -> Self {
        Self {
            provider,
            settings,
            show_progress: false,
            scratch_root: None,
        }
    }

    /// Show a progress bar while synthesizing.
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Create scratch directories under `root` instead of the system temp dir.
    pub fn with_scratch_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.scratch_root = Some(root.into());
        self
    }

    pub fn settings(&self) -> &NarrationSettings {
        &self.settings
    }

    /// Narrate one markdown document into `output`.
    pub async fn narrate_document(&self, markdown: &str, output: &Path) -> Result<NarrationReport> {
        let chunks = text::process_chapter(0, markdown, self.settings.chunk_limit)?;
        if chunks.is_empty() {
            anyhow::bail!("No text content found after markdown conversion");
        }

        info!(
            "Text length: {} characters, {} chunk(s)",
            chunks.iter().map(TextChunk::char_count).sum::<usize>(),
            chunks.len()
        );

        self.narrate(vec![chunks], output).await
    }

    /// Narrate chapter files, in the given order, into one `output`.
    ///
    /// Every file must exist before any synthesis starts. Chapters with no
    /// narratable text are skipped.
    pub async fn narrate_chapters(
        &self,
        chapter_files: &[PathBuf],
        output: &Path,
    ) -> Result<NarrationReport> {
        if chapter_files.is_empty() {
            anyhow::bail!("No chapter files provided");
        }

        for path in chapter_files {
            if !path.exists() {
                anyhow::bail!("Chapter file not found: {}", path.display());
            }
        }

        let mut chapters = Vec::new();
        for (chapter_id, path) in chapter_files.iter().enumerate() {
            let markdown = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;

            let chunks = text::process_chapter(chapter_id, &markdown, self.settings.chunk_limit)?;
            if chunks.is_empty() {
                warn!(
                    "Chapter {}/{} ({}): no text content found, skipping",
                    chapter_id + 1,
                    chapter_files.len(),
                    path.display()
                );
                continue;
            }

            info!(
                "Chapter {}/{} ({}): {} characters, {} chunk(s)",
                chapter_id + 1,
                chapter_files.len(),
                path.display(),
                chunks.iter().map(TextChunk::char_count).sum::<usize>(),
                chunks.len()
            );
            chapters.push(chunks);
        }

        if chapters.is_empty() {
            anyhow::bail!("No audio segments generated: every chapter was empty");
        }

        self.narrate(chapters, output).await
    }

    async fn narrate(&self, chapters: Vec<Vec<TextChunk>>, output: &Path) -> Result<NarrationReport> {
        let chapter_count = chapters.len();
        let chunks: Vec<TextChunk> = chapters.into_iter().flatten().collect();

        // Fail before spending synthesis credits on audio we cannot join
        if chunks.len() > 1 && !audio::is_ffmpeg_available() {
            anyhow::bail!("ffmpeg is required to join {} audio segments", chunks.len());
        }

        let scratch = self.scratch_dir()?;
        let files = self.synthesize_all(&chunks, scratch.path()).await?;

        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        info!("Combining {} audio segment(s)...", files.len());
        let file_refs: Vec<&Path> = files.iter().map(PathBuf::as_path).collect();
        audio::concatenate_audio_files(&file_refs, output)?;

        let bytes = std::fs::metadata(output)
            .with_context(|| format!("Failed to stat {}", output.display()))?
            .len();

        Ok(NarrationReport {
            chapters: chapter_count,
            segments: chunks.len(),
            characters: chunks.iter().map(TextChunk::char_count).sum(),
            bytes,
        })
    }

    /// Synthesize chunks strictly in order; returned paths match chunk order.
    async fn synthesize_all(&self, chunks: &[TextChunk], dir: &Path) -> Result<Vec<PathBuf>> {
        let options = TtsOptions::from(&self.settings);
        let pb = self.progress_bar(chunks.len());

        let mut files = Vec::with_capacity(chunks.len());
        for (i, chunk) in chunks.iter().enumerate() {
            debug!(
                "Chunk {}/{}: chapter {}, {} characters",
                i + 1,
                chunks.len(),
                chunk.chapter_id + 1,
                chunk.char_count()
            );
            pb.set_message(format!("chapter {}", chunk.chapter_id + 1));

            let path =
                match tts::synthesize_chunk(self.provider.as_ref(), chunk, &options, dir).await {
                    Ok(path) => path,
                    Err(e) => {
                        pb.abandon_with_message("synthesis failed");
                        return Err(e);
                    }
                };
            files.push(path);
            pb.inc(1);
        }

        pb.finish_and_clear();
        Ok(files)
    }

    fn scratch_dir(&self) -> Result<TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("md-audio-");
        let dir = match &self.scratch_root {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        };
        dir.context("Failed to create scratch directory")
    }

    fn progress_bar(&self, len: usize) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(len as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
        {
            pb.set_style(style.progress_chars("#>-"));
        }
        pb
    }
}

/// Segments a document would be split into, without synthesizing anything.
pub fn preview_segments(markdown: &str, limit: usize) -> Result<Vec<String>> {
    let text = text::markdown_to_text(markdown);
    Ok(text::split_text(&text, limit)?)
}
