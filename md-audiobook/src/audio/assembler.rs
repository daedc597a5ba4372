//! Audio file assembly using FFmpeg.

use anyhow::{Context, Result};
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn ffmpeg_command() -> Command {
    Command::new("ffmpeg")
}

fn ffprobe_command() -> Command {
    Command::new("ffprobe")
}

/// Get duration of an audio file in milliseconds using ffprobe.
pub fn get_audio_duration_ms(audio_path: &Path) -> Result<u64> {
    let output = ffprobe_command()
        .args([
            "-v",
            "quiet",
            "-show_entries",
            "format=duration",
            "-of",
            "default=noprint_wrappers=1:nokey=1",
        ])
        .arg(audio_path)
        .output()
        .context("Failed to run ffprobe")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("ffprobe failed: {}", stderr);
    }

    let duration_str = String::from_utf8_lossy(&output.stdout);
    let duration_secs: f64 = duration_str
        .trim()
        .parse()
        .context("Failed to parse duration")?;

    Ok((duration_secs * 1000.0) as u64)
}

/// Build the concat demuxer list, one `file '...'` line per input.
fn concat_list(audio_files: &[&Path]) -> String {
    let mut list_content = String::new();
    for path in audio_files {
        // Escape single quotes in path
        let path_str = path.to_string_lossy().replace('\'', "'\\''");
        list_content.push_str(&format!("file '{}'\n", path_str));
    }
    list_content
}

/// Concatenate audio files, in the given order, into `output_path`.
///
/// A single file is copied as-is. Several files are joined with FFmpeg's
/// concat demuxer, which needs every input in the same format.
pub fn concatenate_audio_files(audio_files: &[&Path], output_path: &Path) -> Result<()> {
    if audio_files.is_empty() {
        anyhow::bail!("No audio files provided");
    }

    if audio_files.len() == 1 {
        std::fs::copy(audio_files[0], output_path).with_context(|| {
            format!(
                "Failed to copy {} to {}",
                audio_files[0].display(),
                output_path.display()
            )
        })?;
        return Ok(());
    }

    // The list file lives only as long as this call
    let temp_dir = TempDir::new().context("Failed to create temporary directory")?;
    let list_file = temp_dir.path().join("concat_list.txt");
    std::fs::write(&list_file, concat_list(audio_files))?;

    let output = ffmpeg_command()
        .args(["-y", "-loglevel", "error", "-f", "concat", "-safe", "0", "-i"])
        .arg(&list_file)
        .args(["-c", "copy"])
        .arg(output_path)
        .output()
        .context("Failed to run ffmpeg concat")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("ffmpeg concat failed: {}", stderr);
    }

    Ok(())
}

/// Check if FFmpeg is available on PATH.
pub fn is_ffmpeg_available() -> bool {
    ffmpeg_command()
        .arg("-version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}
