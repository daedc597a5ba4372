//! Audio assembly: joining synthesized segments into one narration file.

pub mod assembler;

pub use assembler::{concatenate_audio_files, get_audio_duration_ms, is_ffmpeg_available};
