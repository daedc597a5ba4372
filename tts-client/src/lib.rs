//! Speech synthesis client library for md-audiobook
//!
//! Provides a unified interface over text-to-speech providers:
//! - ElevenLabs (HTTP API)
//! - Mock (deterministic, for tests)

pub mod config;
pub mod error;
pub mod provider;
pub mod providers;

pub use config::ProviderConfig;
pub use error::{Result, TtsError};
pub use provider::{SpeechAudio, SpeechProvider, SpeechRequest, VoiceSettings};
pub use providers::{ElevenLabsProvider, MockProvider, ProviderKind, get_provider};
