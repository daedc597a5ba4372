use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::Result;

/// Voice tuning parameters sent with every synthesis request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceSettings {
    /// Lower values = more expressive, less consistent delivery
    #[serde(default = "default_stability")]
    pub stability: f32,
    /// How closely to match the reference voice
    #[serde(default = "default_similarity_boost")]
    pub similarity_boost: f32,
    /// Style exaggeration (0.0 = neutral)
    #[serde(default)]
    pub style: f32,
    #[serde(default = "default_use_speaker_boost")]
    pub use_speaker_boost: bool,
}

fn default_stability() -> f32 {
    0.5
}

fn default_similarity_boost() -> f32 {
    0.75
}

fn default_use_speaker_boost() -> bool {
    true
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            stability: default_stability(),
            similarity_boost: default_similarity_boost(),
            style: 0.0,
            use_speaker_boost: default_use_speaker_boost(),
        }
    }
}

/// Request to send to a speech provider
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechRequest {
    pub text: String,
    pub voice_id: String,
    pub model_id: String,
    pub voice_settings: VoiceSettings,
}

impl SpeechRequest {
    pub fn new(text: impl Into<String>, voice_id: &str, model_id: &str) -> Self {
        Self {
            text: text.into(),
            voice_id: voice_id.to_string(),
            model_id: model_id.to_string(),
            voice_settings: VoiceSettings::default(),
        }
    }

    pub fn with_voice_settings(mut self, settings: VoiceSettings) -> Self {
        self.voice_settings = settings;
        self
    }
}

/// Encoded audio returned by a provider
#[derive(Debug, Clone)]
pub struct SpeechAudio {
    pub bytes: Vec<u8>,
    /// Content type reported by the provider, e.g. `audio/mpeg`
    pub content_type: Option<String>,
}

impl SpeechAudio {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Trait for text-to-speech providers
#[async_trait]
pub trait SpeechProvider: Send + Sync {
    /// Synthesize one request into encoded audio
    async fn synthesize(&self, request: &SpeechRequest) -> Result<SpeechAudio>;

    /// Get the provider name for display
    fn name(&self) -> &'static str;

    /// Check if the provider is usable (API key set, etc.)
    fn is_available(&self) -> Result<()>;
}

#[async_trait]
impl<P: SpeechProvider + ?Sized> SpeechProvider for Arc<P> {
    async fn synthesize(&self, request: &SpeechRequest) -> Result<SpeechAudio> {
        (**self).synthesize(request).await
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn is_available(&self) -> Result<()> {
        (**self).is_available()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voice_settings_default() {
        let settings = VoiceSettings::default();
        assert_eq!(settings.stability, 0.5);
        assert_eq!(settings.similarity_boost, 0.75);
        assert_eq!(settings.style, 0.0);
        assert!(settings.use_speaker_boost);
    }

    #[test]
    fn test_voice_settings_partial_toml() {
        let settings: VoiceSettings = toml::from_str("stability = 0.3").unwrap();
        assert_eq!(settings.stability, 0.3);
        assert_eq!(settings.similarity_boost, 0.75);
        assert!(settings.use_speaker_boost);
    }

    #[test]
    fn test_voice_settings_serialize_field_names() {
        let json = serde_json::to_value(VoiceSettings::default()).unwrap();
        assert_eq!(json["similarity_boost"], 0.75);
        assert_eq!(json["use_speaker_boost"], true);
    }

    #[test]
    fn test_request_builder() {
        let request = SpeechRequest::new("Hello.", "voice", "model").with_voice_settings(
            VoiceSettings {
                stability: 0.9,
                ..VoiceSettings::default()
            },
        );
        assert_eq!(request.text, "Hello.");
        assert_eq!(request.voice_id, "voice");
        assert_eq!(request.model_id, "model");
        assert_eq!(request.voice_settings.stability, 0.9);
    }
}
