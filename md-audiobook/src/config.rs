//! md-audio configuration management.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tts_client::{ProviderConfig, VoiceSettings};

use crate::text::DEFAULT_CHUNK_LIMIT;

/// Calm, clear narration voice.
pub const DEFAULT_VOICE_ID: &str = "21m00Tcm4TlvDq8ikWAM";
pub const DEFAULT_MODEL_ID: &str = "eleven_multilingual_v2";

pub const VOICE_ID_ENV: &str = "ELEVEN_LABS_VOICE_ID";
pub const MODEL_ID_ENV: &str = "ELEVEN_LABS_MODEL_ID";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudiobookConfig {
    /// Default voice identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice_id: Option<String>,

    /// Default model identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_id: Option<String>,

    /// Maximum characters per synthesis request
    #[serde(default = "default_chunk_limit")]
    pub chunk_limit: usize,

    #[serde(default)]
    pub voice_settings: VoiceSettings,

    #[serde(default)]
    pub provider: ProviderConfig,
}

fn default_chunk_limit() -> usize {
    DEFAULT_CHUNK_LIMIT
}

impl Default for AudiobookConfig {
    fn default() -> Self {
        Self {
            voice_id: None,
            model_id: None,
            chunk_limit: default_chunk_limit(),
            voice_settings: VoiceSettings::default(),
            provider: ProviderConfig::default(),
        }
    }
}

/// Values given explicitly on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub voice_id: Option<String>,
    pub model_id: Option<String>,
    pub chunk_limit: Option<usize>,
}

/// Fully resolved settings handed to the narrator.
#[derive(Debug, Clone, PartialEq)]
pub struct NarrationSettings {
    pub voice_id: String,
    pub model_id: String,
    pub chunk_limit: usize,
    pub voice_settings: VoiceSettings,
}

impl Default for NarrationSettings {
    fn default() -> Self {
        AudiobookConfig::default().resolve_with_env(&Overrides::default(), |_| None)
    }
}

impl AudiobookConfig {
    /// Get the config file path: ~/.config/cli-programs/md-audio.toml
    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not determine home directory")?;
        Ok(home.join(".config").join("cli-programs").join("md-audio.toml"))
    }

    /// Load config from file, returning default if file doesn't exist
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;
        fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))
    }

    /// Resolve settings from overrides, the process environment and this file.
    pub fn resolve(&self, overrides: &Overrides) -> NarrationSettings {
        self.resolve_with_env(overrides, |name| std::env::var(name).ok())
    }

    /// Resolve settings with an explicit environment lookup.
    ///
    /// Voice and model: override > environment > config file > default.
    /// Chunk limit: override > config file.
    pub fn resolve_with_env(
        &self,
        overrides: &Overrides,
        env: impl Fn(&str) -> Option<String>,
    ) -> NarrationSettings {
        let pick = |explicit: &Option<String>, env_var: &str, file: &Option<String>, default: &str| {
            explicit
                .clone()
                .or_else(|| env(env_var).filter(|v| !v.trim().is_empty()))
                .or_else(|| file.clone())
                .unwrap_or_else(|| default.to_string())
        };

        NarrationSettings {
            voice_id: pick(&overrides.voice_id, VOICE_ID_ENV, &self.voice_id, DEFAULT_VOICE_ID),
            model_id: pick(&overrides.model_id, MODEL_ID_ENV, &self.model_id, DEFAULT_MODEL_ID),
            chunk_limit: overrides.chunk_limit.unwrap_or(self.chunk_limit),
            voice_settings: self.voice_settings.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AudiobookConfig::default();
        assert!(config.voice_id.is_none());
        assert!(config.model_id.is_none());
        assert_eq!(config.chunk_limit, 9500);
        assert_eq!(config.provider.kind, "elevenlabs");
    }

    #[test]
    fn test_config_path() {
        let path = AudiobookConfig::config_path().unwrap();
        assert!(path.ends_with("cli-programs/md-audio.toml"));
    }

    #[test]
    fn test_parse_config() {
        let toml_str = r#"
voice_id = "voice-from-file"
model_id = "eleven_turbo_v2"
chunk_limit = 4000

[voice_settings]
stability = 0.3

[provider]
kind = "mock"
"#;
        let config: AudiobookConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.voice_id.as_deref(), Some("voice-from-file"));
        assert_eq!(config.model_id.as_deref(), Some("eleven_turbo_v2"));
        assert_eq!(config.chunk_limit, 4000);
        assert_eq!(config.voice_settings.stability, 0.3);
        assert_eq!(config.voice_settings.similarity_boost, 0.75);
        assert_eq!(config.provider.kind, "mock");
    }

    #[test]
    fn test_parse_empty_config() {
        let config: AudiobookConfig = toml::from_str("").unwrap();
        assert_eq!(config, AudiobookConfig::default());
    }

    #[test]
    fn test_serialization_round_trip() {
        let config = AudiobookConfig {
            voice_id: Some("v".to_string()),
            ..AudiobookConfig::default()
        };
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AudiobookConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_resolve_defaults() {
        let settings = NarrationSettings::default();
        assert_eq!(settings.voice_id, DEFAULT_VOICE_ID);
        assert_eq!(settings.model_id, DEFAULT_MODEL_ID);
        assert_eq!(settings.chunk_limit, 9500);
    }

    #[test]
    fn test_resolve_precedence() {
        let config = AudiobookConfig {
            voice_id: Some("file-voice".to_string()),
            model_id: Some("file-model".to_string()),
            chunk_limit: 3000,
            ..AudiobookConfig::default()
        };
        let env = |name: &str| match name {
            VOICE_ID_ENV => Some("env-voice".to_string()),
            MODEL_ID_ENV => Some("env-model".to_string()),
            _ => None,
        };

        // Environment beats the config file
        let settings = config.resolve_with_env(&Overrides::default(), env);
        assert_eq!(settings.voice_id, "env-voice");
        assert_eq!(settings.model_id, "env-model");
        assert_eq!(settings.chunk_limit, 3000);

        // Explicit arguments beat everything
        let overrides = Overrides {
            voice_id: Some("arg-voice".to_string()),
            model_id: None,
            chunk_limit: Some(500),
        };
        let settings = config.resolve_with_env(&overrides, env);
        assert_eq!(settings.voice_id, "arg-voice");
        assert_eq!(settings.model_id, "env-model");
        assert_eq!(settings.chunk_limit, 500);
    }

    #[test]
    fn test_resolve_falls_back_to_file() {
        let config = AudiobookConfig {
            voice_id: Some("file-voice".to_string()),
            ..AudiobookConfig::default()
        };
        let settings = config.resolve_with_env(&Overrides::default(), |_| Some("  ".to_string()));
        assert_eq!(settings.voice_id, "file-voice");
        assert_eq!(settings.model_id, DEFAULT_MODEL_ID);
    }
}
