//! Speech provider implementations

mod elevenlabs;
pub mod mock;

pub use elevenlabs::ElevenLabsProvider;
pub use mock::MockProvider;

use std::time::Duration;

use crate::config::ProviderConfig;
use crate::error::{Result, TtsError};
use crate::provider::SpeechProvider;

/// Environment variable holding the ElevenLabs API key
pub const ELEVEN_LABS_API_KEY_ENV: &str = "ELEVEN_LABS_API_KEY";

/// Supported provider types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    ElevenLabs,
    Mock,
}

impl ProviderKind {
    /// Parse provider kind from string
    pub fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "elevenlabs" | "eleven_labs" | "eleven-labs" => Ok(Self::ElevenLabs),
            "mock" => Ok(Self::Mock),
            _ => Err(TtsError::ConfigError(format!("Unknown provider: {}", s))),
        }
    }

    /// Get the environment variable name for this provider's API key
    pub fn env_var(&self) -> Option<&'static str> {
        match self {
            Self::ElevenLabs => Some(ELEVEN_LABS_API_KEY_ENV),
            Self::Mock => None,
        }
    }
}

/// Create a provider instance from config
pub fn get_provider(config: &ProviderConfig) -> Result<Box<dyn SpeechProvider>> {
    get_provider_with_env(config, |name| std::env::var(name).ok())
}

/// Create a provider, resolving the API key through `env`
pub fn get_provider_with_env(
    config: &ProviderConfig,
    env: impl Fn(&str) -> Option<String>,
) -> Result<Box<dyn SpeechProvider>> {
    let kind = ProviderKind::from_str(&config.kind)?;

    match kind {
        ProviderKind::ElevenLabs => {
            let api_key = get_api_key(config, ELEVEN_LABS_API_KEY_ENV, "ElevenLabs", env)?;
            let timeout = Duration::from_secs(config.timeout_secs);
            let provider = match config.base_url.as_deref() {
                Some(base_url) => ElevenLabsProvider::with_base_url(api_key, base_url, timeout)?,
                None => ElevenLabsProvider::new(api_key, timeout)?,
            };
            Ok(Box::new(provider))
        }
        ProviderKind::Mock => Ok(Box::new(MockProvider::always_succeeds(b"mock-audio"))),
    }
}

/// Get API key from config or environment variable
fn get_api_key(
    config: &ProviderConfig,
    env_var: &str,
    provider_name: &str,
    env: impl Fn(&str) -> Option<String>,
) -> Result<String> {
    // Check config first
    if let Some(key) = config.api_key.clone().filter(|k| !k.trim().is_empty()) {
        return Ok(key);
    }

    env(env_var)
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| TtsError::MissingApiKey {
            provider: provider_name.to_string(),
            env_var: env_var.to_string(),
        })
}
