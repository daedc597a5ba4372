use serde::{Deserialize, Serialize};

/// Default HTTP timeout; long narration requests can take minutes.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Provider-specific configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Provider identifier (elevenlabs, mock)
    #[serde(default = "default_kind")]
    pub kind: String,

    /// API key (optional, can use env var instead)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Custom base URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_kind() -> String {
    "elevenlabs".to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: default_kind(),
            api_key: None,
            base_url: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_provider_config() {
        let config = ProviderConfig::default();
        assert_eq!(config.kind, "elevenlabs");
        assert!(config.api_key.is_none());
        assert_eq!(config.timeout_secs, 300);
    }

    #[test]
    fn test_parse_provider_config() {
        let toml_str = r#"
kind = "mock"
base_url = "http://localhost:8080"
timeout_secs = 60
"#;
        let config: ProviderConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.kind, "mock");
        assert_eq!(config.base_url.as_deref(), Some("http://localhost:8080"));
        assert_eq!(config.timeout_secs, 60);
    }

    #[test]
    fn test_api_key_not_serialized_when_absent() {
        let toml_str = toml::to_string_pretty(&ProviderConfig::default()).unwrap();
        assert!(!toml_str.contains("api_key"));
    }
}
