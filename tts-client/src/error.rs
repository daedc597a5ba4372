use thiserror::Error;

#[derive(Error, Debug)]
pub enum TtsError {
    #[error(
        "API key not found for {provider}. Set {env_var} environment variable or add to config."
    )]
    MissingApiKey { provider: String, env_var: String },

    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("Rate limit exceeded{}", .retry_after.map(|s| format!(". Retry after {} seconds", s)).unwrap_or_default())]
    RateLimited { retry_after: Option<u64> },

    #[error("API error{}: {message}", status_code.map(|c| format!(" (HTTP {})", c)).unwrap_or_default())]
    ApiError {
        message: String,
        status_code: Option<u16>,
    },

    #[error("Provider returned no audio for a {chars} character request")]
    EmptyAudio { chars: usize },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TtsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limited_display() {
        let err = TtsError::RateLimited {
            retry_after: Some(30),
        };
        assert_eq!(err.to_string(), "Rate limit exceeded. Retry after 30 seconds");

        let err = TtsError::RateLimited { retry_after: None };
        assert_eq!(err.to_string(), "Rate limit exceeded");
    }

    #[test]
    fn test_api_error_display() {
        let err = TtsError::ApiError {
            message: "voice not found".to_string(),
            status_code: Some(404),
        };
        assert_eq!(err.to_string(), "API error (HTTP 404): voice not found");
    }

    #[test]
    fn test_missing_api_key_mentions_env_var() {
        let err = TtsError::MissingApiKey {
            provider: "ElevenLabs".to_string(),
            env_var: "ELEVEN_LABS_API_KEY".to_string(),
        };
        assert!(err.to_string().contains("ELEVEN_LABS_API_KEY"));
    }
}
