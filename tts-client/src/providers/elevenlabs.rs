//! ElevenLabs text-to-speech provider
//!
//! Direct HTTP implementation of the `/v1/text-to-speech/{voice_id}` endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE, RETRY_AFTER};
use reqwest::{Client, StatusCode};
use serde::Serialize;

use crate::error::{Result, TtsError};
use crate::provider::{SpeechAudio, SpeechProvider, SpeechRequest, VoiceSettings};

const ELEVEN_LABS_API_URL: &str = "https://api.elevenlabs.io";
const OUTPUT_FORMAT: &str = "mp3_44100_128";

/// Provider for the ElevenLabs API
pub struct ElevenLabsProvider {
    api_key: String,
    base_url: String,
    client: Client,
}

impl ElevenLabsProvider {
    /// Create a provider against the public API
    pub fn new(api_key: String, timeout: Duration) -> Result<Self> {
        Self::with_base_url(api_key, ELEVEN_LABS_API_URL, timeout)
    }

    /// Create a provider against a custom endpoint (proxies, test servers)
    pub fn with_base_url(api_key: String, base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn endpoint(&self, voice_id: &str) -> String {
        format!("{}/v1/text-to-speech/{}", self.base_url, voice_id)
    }
}

#[derive(Debug, Serialize)]
struct TextToSpeechRequest<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: &'a VoiceSettings,
}

/// Pull a human-readable message out of an error body.
///
/// The API reports `{"detail": {"status": .., "message": ..}}` for most
/// failures and `{"detail": "..."}` for some; anything else is passed through.
fn error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return body.trim().to_string();
    };

    let detail = &value["detail"];
    if let Some(message) = detail["message"].as_str() {
        return message.to_string();
    }
    if let Some(message) = detail.as_str() {
        return message.to_string();
    }
    body.trim().to_string()
}

fn status_error(status: StatusCode, retry_after: Option<u64>, body: &str) -> TtsError {
    let message = error_message(body);
    match status.as_u16() {
        401 => TtsError::Unauthorized { message },
        429 => TtsError::RateLimited { retry_after },
        code => TtsError::ApiError {
            message,
            status_code: Some(code),
        },
    }
}

#[async_trait]
impl SpeechProvider for ElevenLabsProvider {
    async fn synthesize(&self, request: &SpeechRequest) -> Result<SpeechAudio> {
        let body = TextToSpeechRequest {
            text: &request.text,
            model_id: &request.model_id,
            voice_settings: &request.voice_settings,
        };

        log::debug!(
            "POST {} ({} chars, model {})",
            self.endpoint(&request.voice_id),
            request.text.chars().count(),
            request.model_id
        );

        let response = self
            .client
            .post(self.endpoint(&request.voice_id))
            .query(&[("output_format", OUTPUT_FORMAT)])
            .header("xi-api-key", &self.api_key)
            .header(ACCEPT, "audio/mpeg")
            .json(&body)
            .send()
            .await
            .map_err(|e| TtsError::ApiError {
                message: format!("Request failed: {}", e),
                status_code: None,
            })?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse().ok());
            let error_text = response.text().await.unwrap_or_default();
            return Err(status_error(status, retry_after, &error_text));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let bytes = response.bytes().await?.to_vec();
        if bytes.is_empty() {
            return Err(TtsError::EmptyAudio {
                chars: request.text.chars().count(),
            });
        }

        Ok(SpeechAudio {
            bytes,
            content_type,
        })
    }

    fn name(&self) -> &'static str {
        "ElevenLabs"
    }

    fn is_available(&self) -> Result<()> {
        // API key was provided in constructor
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(base_url: &str) -> ElevenLabsProvider {
        ElevenLabsProvider::with_base_url("key".to_string(), base_url, Duration::from_secs(5))
            .unwrap()
    }

    #[test]
    fn test_endpoint() {
        let p = provider("https://example.test/");
        assert_eq!(
            p.endpoint("abc123"),
            "https://example.test/v1/text-to-speech/abc123"
        );
    }

    #[test]
    fn test_default_endpoint() {
        let p = ElevenLabsProvider::new("key".to_string(), Duration::from_secs(5)).unwrap();
        assert!(p.endpoint("v").starts_with("https://api.elevenlabs.io/v1/"));
    }

    #[test]
    fn test_request_body_shape() {
        let settings = VoiceSettings::default();
        let body = TextToSpeechRequest {
            text: "Hello.",
            model_id: "eleven_multilingual_v2",
            voice_settings: &settings,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["text"], "Hello.");
        assert_eq!(json["model_id"], "eleven_multilingual_v2");
        assert_eq!(json["voice_settings"]["stability"], 0.5);
    }

    #[test]
    fn test_error_message_nested_detail() {
        let body = r#"{"detail":{"status":"voice_not_found","message":"Voice does not exist"}}"#;
        assert_eq!(error_message(body), "Voice does not exist");
    }

    #[test]
    fn test_error_message_string_detail() {
        assert_eq!(error_message(r#"{"detail":"Bad input"}"#), "Bad input");
    }

    #[test]
    fn test_error_message_plain_text() {
        assert_eq!(error_message("  upstream timeout \n"), "upstream timeout");
    }

    #[test]
    fn test_status_error_mapping() {
        assert!(matches!(
            status_error(StatusCode::UNAUTHORIZED, None, "{}"),
            TtsError::Unauthorized { .. }
        ));
        assert!(matches!(
            status_error(StatusCode::TOO_MANY_REQUESTS, Some(12), ""),
            TtsError::RateLimited {
                retry_after: Some(12)
            }
        ));
        match status_error(StatusCode::BAD_REQUEST, None, r#"{"detail":"text too long"}"#) {
            TtsError::ApiError {
                message,
                status_code,
            } => {
                assert_eq!(message, "text too long");
                assert_eq!(status_code, Some(400));
            }
            other => panic!("unexpected error: {}", other),
        }
    }
}
