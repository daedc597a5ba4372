//! Mock speech provider for testing
//!
//! Returns deterministic audio bytes, records every request it receives and
//! can be told to fail from a given call onwards.

use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{Result, TtsError};
use crate::provider::{SpeechAudio, SpeechProvider, SpeechRequest};

/// A mock provider for testing orchestration code
pub struct MockProvider {
    /// Zero-based call index from which every call fails (usize::MAX = never)
    fail_from: usize,
    /// Current call count
    call_count: AtomicUsize,
    /// Requests received, in order
    requests: Mutex<Vec<SpeechRequest>>,
    /// Audio returned on success
    audio: Vec<u8>,
    /// Echo the request text after the audio bytes
    echo_text: bool,
}

impl MockProvider {
    /// Create a provider that always succeeds with `audio`
    pub fn always_succeeds(audio: &[u8]) -> Self {
        Self {
            fail_from: usize::MAX,
            call_count: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
            audio: audio.to_vec(),
            echo_text: false,
        }
    }

    /// Create a provider that succeeds `n` times, then fails on every call
    pub fn succeeds_then_fails(n: usize, audio: &[u8]) -> Self {
        Self {
            fail_from: n,
            ..Self::always_succeeds(audio)
        }
    }

    /// Append each request's text to the returned bytes, so outputs can be
    /// traced back to the segment that produced them
    pub fn echoing(mut self) -> Self {
        self.echo_text = true;
        self
    }

    /// Get the number of times synthesize() was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Get a copy of every request received so far
    pub fn requests(&self) -> Vec<SpeechRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl SpeechProvider for MockProvider {
    async fn synthesize(&self, request: &SpeechRequest) -> Result<SpeechAudio> {
        let call_num = self.call_count.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        if call_num >= self.fail_from {
            return Err(TtsError::ApiError {
                message: format!("mock failure on call {}", call_num + 1),
                status_code: Some(500),
            });
        }

        let mut bytes = self.audio.clone();
        if self.echo_text {
            bytes.extend_from_slice(request.text.as_bytes());
        }

        Ok(SpeechAudio {
            bytes,
            content_type: Some("audio/mpeg".to_string()),
        })
    }

    fn name(&self) -> &'static str {
        "mock"
    }

    fn is_available(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(text: &str) -> SpeechRequest {
        SpeechRequest::new(text, "voice", "model")
    }

    #[tokio::test]
    async fn test_always_succeeds() {
        let provider = MockProvider::always_succeeds(b"ID3");
        let audio = provider.synthesize(&request("test")).await.unwrap();
        assert_eq!(audio.bytes, b"ID3");
        assert_eq!(audio.content_type.as_deref(), Some("audio/mpeg"));
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_succeeds_then_fails() {
        let provider = MockProvider::succeeds_then_fails(2, b"ID3");

        assert!(provider.synthesize(&request("one")).await.is_ok());
        assert!(provider.synthesize(&request("two")).await.is_ok());
        assert!(provider.synthesize(&request("three")).await.is_err());
        assert!(provider.synthesize(&request("four")).await.is_err());
        assert_eq!(provider.call_count(), 4);
    }

    #[tokio::test]
    async fn test_records_requests_in_order() {
        let provider = MockProvider::always_succeeds(b"").echoing();
        provider.synthesize(&request("first")).await.unwrap();
        let audio = provider.synthesize(&request("second")).await.unwrap();

        let texts: Vec<String> = provider.requests().into_iter().map(|r| r.text).collect();
        assert_eq!(texts, vec!["first", "second"]);
        assert_eq!(audio.bytes, b"second");
    }
}
