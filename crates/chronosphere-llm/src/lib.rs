//! Chronosphere Completion Provider Layer
//!
//! Implementations of the `CompletionProvider` trait from `chronosphere-domain`.
//! Every provider answers a forced structured call with the raw JSON argument
//! payload; validating that payload is the caller's job.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `OpenAiProvider`: OpenAI-compatible chat completions with tool calling
//!
//! # Examples
//!
//! ```
//! use chronosphere_domain::traits::{ChatMessage, CompletionProvider, CompletionRequest, FunctionSpec};
//! use chronosphere_llm::MockProvider;
//!
//! let provider = MockProvider::new(r#"{"dates": []}"#);
//! let request = CompletionRequest {
//!     messages: vec![ChatMessage::user("Nothing happened.")],
//!     function: FunctionSpec {
//!         name: "extract_dates".to_string(),
//!         description: String::new(),
//!         parameters: serde_json::json!({"type": "object"}),
//!     },
//! };
//! let runtime = tokio::runtime::Runtime::new().unwrap();
//! let payload = runtime.block_on(provider.complete(&request)).unwrap();
//! assert_eq!(payload, r#"{"dates": []}"#);
//! ```

#![warn(missing_docs)]

pub mod openai;

use chronosphere_domain::traits::{CompletionProvider, CompletionRequest, Role};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use thiserror::Error;

pub use openai::{OpenAiConfig, OpenAiProvider};

/// Errors that can occur during completion calls
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Response body could not be understood
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The service answered without the forced function call
    #[error("No structured result for function '{0}'")]
    MissingStructuredResult(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Provider is misconfigured (missing key, bad endpoint)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

#[derive(Debug, Clone)]
enum MockReply {
    Payload(String),
    Error,
}

/// Mock completion provider for deterministic testing
///
/// Replies are keyed by the content of the request's last user message (the
/// narrative text). Unknown prompts get the default payload.
///
/// # Examples
///
/// ```
/// use chronosphere_llm::MockProvider;
///
/// let mut provider = MockProvider::default();
/// provider.add_response("In 1905 Alberta became a province.", r#"{"dates": []}"#);
/// provider.add_error("bad text");
/// assert_eq!(provider.call_count(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_payload: String,
    replies: Arc<Mutex<HashMap<String, MockReply>>>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
    delay: Option<Duration>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed payload for all prompts
    pub fn new(payload: impl Into<String>) -> Self {
        Self {
            default_payload: payload.into(),
            replies: Arc::new(Mutex::new(HashMap::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            delay: None,
        }
    }

    /// Delay every reply, e.g. to exercise timeouts
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Add a specific payload for a given narrative text
    pub fn add_response(&mut self, text: impl Into<String>, payload: impl Into<String>) {
        lock(&self.replies).insert(text.into(), MockReply::Payload(payload.into()));
    }

    /// Configure to fail for a specific narrative text
    pub fn add_error(&mut self, text: impl Into<String>) {
        lock(&self.replies).insert(text.into(), MockReply::Error);
    }

    /// Get the number of times complete was called
    pub fn call_count(&self) -> usize {
        lock(&self.requests).len()
    }

    /// Requests received so far, in call order
    pub fn requests(&self) -> Vec<CompletionRequest> {
        lock(&self.requests).clone()
    }

    /// Reset the recorded requests
    pub fn reset_call_count(&self) {
        lock(&self.requests).clear();
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new(r#"{"dates": []}"#)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl CompletionProvider for MockProvider {
    type Error = LlmError;

    async fn complete(&self, request: &CompletionRequest) -> Result<String, Self::Error> {
        lock(&self.requests).push(request.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let key = request
            .messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
            .unwrap_or_default();

        match lock(&self.replies).get(key) {
            Some(MockReply::Payload(payload)) => Ok(payload.clone()),
            Some(MockReply::Error) => Err(LlmError::Other("Mock error".to_string())),
            None => Ok(self.default_payload.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chronosphere_domain::traits::{ChatMessage, FunctionSpec};

    fn request(text: &str) -> CompletionRequest {
        CompletionRequest {
            messages: vec![ChatMessage::system("Extract dates."), ChatMessage::user(text)],
            function: FunctionSpec {
                name: "extract_dates".to_string(),
                description: "test".to_string(),
                parameters: serde_json::json!({ "type": "object" }),
            },
        }
    }

    #[tokio::test]
    async fn test_mock_provider_default() {
        let provider = MockProvider::new("payload");
        let result = provider.complete(&request("anything")).await;
        assert_eq!(result.unwrap(), "payload");
    }

    #[tokio::test]
    async fn test_mock_provider_specific_responses() {
        let mut provider = MockProvider::default();
        provider.add_response("hello", "world");
        provider.add_response("foo", "bar");

        assert_eq!(provider.complete(&request("hello")).await.unwrap(), "world");
        assert_eq!(provider.complete(&request("foo")).await.unwrap(), "bar");
        assert_eq!(
            provider.complete(&request("unknown")).await.unwrap(),
            r#"{"dates": []}"#
        );
    }

    #[tokio::test]
    async fn test_mock_provider_call_count() {
        let provider = MockProvider::new("test");
        assert_eq!(provider.call_count(), 0);

        provider.complete(&request("a")).await.unwrap();
        provider.complete(&request("b")).await.unwrap();
        assert_eq!(provider.call_count(), 2);
        assert_eq!(provider.requests()[1].messages[1].content, "b");

        provider.reset_call_count();
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_mock_provider_error() {
        let mut provider = MockProvider::default();
        provider.add_error("bad text");

        let result = provider.complete(&request("bad text")).await;
        assert!(matches!(result, Err(LlmError::Other(_))));
    }

    #[tokio::test]
    async fn test_mock_provider_clone_shares_state() {
        let provider1 = MockProvider::new("test");
        let provider2 = provider1.clone();

        provider1.complete(&request("x")).await.unwrap();

        assert_eq!(provider1.call_count(), 1);
        assert_eq!(provider2.call_count(), 1);
    }
}
