//! OpenAI Provider Implementation
//!
//! Talks to an OpenAI-compatible `/v1/chat/completions` endpoint. The
//! request declares a single function tool built from the request's
//! `FunctionSpec` and forces it with `tool_choice`, so the reply carries the
//! structured arguments rather than free text.
//!
//! # Features
//!
//! - Async HTTP communication with the chat completions API
//! - Configurable endpoint, model and API key source
//! - Retry logic with exponential backoff for rate limits and server errors
//! - Timeout handling
//!
//! # Examples
//!
//! ```no_run
//! use chronosphere_llm::{OpenAiConfig, OpenAiProvider};
//!
//! let config = OpenAiConfig::default();
//! let provider = OpenAiProvider::from_env(config).expect("OPENAI_API_KEY must be set");
//! ```

use crate::LlmError;
use chronosphere_domain::traits::{ChatMessage, CompletionProvider, CompletionRequest};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Default API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com";

/// Default chat model
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo-1106";

/// Default environment variable holding the API key
pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Default timeout for completion requests (60 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default number of attempts per request
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Connection settings for an OpenAI-compatible service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    /// Base URL, without the `/v1/...` path
    pub endpoint: String,

    /// Model name
    pub model: String,

    /// Environment variable the API key is read from
    pub api_key_env: String,

    /// Per-request HTTP timeout (seconds)
    pub timeout_secs: u64,

    /// Maximum attempts per request
    pub max_retries: u32,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

impl OpenAiConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.endpoint.is_empty() {
            return Err("endpoint must not be empty".to_string());
        }
        if self.model.is_empty() {
            return Err("model must not be empty".to_string());
        }
        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }
        if self.max_retries == 0 {
            return Err("max_retries must be greater than 0".to_string());
        }
        Ok(())
    }
}

/// OpenAI chat completions provider
pub struct OpenAiProvider {
    endpoint: String,
    model: String,
    api_key: String,
    client: reqwest::Client,
    max_retries: u32,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    tools: [ToolDefinition<'a>; 1],
    tool_choice: ToolChoice<'a>,
}

#[derive(Serialize)]
struct ToolDefinition<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    function: &'a chronosphere_domain::traits::FunctionSpec,
}

#[derive(Serialize)]
struct ToolChoice<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    function: ToolChoiceFunction<'a>,
}

#[derive(Serialize)]
struct ToolChoiceFunction<'a> {
    name: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    tool_calls: Vec<ToolCall>,
    #[serde(default)]
    function_call: Option<FunctionCall>,
}

#[derive(Deserialize)]
struct ToolCall {
    function: FunctionCall,
}

#[derive(Deserialize)]
struct FunctionCall {
    #[serde(default)]
    name: String,
    arguments: String,
}

impl OpenAiProvider {
    /// Create a provider with an explicit API key
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Configuration` if the configuration is invalid or
    /// the HTTP client cannot be built.
    pub fn new(config: OpenAiConfig, api_key: impl Into<String>) -> Result<Self, LlmError> {
        config.validate().map_err(LlmError::Configuration)?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model,
            api_key: api_key.into(),
            client,
            max_retries: config.max_retries,
        })
    }

    /// Create a provider reading the API key from `config.api_key_env`
    pub fn from_env(config: OpenAiConfig) -> Result<Self, LlmError> {
        let api_key = std::env::var(&config.api_key_env).map_err(|_| {
            LlmError::Configuration(format!("Environment variable {} is not set", config.api_key_env))
        })?;
        Self::new(config, api_key)
    }

    /// Model this provider talks to
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Issue the forced function call and return its raw arguments
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The service is unreachable or keeps failing after all retries
    /// - The model is not available
    /// - The response does not contain the forced function call
    pub async fn call_function(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        let url = format!("{}/v1/chat/completions", self.endpoint);
        let function_name = request.function.name.as_str();

        let body = ChatRequest {
            model: &self.model,
            messages: &request.messages,
            tools: [ToolDefinition {
                kind: "function",
                function: &request.function,
            }],
            tool_choice: ToolChoice {
                kind: "function",
                function: ToolChoiceFunction { name: function_name },
            },
        };

        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.max_retries {
            match self
                .client
                .post(&url)
                .bearer_auth(&self.api_key)
                .json(&body)
                .send()
                .await
            {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let parsed = response.json::<ChatResponse>().await.map_err(|e| {
                            LlmError::InvalidResponse(format!("Failed to parse response: {}", e))
                        })?;
                        return extract_arguments(parsed, function_name);
                    } else if status == reqwest::StatusCode::NOT_FOUND {
                        return Err(LlmError::ModelNotAvailable(self.model.clone()));
                    } else if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                        last_error = Some(LlmError::RateLimitExceeded);
                    } else if status.is_server_error() {
                        let error_text = response
                            .text()
                            .await
                            .unwrap_or_else(|_| "Unknown error".to_string());
                        last_error = Some(LlmError::Communication(format!(
                            "HTTP {}: {}",
                            status, error_text
                        )));
                    } else {
                        let error_text = response
                            .text()
                            .await
                            .unwrap_or_else(|_| "Unknown error".to_string());
                        return Err(LlmError::Communication(format!(
                            "HTTP {}: {}",
                            status, error_text
                        )));
                    }
                }
                Err(e) => {
                    last_error = Some(LlmError::Communication(format!("Request failed: {}", e)));
                }
            }

            attempts += 1;
            if attempts < self.max_retries {
                // Exponential backoff: 1s, 2s, 4s, etc.
                let delay = Duration::from_secs(2u64.pow(attempts - 1));
                warn!("Completion attempt {} failed, retrying in {:?}", attempts, delay);
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error
            .unwrap_or_else(|| LlmError::Communication("Max retries exceeded".to_string())))
    }
}

/// Pull the forced call's arguments out of a chat response
fn extract_arguments(response: ChatResponse, function_name: &str) -> Result<String, LlmError> {
    let message = response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message)
        .ok_or_else(|| LlmError::InvalidResponse("Response has no choices".to_string()))?;

    let call = message
        .tool_calls
        .into_iter()
        .map(|tool| tool.function)
        .chain(message.function_call)
        .find(|call| call.name.is_empty() || call.name == function_name)
        .ok_or_else(|| LlmError::MissingStructuredResult(function_name.to_string()))?;

    debug!("Structured result for '{}': {} chars", function_name, call.arguments.len());
    Ok(call.arguments)
}

impl CompletionProvider for OpenAiProvider {
    type Error = LlmError;

    async fn complete(&self, request: &CompletionRequest) -> Result<String, Self::Error> {
        self.call_function(request).await
    }
}
