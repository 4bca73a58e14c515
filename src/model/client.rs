//! Model client for text completion using an OpenAI-compatible API.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

use super::backend::{CompletionBackend, CompletionRequest};
use super::retry::{DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY_SECS};

/// Default endpoint for the chat completions API.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Model client errors.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    #[error("Failed to parse response: {0}")]
    ParseError(String),
    #[error("API error ({status}): {body}")]
    ApiError { status: u16, body: String },
    #[error("Invalid retry policy: {0}")]
    InvalidPolicy(String),
    #[error("Failed to call LLM API after {attempts} attempts")]
    MaxRetriesExceeded {
        attempts: u32,
        #[source]
        source: Box<ModelError>,
    },
}

impl ModelError {
    /// Number of attempts made, if this is a terminal failure.
    pub fn attempts(&self) -> Option<u32> {
        match self {
            ModelError::MaxRetriesExceeded { attempts, .. } => Some(*attempts),
            _ => None,
        }
    }

    /// The error returned by the last attempt, if this is a terminal failure.
    pub fn last_error(&self) -> Option<&ModelError> {
        match self {
            ModelError::MaxRetriesExceeded { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Configuration for the completion model.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub base_url: String,
    pub api_key: String,
    pub model_name: String,
    /// Upper bound on generated tokens; left to the server when `None`.
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    /// Maximum number of calls per request, including the first one.
    pub max_attempts: u32,
    /// Pause between a failed attempt and the next one.
    pub retry_delay: Duration,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            model_name: "gpt-4o-mini".to_string(),
            max_tokens: None,
            temperature: None,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_delay: Duration::from_secs(DEFAULT_RETRY_DELAY_SECS),
        }
    }
}

impl ModelConfig {
    /// Create a new ModelConfig with custom base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Create a new ModelConfig with custom API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    /// Create a new ModelConfig with custom model name.
    pub fn with_model_name(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = model_name.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the maximum number of attempts per request.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Set the delay between attempts.
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }
}

/// OpenAI API response structures.
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    content: Option<String>,
}

/// Client for an OpenAI-compatible chat completions endpoint.
///
/// Makes exactly one HTTP call per [`CompletionBackend::complete`]; retrying
/// is the job of [`RetryingCaller`](super::RetryingCaller).
pub struct ModelClient {
    config: ModelConfig,
    client: Client,
}

impl ModelClient {
    /// Create a new ModelClient with the given configuration.
    pub fn new(config: ModelConfig) -> Result<Self, ModelError> {
        // No idle connections are kept, so every attempt opens a fresh one.
        let client = Client::builder().pool_max_idle_per_host(0).build()?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    fn build_body(&self, request: &CompletionRequest) -> Value {
        let mut body = json!({
            "model": request.model(),
            "messages": request.messages(),
        });

        if let Value::Object(ref mut map) = body {
            if let Some(max_tokens) = self.config.max_tokens {
                map.insert("max_tokens".to_string(), json!(max_tokens));
            }
            if let Some(temperature) = self.config.temperature {
                map.insert("temperature".to_string(), json!(temperature));
            }
        }

        body
    }

    /// Send a single request to the API.
    async fn send_request(&self, body: &Value) -> Result<String, ModelError> {
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ModelError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ModelError::ParseError(e.to_string()))?;

        completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ModelError::ParseError("No choices in response".to_string()))?
            .message
            .content
            .ok_or_else(|| ModelError::ParseError("First choice has no content".to_string()))
    }
}

#[async_trait]
impl CompletionBackend for ModelClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ModelError> {
        let body = self.build_body(request);
        tracing::debug!(model = request.model(), "Sending chat completion request");
        self.send_request(&body).await
    }
}

/// Helper for building conversation messages.
pub struct MessageBuilder;

impl MessageBuilder {
    /// Create a system message.
    pub fn create_system_message(content: &str) -> Value {
        json!({
            "role": "system",
            "content": content
        })
    }

    /// Create a plain-text user message.
    pub fn create_user_message(content: &str) -> Value {
        json!({
            "role": "user",
            "content": content
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn completion_body(content: &str) -> Value {
        json!({
            "id": "chatcmpl-123",
            "object": "chat.completion",
            "choices": [
                {
                    "index": 0,
                    "message": { "role": "assistant", "content": content },
                    "finish_reason": "stop"
                },
                {
                    "index": 1,
                    "message": { "role": "assistant", "content": "second choice" },
                    "finish_reason": "stop"
                }
            ]
        })
    }

    fn client_for(server: &MockServer) -> ModelClient {
        let config = ModelConfig::default()
            .with_base_url(format!("{}/v1/", server.uri()))
            .with_api_key("test-key")
            .with_model_name("test-model");
        ModelClient::new(config).unwrap()
    }

    #[test]
    fn test_model_config_default() {
        let config = ModelConfig::default();
        assert_eq!(config.base_url, "https://api.openai.com/v1");
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.retry_delay, Duration::from_secs(5));
        assert!(config.max_tokens.is_none());
    }

    #[test]
    fn test_message_builder() {
        let system_msg = MessageBuilder::create_system_message("");
        assert_eq!(system_msg["role"], "system");
        assert_eq!(system_msg["content"], "");

        let user_msg = MessageBuilder::create_user_message("Hello");
        assert_eq!(user_msg["role"], "user");
        assert_eq!(user_msg["content"], "Hello");
    }

    #[test]
    fn test_build_body_includes_optional_parameters() {
        let config = ModelConfig::default()
            .with_max_tokens(256)
            .with_temperature(0.5);
        let client = ModelClient::new(config).unwrap();
        let request = CompletionRequest::new("m", "sys", "user");

        let body = client.build_body(&request);
        assert_eq!(body["model"], "m");
        assert_eq!(body["max_tokens"], 256);
        assert_eq!(body["temperature"], 0.5);
        assert_eq!(body["messages"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_complete_returns_first_choice() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_json(json!({
                "model": "test-model",
                "messages": [
                    { "role": "system", "content": "" },
                    { "role": "user", "content": "Summarize this" }
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("- point")))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let request = CompletionRequest::new("test-model", "", "Summarize this");
        let text = client.complete(&request).await.unwrap();
        assert_eq!(text, "- point");
    }

    #[tokio::test]
    async fn test_complete_maps_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let request = CompletionRequest::new("test-model", "", "hi");
        match client.complete(&request).await {
            Err(ModelError::ApiError { status, body }) => {
                assert_eq!(status, 401);
                assert_eq!(body, "invalid api key");
            }
            other => panic!("expected ApiError, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_complete_rejects_empty_choices() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let request = CompletionRequest::new("test-model", "", "hi");
        let err = client.complete(&request).await.unwrap_err();
        assert!(matches!(err, ModelError::ParseError(_)));
    }

    #[tokio::test]
    async fn test_complete_rejects_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let request = CompletionRequest::new("test-model", "", "hi");
        let err = client.complete(&request).await.unwrap_err();
        assert!(matches!(err, ModelError::ParseError(_)));
    }

    #[test]
    fn test_terminal_error_accessors() {
        let err = ModelError::MaxRetriesExceeded {
            attempts: 3,
            source: Box::new(ModelError::ParseError("bad".to_string())),
        };
        assert_eq!(err.attempts(), Some(3));
        assert!(matches!(err.last_error(), Some(ModelError::ParseError(_))));
        assert_eq!(err.to_string(), "Failed to call LLM API after 3 attempts");
        assert_eq!(
            std::error::Error::source(&err).map(ToString::to_string),
            Some("Failed to parse response: bad".to_string())
        );
        assert_eq!(ModelError::ParseError("x".to_string()).attempts(), None);
    }
}
