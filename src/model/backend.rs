//! The completion capability seen by the retry layer.

use async_trait::async_trait;
use serde_json::Value;

use super::client::{MessageBuilder, ModelError};

/// A single completion request: system instruction, user prompt and model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    model: String,
    system_prompt: String,
    user_prompt: String,
}

impl CompletionRequest {
    pub fn new(
        model: impl Into<String>,
        system_prompt: impl Into<String>,
        user_prompt: impl Into<String>,
    ) -> Self {
        Self {
            model: model.into(),
            system_prompt: system_prompt.into(),
            user_prompt: user_prompt.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub fn user_prompt(&self) -> &str {
        &self.user_prompt
    }

    /// Messages in OpenAI format: system first, then user.
    pub fn messages(&self) -> Vec<Value> {
        vec![
            MessageBuilder::create_system_message(&self.system_prompt),
            MessageBuilder::create_user_message(&self.user_prompt),
        ]
    }
}

/// A remote text-completion capability.
///
/// One call to [`complete`](CompletionBackend::complete) is one attempt. Any
/// error is treated by the caller as a failed attempt.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Return the text of the first completion choice.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ModelError>;
}

#[async_trait]
impl<T: CompletionBackend + ?Sized> CompletionBackend for std::sync::Arc<T> {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ModelError> {
        (**self).complete(request).await
    }
}
