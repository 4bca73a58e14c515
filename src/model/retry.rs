//! Bounded retry around a completion backend.

use std::fmt;
use std::time::Duration;
use tokio::time::sleep;

use super::backend::{CompletionBackend, CompletionRequest};
use super::client::{ModelClient, ModelConfig, ModelError};

/// Default number of attempts per request.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default delay between attempts in seconds.
pub const DEFAULT_RETRY_DELAY_SECS: u64 = 5;

/// How many times to call and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_delay: Duration::from_secs(DEFAULT_RETRY_DELAY_SECS),
        }
    }
}

impl RetryPolicy {
    /// Create a policy. `max_attempts` must be at least 1.
    pub fn new(max_attempts: u32, retry_delay: Duration) -> Result<Self, ModelError> {
        if max_attempts == 0 {
            return Err(ModelError::InvalidPolicy(
                "max_attempts must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            max_attempts,
            retry_delay,
        })
    }

    pub fn from_config(config: &ModelConfig) -> Result<Self, ModelError> {
        Self::new(config.max_attempts, config.retry_delay)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn retry_delay(&self) -> Duration {
        self.retry_delay
    }

    /// Classify the result of attempt number `attempt` (1-based).
    pub fn outcome(&self, attempt: u32, result: Result<String, ModelError>) -> CallOutcome {
        match result {
            Ok(text) => CallOutcome::Success(text),
            Err(error) if attempt < self.max_attempts => CallOutcome::TransientFailure(error),
            Err(error) => CallOutcome::TerminalFailure {
                error,
                attempts: attempt,
            },
        }
    }
}

/// What a single attempt means for the retry sequence.
#[derive(Debug)]
pub enum CallOutcome {
    /// The call returned text; no further attempts.
    Success(String),
    /// The call failed but attempts remain.
    TransientFailure(ModelError),
    /// The call failed and it was the last allowed attempt.
    TerminalFailure { error: ModelError, attempts: u32 },
}

/// Position of a request in the retry state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallState {
    Idle,
    Calling { attempt: u32 },
    WaitingToRetry { attempt: u32 },
    Success { attempt: u32 },
    Failed { attempts: u32 },
}

impl CallState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, CallState::Success { .. } | CallState::Failed { .. })
    }

    fn advance(&mut self, next: CallState) {
        tracing::trace!(from = %self, to = %next, "Call state transition");
        *self = next;
    }
}

impl fmt::Display for CallState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallState::Idle => write!(f, "idle"),
            CallState::Calling { attempt } => write!(f, "calling (attempt {attempt})"),
            CallState::WaitingToRetry { attempt } => {
                write!(f, "waiting to retry (after attempt {attempt})")
            }
            CallState::Success { attempt } => write!(f, "success (attempt {attempt})"),
            CallState::Failed { attempts } => write!(f, "failed after {attempts} attempts"),
        }
    }
}

/// Calls a completion backend, masking failures behind bounded retry.
///
/// At most `max_attempts` calls are made per request. Failed attempts are
/// logged and swallowed; only exhaustion is returned, as
/// [`ModelError::MaxRetriesExceeded`] wrapping the last attempt's error.
pub struct RetryingCaller<B> {
    backend: B,
    policy: RetryPolicy,
    model: String,
}

impl RetryingCaller<ModelClient> {
    /// Build an HTTP-backed caller from a model configuration.
    pub fn from_config(config: ModelConfig) -> Result<Self, ModelError> {
        let policy = RetryPolicy::from_config(&config)?;
        let model = config.model_name.clone();
        Ok(Self::new(ModelClient::new(config)?, policy, model))
    }
}

impl<B: CompletionBackend> RetryingCaller<B> {
    pub fn new(backend: B, policy: RetryPolicy, model: impl Into<String>) -> Self {
        Self {
            backend,
            policy,
            model: model.into(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Request a completion for the given prompts with the configured model.
    pub async fn call(&self, system_prompt: &str, user_prompt: &str) -> Result<String, ModelError> {
        let request = CompletionRequest::new(self.model.as_str(), system_prompt, user_prompt);
        self.call_request(&request).await
    }

    /// Run the retry loop for a prepared request.
    pub async fn call_request(&self, request: &CompletionRequest) -> Result<String, ModelError> {
        let max_attempts = self.policy.max_attempts;
        let mut state = CallState::Idle;
        let mut attempt = 0;

        loop {
            attempt += 1;
            state.advance(CallState::Calling { attempt });

            let result = self.backend.complete(request).await;
            match self.policy.outcome(attempt, result) {
                CallOutcome::Success(text) => {
                    state.advance(CallState::Success { attempt });
                    return Ok(text);
                }
                CallOutcome::TransientFailure(error) => {
                    tracing::warn!(
                        "Error calling LLM API (attempt {}/{}): {}",
                        attempt,
                        max_attempts,
                        error
                    );
                    state.advance(CallState::WaitingToRetry { attempt });
                    if !self.policy.retry_delay.is_zero() {
                        tracing::info!(
                            "Retrying in {:.1} seconds...",
                            self.policy.retry_delay.as_secs_f64()
                        );
                        sleep(self.policy.retry_delay).await;
                    }
                }
                CallOutcome::TerminalFailure { error, attempts } => {
                    tracing::error!(
                        "Error calling LLM API (attempt {}/{}): {}",
                        attempts,
                        max_attempts,
                        error
                    );
                    state.advance(CallState::Failed { attempts });
                    return Err(ModelError::MaxRetriesExceeded {
                        attempts,
                        source: Box::new(error),
                    });
                }
            }
        }
    }
}
