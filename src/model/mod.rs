//! Model client module for LLM text completion.

mod backend;
mod client;
mod retry;

pub use backend::{CompletionBackend, CompletionRequest};
pub use client::{MessageBuilder, ModelClient, ModelConfig, ModelError, DEFAULT_BASE_URL};
pub use retry::{
    CallOutcome, CallState, RetryPolicy, RetryingCaller, DEFAULT_MAX_ATTEMPTS,
    DEFAULT_RETRY_DELAY_SECS,
};
