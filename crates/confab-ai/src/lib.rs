//! Confab AI - LLM provider abstraction
//!
//! Wraps the external completion provider behind the [`LlmClient`] trait so
//! the service layer never touches HTTP details. Ships an OpenAI-compatible
//! client with retry/backoff and a scripted mock for tests.

pub mod error;
pub mod llm;

mod http_client;

pub use error::{AiError, Result};
pub use llm::{
    CompletionRequest, CompletionResponse, FinishReason, LlmClient, LlmRetryConfig, Message,
    MockLlmClient, MockStep, OpenAIClient, Role, TokenUsage,
};
