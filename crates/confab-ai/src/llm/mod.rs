//! LLM client implementations

pub mod client;
pub mod mock_client;
pub mod openai;
pub mod retry;

pub use client::{
    CompletionRequest, CompletionResponse, FinishReason, LlmClient, Message, Role, TokenUsage,
};
pub use mock_client::{MockLlmClient, MockStep};
pub use openai::OpenAIClient;
pub use retry::LlmRetryConfig;
