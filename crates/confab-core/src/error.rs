use confab_ai::AiError;
use thiserror::Error;

/// Errors produced while handling one chat exchange.
///
/// The HTTP layer maps each variant to a status code; only validation
/// details are shown to callers, provider and storage internals stay in
/// the logs.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Invalid prompt: {0}")]
    Validation(String),

    #[error("Completion provider error: {0}")]
    Provider(#[from] AiError),

    #[error("Conversation storage error: {0}")]
    Storage(#[from] anyhow::Error),
}
