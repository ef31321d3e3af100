//! Error types for the provider module

use thiserror::Error;

/// Provider error types
#[derive(Error, Debug)]
pub enum AiError {
    #[error("LLM error: {0}")]
    Llm(String),

    #[error("{provider} HTTP {status}: {message}")]
    LlmHttp {
        provider: String,
        status: u16,
        message: String,
        retry_after_secs: Option<u64>,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl AiError {
    /// Whether retrying the request could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            AiError::LlmHttp { status, .. } => {
                matches!(status, 408 | 429 | 500 | 502 | 503 | 504)
            }
            AiError::Http(err) => err.is_timeout() || err.is_connect(),
            AiError::Llm(message) => {
                let lowered = message.to_lowercase();
                lowered.contains("rate limit")
                    || lowered.contains("overloaded")
                    || lowered.contains("timeout")
            }
        }
    }

    /// Server-requested retry delay, when the provider sent one.
    pub fn retry_after(&self) -> Option<u64> {
        match self {
            AiError::LlmHttp {
                retry_after_secs, ..
            } => *retry_after_secs,
            _ => None,
        }
    }
}

/// Result type alias for provider operations
pub type Result<T> = std::result::Result<T, AiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_depends_on_status() {
        let retryable = AiError::LlmHttp {
            provider: "Test".to_string(),
            status: 429,
            message: "rate limit".to_string(),
            retry_after_secs: None,
        };
        let non_retryable = AiError::LlmHttp {
            provider: "Test".to_string(),
            status: 401,
            message: "unauthorized".to_string(),
            retry_after_secs: None,
        };
        assert!(retryable.is_retryable());
        assert!(!non_retryable.is_retryable());
    }

    #[test]
    fn test_retryable_llm_string_fallback() {
        let retryable = AiError::Llm("rate limit".to_string());
        let non_retryable = AiError::Llm("bad request".to_string());
        assert!(retryable.is_retryable());
        assert!(!non_retryable.is_retryable());
    }

    #[test]
    fn test_retry_after_only_set_for_http_errors() {
        let error = AiError::LlmHttp {
            provider: "Test".to_string(),
            status: 429,
            message: "slow down".to_string(),
            retry_after_secs: Some(7),
        };
        assert_eq!(error.retry_after(), Some(7));
        assert_eq!(AiError::Llm("oops".to_string()).retry_after(), None);
    }
}
