use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::error::ChatError;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": {
                "code": self.status.as_u16(),
                "message": self.message,
            }
        }));
        (self.status, body).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        tracing::error!(error = %err, "API error");
        Self::internal(err.to_string())
    }
}

/// Validation details are surfaced to the caller; provider and storage
/// failures are logged and replaced with a generic message.
impl From<ChatError> for ApiError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::Validation(message) => Self::bad_request(message),
            ChatError::Provider(source) => {
                tracing::error!(error = %source, "Completion provider failure");
                Self::new(StatusCode::BAD_GATEWAY, "Error processing your request")
            }
            ChatError::Storage(source) => {
                tracing::error!(error = %source, "Conversation storage failure");
                Self::internal("Error processing your request")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use confab_ai::AiError;

    #[test]
    fn test_validation_maps_to_bad_request_with_detail() {
        let api: ApiError = ChatError::Validation("Prompt must not be empty".to_string()).into();
        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        assert_eq!(api.message, "Prompt must not be empty");
    }

    #[test]
    fn test_provider_maps_to_bad_gateway_without_detail() {
        let api: ApiError =
            ChatError::Provider(AiError::Llm("secret upstream detail".to_string())).into();
        assert_eq!(api.status, StatusCode::BAD_GATEWAY);
        assert_eq!(api.message, "Error processing your request");
        assert!(!api.message.contains("secret"));
    }

    #[test]
    fn test_storage_maps_to_internal_error() {
        let api: ApiError = ChatError::Storage(anyhow::anyhow!("disk gone")).into();
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api.message, "Error processing your request");
    }
}
