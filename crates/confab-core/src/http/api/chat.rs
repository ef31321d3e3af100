use crate::AppCore;
use crate::http::ApiError;
use axum::{Json, Router, extract::Extension, routing::post};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub fn router() -> Router {
    Router::new().route("/", post(submit_prompt))
}

#[derive(Debug, Deserialize)]
struct ChatRequest {
    /// Missing field is treated like an empty prompt and rejected.
    #[serde(default)]
    prompt: String,
}

#[derive(Debug, Serialize)]
struct ChatResponse {
    message: String,
}

async fn submit_prompt(
    Extension(core): Extension<Arc<AppCore>>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let message = core.chat.ask(&req.prompt).await?;
    Ok(Json(ChatResponse { message }))
}
