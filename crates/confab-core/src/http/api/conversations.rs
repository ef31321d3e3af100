use crate::AppCore;
use crate::http::ApiError;
use crate::storage::Conversation;
use axum::{Json, Router, extract::Extension, routing::get};
use std::sync::Arc;

pub fn router() -> Router {
    Router::new().route("/", get(list_conversations))
}

async fn list_conversations(
    Extension(core): Extension<Arc<AppCore>>,
) -> Result<Json<Vec<Conversation>>, ApiError> {
    let conversations = core.storage.conversations.list_recent()?;
    Ok(Json(conversations))
}
