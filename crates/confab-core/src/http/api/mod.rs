pub mod chat;
pub mod conversations;

use axum::Router;

/// Build the main API router with all resource routes
pub fn router() -> Router {
    Router::new()
        .nest("/chat", chat::router())
        .nest("/conversation", conversations::router())
}
