use crate::http::HttpConfig;
use axum::http::HeaderValue;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

/// CORS layer for the configured origins.
///
/// An empty list or a `*` entry opens the API to any origin. Entries that
/// do not parse as header values are dropped.
pub fn build_cors_layer(config: &HttpConfig) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    match allowed_origins(&config.cors_origins) {
        Some(origins) => layer.allow_origin(AllowOrigin::list(origins)),
        None => layer.allow_origin(Any),
    }
}

/// `None` means "allow every origin".
fn allowed_origins(origins: &[String]) -> Option<Vec<HeaderValue>> {
    if origins.is_empty() || origins.iter().any(|origin| origin == "*") {
        return None;
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    if parsed.is_empty() { None } else { Some(parsed) }
}
