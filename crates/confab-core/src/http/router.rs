use crate::AppCore;
use axum::{Extension, Router, routing::get};
use std::sync::Arc;

use super::{HttpConfig, api, middleware};

pub fn build_router(core: Arc<AppCore>, config: &HttpConfig) -> Router {
    let cors = middleware::cors::build_cors_layer(config);

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api::router())
        .layer(cors)
        .layer(Extension(core))
}

async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServiceConfig;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use confab_ai::{MockLlmClient, MockStep};
    use tempfile::tempdir;
    use tower::ServiceExt;

    fn test_core(mock: MockLlmClient, temp_dir: &tempfile::TempDir) -> Arc<AppCore> {
        let vocabulary_path = temp_dir.path().join("vocabulary.json");
        std::fs::write(&vocabulary_path, r#"["damn"]"#).unwrap();

        let config = ServiceConfig {
            database_path: temp_dir
                .path()
                .join("test.db")
                .to_string_lossy()
                .into_owned(),
            vocabulary_path: Some(vocabulary_path),
            persona: Some("You are a test persona.".to_string()),
            ..Default::default()
        };
        Arc::new(AppCore::with_client(&config, Arc::new(mock)).unwrap())
    }

    async fn post_chat(app: Router, body: &str) -> axum::response::Response {
        app.oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/chat")
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let temp_dir = tempdir().unwrap();
        let core = test_core(MockLlmClient::new("mock"), &temp_dir);
        let app = build_router(core, &HttpConfig::default());

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_chat_returns_filtered_message_and_records_it() {
        let temp_dir = tempdir().unwrap();
        let mock = MockLlmClient::from_steps("mock", vec![MockStep::text("Well damn, hello")]);
        let core = test_core(mock, &temp_dir);

        let app = build_router(core.clone(), &HttpConfig::default());
        let response = post_chat(app, r#"{"prompt": "Say hi"}"#).await;
        assert_eq!(response.status(), StatusCode::OK);
        let value = body_json(response).await;
        assert_eq!(value["message"], "Well d***, hello");

        let app = build_router(core, &HttpConfig::default());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/conversation")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let records = body_json(response).await;
        let records = records.as_array().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["question"], "Say hi");
        assert_eq!(records[0]["answer"], "Well d***, hello");
        assert!(records[0]["createdAt"].is_i64());
    }

    #[tokio::test]
    async fn test_chat_lists_newest_first() {
        let temp_dir = tempdir().unwrap();
        let mock = MockLlmClient::from_steps(
            "mock",
            vec![MockStep::text("first answer"), MockStep::text("second answer")],
        );
        let core = test_core(mock, &temp_dir);

        for prompt in [r#"{"prompt": "one"}"#, r#"{"prompt": "two"}"#] {
            let app = build_router(core.clone(), &HttpConfig::default());
            let response = post_chat(app, prompt).await;
            assert_eq!(response.status(), StatusCode::OK);
        }

        let app = build_router(core, &HttpConfig::default());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/conversation")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let records = body_json(response).await;
        assert_eq!(records[0]["question"], "two");
        assert_eq!(records[1]["question"], "one");
    }

    #[tokio::test]
    async fn test_chat_rejects_blank_prompt() {
        let temp_dir = tempdir().unwrap();
        let mock = MockLlmClient::new("mock");
        let core = test_core(mock.clone(), &temp_dir);

        for body in [r#"{"prompt": "   "}"#, r#"{}"#] {
            let app = build_router(core.clone(), &HttpConfig::default());
            let response = post_chat(app, body).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            let value = body_json(response).await;
            assert_eq!(value["error"]["code"], 400);
        }

        assert_eq!(mock.call_count().await, 0);
        assert_eq!(core.storage.conversations.count().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_chat_maps_provider_failure_to_bad_gateway() {
        let temp_dir = tempdir().unwrap();
        let mock = MockLlmClient::from_steps("mock", vec![MockStep::error("upstream exploded")]);
        let core = test_core(mock, &temp_dir);

        let app = build_router(core.clone(), &HttpConfig::default());
        let response = post_chat(app, r#"{"prompt": "hi"}"#).await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let value = body_json(response).await;
        assert_eq!(value["error"]["message"], "Error processing your request");

        assert_eq!(core.storage.conversations.count().unwrap(), 0);
    }
}
