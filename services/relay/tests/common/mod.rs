#![allow(dead_code)]

use anyhow::Result;
use async_trait::async_trait;
use axum::Router;
use relay_api::{config::Config, router::create_router, state::AppState};
use relay_core::{BroadcastGuard, ReplyGenerator};
use std::{net::SocketAddr, sync::Arc};
use tracing::Level;

pub fn test_config() -> Config {
    Config {
        bind_address: "127.0.0.1:0".parse().unwrap(),
        gemini_api_base: "http://127.0.0.1:9".to_string(),
        gemini_api_key_var: "RELAY_TEST_KEY_NEVER_SET".to_string(),
        ai_replies: true,
        broadcast_guard: BroadcastGuard::Strict,
        log_level: Level::INFO,
    }
}

pub fn test_state(replies: Option<Arc<dyn ReplyGenerator>>) -> Arc<AppState> {
    Arc::new(AppState::new(&test_config(), replies))
}

pub fn test_app(state: Arc<AppState>) -> Router {
    create_router(state)
}

/// Serves the app on an ephemeral port and returns its address.
pub async fn spawn_server(state: Arc<AppState>) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = create_router(state);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Always answers with the same text.
pub struct CannedReply(pub &'static str);

#[async_trait]
impl ReplyGenerator for CannedReply {
    async fn generate(&self, _user_text: &str) -> Result<String> {
        Ok(self.0.to_string())
    }
}

/// Fails the way the provider does on an HTTP 500.
pub struct FailingReply;

#[async_trait]
impl ReplyGenerator for FailingReply {
    async fn generate(&self, _user_text: &str) -> Result<String> {
        Err(gemini_client::GeminiError::Generation {
            status: 500,
            status_text: "Internal Server Error".to_string(),
        }
        .into())
    }
}

/// A stand-in Gemini provider: listing always offers one model, generation
/// answers with `generate_status`.
pub struct FakeProvider {
    pub base_url: String,
    pub generate_calls: Arc<std::sync::atomic::AtomicUsize>,
}

pub async fn spawn_fake_provider(generate_status: axum::http::StatusCode) -> FakeProvider {
    use axum::{
        Json,
        routing::{get, post},
    };
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    let generate_calls = Arc::new(AtomicUsize::new(0));
    let counter = generate_calls.clone();
    let app = Router::new()
        .route(
            "/{version}/models",
            get(|| async {
                Json(json!({
                    "models": [{ "name": "models/gemini-test", "supportedGenerationMethods": ["generateContent"] }]
                }))
            }),
        )
        .route(
            "/{version}/models/{action}",
            post(move || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    (
                        generate_status,
                        Json(json!({
                            "candidates": [{ "content": { "parts": [{ "text": "Hello from the provider" }] } }]
                        })),
                    )
                }
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    FakeProvider {
        base_url: format!("http://{}", addr),
        generate_calls,
    }
}

/// App state whose replies come from a real `GeminiClient` aimed at `provider`.
pub fn provider_state(provider: &FakeProvider) -> Arc<AppState> {
    let client = gemini_client::GeminiClient::new(gemini_client::GeminiConfig {
        base_url: provider.base_url.clone(),
        api_key: gemini_client::ApiKey::Static("test-key".to_string()),
    });
    Arc::new(AppState::new(&test_config(), Some(Arc::new(client))))
}
