//! HTTP delivery surface for the weather assistant.
//!
//! Exposes `GET /`, `GET /health` and `POST /chat` over axum. The server keeps
//! running when the assistant failed to initialize; `/chat` then always
//! answers 500 and `/health` reports `assistant_ready: false`.

mod handlers;
mod types;

use std::sync::Arc;

use anyhow::Context;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use weather_assistant_core::Assistant;

pub use handlers::SERVICE_NAME;
pub use types::{ChatRequest, ChatResponse, ErrorBody, HealthResponse};

/// State shared between request handlers.
#[derive(Clone)]
struct ServerState {
    assistant: Option<Arc<Assistant>>,
}

pub struct Server {
    assistant: Option<Arc<Assistant>>,
}

impl Server {
    pub fn new(assistant: Option<Assistant>) -> Self {
        Self {
            assistant: assistant.map(Arc::new),
        }
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/", get(handlers::root))
            .route("/health", get(handlers::health))
            .route("/chat", post(handlers::chat))
            .layer(CorsLayer::permissive())
            .with_state(ServerState {
                assistant: self.assistant.clone(),
            })
    }

    /// Bind to `addr` (e.g. "127.0.0.1:8000") and serve until the process exits.
    pub async fn run(self, addr: &str) -> anyhow::Result<()> {
        let app = self.router();

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {addr}"))?;

        tracing::info!(%addr, ready = self.assistant.is_some(), "Starting Weather Assistant API");
        axum::serve(listener, app).await.context("HTTP server failed")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use std::sync::Mutex;
    use tower::ServiceExt;
    use weather_assistant_core::{
        GenerationOptions, LanguageModel, ModelError, ProviderError, WeatherProvider,
    };

    #[derive(Debug)]
    struct FakeProvider(Result<Value, ProviderError>);

    #[async_trait]
    impl WeatherProvider for FakeProvider {
        async fn fetch(&self, _city: &str) -> Result<Value, ProviderError> {
            self.0.clone()
        }
    }

    #[derive(Debug)]
    struct ScriptedModel(Mutex<Vec<Result<String, ModelError>>>);

    #[async_trait]
    impl LanguageModel for ScriptedModel {
        async fn generate(
            &self,
            _prompt: &str,
            _options: &GenerationOptions,
        ) -> Result<String, ModelError> {
            let mut replies = self.0.lock().unwrap();
            if replies.is_empty() {
                Err(ModelError::EmptyOutput)
            } else {
                replies.remove(0)
            }
        }
    }

    fn server(
        provider: Result<Value, ProviderError>,
        replies: Vec<Result<String, ModelError>>,
    ) -> Server {
        let assistant = Assistant::new(
            Arc::new(FakeProvider(provider)),
            Arc::new(ScriptedModel(Mutex::new(replies))),
            "system",
        );
        Server::new(Some(assistant))
    }

    fn paris() -> Value {
        json!({
            "name": "Paris",
            "sys": { "country": "FR" },
            "main": { "temp": 22.0, "feels_like": 21.4, "humidity": 40 },
            "weather": [{ "main": "Clear", "description": "clear sky" }],
            "wind": { "speed": 2.5 }
        })
    }

    async fn send(server: &Server, request: Request<Body>) -> (StatusCode, Value) {
        let response = server.router().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn post_chat(message: &str) -> Request<Body> {
        Request::post("/chat")
            .header("content-type", "application/json")
            .body(Body::from(json!({ "message": message }).to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn health_reports_readiness() {
        let (status, body) = send(
            &Server::new(None),
            Request::get("/health").body(Body::empty()).unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "status": "ok", "service": SERVICE_NAME, "assistant_ready": false })
        );
    }

    #[tokio::test]
    async fn root_lists_chat_endpoint() {
        let (status, body) = send(
            &Server::new(None),
            Request::get("/").body(Body::empty()).unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["endpoints"]["chat"].as_str().unwrap().starts_with("POST /chat"));
    }

    #[tokio::test]
    async fn chat_without_assistant_is_500() {
        let (status, body) = send(&Server::new(None), post_chat("London")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["detail"], "Weather Assistant service is not available");
    }

    #[tokio::test]
    async fn empty_message_is_400() {
        let (status, body) = send(&server(Ok(paris()), vec![]), post_chat("  ")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "Message cannot be empty");
    }

    #[tokio::test]
    async fn weather_message_returns_fields_and_insights() {
        let server = server(
            Ok(paris()),
            vec![
                Ok("WEATHER: Paris".into()),
                Ok("Wear sunglasses. Warm and dry. Perfect for a walk.".into()),
            ],
        );
        let (status, body) = send(&server, post_chat(" Paris ")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user_message"], "Paris");
        assert_eq!(body["bot_type"], "weather");
        assert_eq!(body["city"], "Paris");
        assert_eq!(body["humidity"], 40);
        assert_eq!(body["recommendation"], "Wear sunglasses.");
        assert_eq!(body["insights"], "Warm and dry. Perfect for a walk.");
        assert!(body.get("error").is_none());
    }

    #[tokio::test]
    async fn provider_error_is_reported_in_body() {
        let server = server(
            Err(ProviderError::NotFound("Atlantis".into())),
            vec![Ok("WEATHER: Atlantis".into())],
        );
        let (status, body) = send(&server, post_chat("Atlantis")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["bot_type"], "weather");
        assert!(body["error"].as_str().unwrap().contains("not found"));
        assert_eq!(body["city"], "Atlantis");
        assert!(body.get("insights").is_none());
    }

    #[tokio::test]
    async fn rate_limited_fetch_echoes_city() {
        let server = server(Err(ProviderError::RateLimited), vec![Ok("WEATHER: Oslo".into())]);
        let (status, body) = send(&server, post_chat("Oslo")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["city"], "Oslo");
        assert!(body["error"].as_str().unwrap().contains("rate limit"));
    }

    #[tokio::test]
    async fn chat_message_returns_reply() {
        let server = server(Ok(paris()), vec![Ok("CHAT: Hello there!".into())]);
        let (status, body) = send(&server, post_chat("hi, how are you doing?")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["bot_type"], "chat");
        assert_eq!(body["reply"], "Hello there!");
    }

    #[tokio::test]
    async fn classifier_failure_is_500() {
        let server = server(Ok(paris()), vec![Err(ModelError::Request("offline".into()))]);
        let (status, body) = send(&server, post_chat("London")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["detail"].as_str().unwrap().starts_with("Error processing message:"));
    }
}
