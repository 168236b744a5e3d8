use axum::{Json, extract::State, http::StatusCode};
use serde_json::{Value, json};
use tracing::{error, info};

use super::ServerState;
use crate::types::{ChatRequest, ChatResponse, ErrorBody, HealthResponse};

pub const SERVICE_NAME: &str = "Weather Assistant API";

type ApiError = (StatusCode, Json<ErrorBody>);

fn api_error(status: StatusCode, detail: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorBody {
            detail: detail.into(),
        }),
    )
}

pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "Welcome to the Weather Assistant API!",
        "docs_url": "/docs",
        "endpoints": {
            "chat": "POST /chat - Send a message to the weather assistant"
        }
    }))
}

pub async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: SERVICE_NAME.to_string(),
        assistant_ready: state.assistant.is_some(),
    })
}

/// Runs one assistant turn for the posted message.
///
/// Returns 500 while the assistant is unavailable, 400 for an empty message,
/// and 500 for any failure that escapes the assistant.
pub async fn chat(
    State(state): State<ServerState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let assistant = state.assistant.as_ref().ok_or_else(|| {
        api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Weather Assistant service is not available",
        )
    })?;

    let message = req.message.trim();
    if message.is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "Message cannot be empty"));
    }

    info!(message, "Received chat message");

    let result = assistant.handle(message).await.map_err(|e| {
        error!(error = %e, "Error processing chat message");
        api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Error processing message: {e}"),
        )
    })?;

    Ok(Json(ChatResponse::from_result(message, result)))
}
