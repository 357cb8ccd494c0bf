//! Assistant API route
//!
//! `POST /api/ai` with `{ "message": ..., "context"?: ... }`.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::assistant::{AssistantClient, APOLOGY};

#[derive(Clone)]
pub struct AssistantState {
    pub client: Arc<AssistantClient>,
}

#[derive(Deserialize)]
pub struct ChatRequest {
    pub message: Option<String>,
    pub context: Option<String>,
}

#[derive(Serialize)]
pub struct ChatResponse {
    pub response: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}

pub async fn chat(
    State(state): State<AssistantState>,
    body: Option<Json<ChatRequest>>,
) -> Response {
    let Some(Json(req)) = body else {
        return error(StatusCode::BAD_REQUEST, "Message is required");
    };
    let message = match req.message {
        Some(m) if !m.is_empty() => m,
        _ => return error(StatusCode::BAD_REQUEST, "Message is required"),
    };

    match state.client.reply(&message, req.context.as_deref()).await {
        Ok(response) => Json(ChatResponse { response }).into_response(),
        Err(e) => {
            tracing::error!("AI API error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ChatResponse {
                    response: APOLOGY.to_string(),
                }),
            )
                .into_response()
        }
    }
}

async fn preflight() -> StatusCode {
    StatusCode::OK
}

async fn method_not_allowed() -> Response {
    error(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}

pub fn assistant_routes(state: AssistantState) -> Router {
    Router::new()
        .route(
            "/ai",
            post(chat).options(preflight).fallback(method_not_allowed),
        )
        .with_state(state)
}
