//! Routes for the chatbot server

pub mod chat;

use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::server::state::AppState;
use crate::types::HealthResponse;

/// GET / - service welcome document
pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "Welcome to RAG Chatbot API",
        "version": env!("CARGO_PKG_VERSION"),
        "health": "/health",
        "chat_endpoint": "POST /chat",
    }))
}

/// GET /health - liveness plus workflow status
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::new(state.is_initialized()))
}

/// GET /ready - 200 once the workflow can take requests
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    if state.is_initialized() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}
