//! Response types for the HTTP boundary

use serde::{Deserialize, Serialize};

use crate::workflow::TurnResult;

/// Response body for `POST /chat`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Original user query
    pub query: String,
    /// Chatbot's answer
    pub answer: String,
    /// Classified category
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Diagnostic metadata written by the workflow stages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl ChatResponse {
    /// Translate a finished turn into the response envelope
    pub fn from_turn(turn: TurnResult) -> Self {
        let metadata = match serde_json::to_value(&turn.metadata) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Failed to serialize turn metadata: {}", e);
                None
            }
        };

        Self {
            query: turn.query,
            answer: turn.answer,
            category: Some(turn.category.to_string()),
            metadata,
        }
    }
}

/// Response body for `GET /health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always "healthy" while the process is serving
    pub status: String,
    /// Service name
    pub service: String,
    /// Whether the workflow finished initializing
    pub workflow_initialized: bool,
}

impl HealthResponse {
    /// Build the liveness report
    pub fn new(workflow_initialized: bool) -> Self {
        Self {
            status: "healthy".to_string(),
            service: "RAG Chatbot".to_string(),
            workflow_initialized,
        }
    }
}
