//! Chat endpoint

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use std::time::Instant;

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::{ChatRequest, ChatResponse};

/// POST /chat - run one query through the support workflow
pub async fn chat(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>> {
    let Json(request) = payload.map_err(|e| Error::InvalidRequest(e.body_text()))?;
    request.validate()?;

    let workflow = state.workflow().ok_or(Error::NotInitialized)?;
    let start = Instant::now();

    tracing::info!("Chat query: \"{}\"", request.query);

    // The workflow contains its own failures; only a panic gets past it
    let query = request.query;
    let turn = tokio::spawn(async move { workflow.invoke(&query).await })
        .await
        .map_err(|e| {
            tracing::error!("Workflow task failed: {}", e);
            Error::internal(format!("Error processing query: {}", e))
        })?;

    tracing::info!(
        "Answered {} query in {}ms",
        turn.category,
        start.elapsed().as_millis()
    );

    Ok(Json(ChatResponse::from_turn(turn)))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        Router,
    };
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::config::RagConfig;
    use crate::server::{state::AppState, RagServer};
    use crate::test_support::{seeded_index, workflow_with, PanickingLlm, ScriptedLlm};
    use crate::workflow::FALLBACK_ANSWER;

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn post_chat(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/chat")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn ready_router(llm: Arc<ScriptedLlm>) -> Router {
        let workflow = workflow_with(seeded_index(3).await, llm);
        RagServer::build_router(AppState::with_workflow(RagConfig::default(), workflow))
    }

    #[tokio::test]
    async fn test_chat_answers_product_question() {
        let router = ready_router(ScriptedLlm::new(Ok("products"), Ok("It costs ₹15,999."))).await;
        let (status, body) = send(
            router,
            post_chat(r#"{"query": "What is the price of SmartWatch Pro X?"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["query"], "What is the price of SmartWatch Pro X?");
        assert_eq!(body["answer"], "It costs ₹15,999.");
        assert_eq!(body["category"], "products");
        assert_eq!(body["metadata"]["classifier"], "success");
        assert_eq!(body["metadata"]["rag"]["context_used"], true);
        assert_eq!(body["metadata"]["rag"]["sources"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_chat_degrades_on_generation_failure() {
        let router = ready_router(ScriptedLlm::new(Ok("returns"), Err("model offline"))).await;
        let (status, body) = send(router, post_chat(r#"{"query": "How do refunds work?"}"#)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["answer"], FALLBACK_ANSWER);
        assert!(body["metadata"]["rag"]["error"].is_string());
    }

    #[tokio::test]
    async fn test_chat_before_initialization_is_503() {
        let router = RagServer::build_router(AppState::new(RagConfig::default()));
        let (status, body) = send(router, post_chat(r#"{"query": "Hello"}"#)).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            body["error"]["message"],
            "Chatbot service is not initialized. Please try again later."
        );
    }

    #[tokio::test]
    async fn test_chat_rejects_blank_and_malformed_queries() {
        for payload in [r#"{"query": "   "}"#, r#"{"question": "Hi"}"#, "not json"] {
            let router = ready_router(ScriptedLlm::new(Ok("products"), Ok("unused"))).await;
            let (status, body) = send(router, post_chat(payload)).await;
            assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "payload {}", payload);
            assert_eq!(body["error"]["type"], "invalid_request");
        }
    }

    #[tokio::test]
    async fn test_chat_panic_is_500() {
        let workflow = workflow_with(seeded_index(3).await, Arc::new(PanickingLlm));
        let router = RagServer::build_router(AppState::with_workflow(RagConfig::default(), workflow));
        let (status, body) = send(router, post_chat(r#"{"query": "Hello"}"#)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .starts_with("Error processing query:"));
    }

    #[tokio::test]
    async fn test_health_reports_initialization() {
        let state = AppState::new(RagConfig::default());
        let router = RagServer::build_router(state.clone());
        let (status, body) = send(router.clone(), get("/health")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], "RAG Chatbot");
        assert_eq!(body["workflow_initialized"], false);

        let (status, _) = send(router.clone(), get("/ready")).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

        let llm = ScriptedLlm::new(Ok("general"), Ok("unused"));
        state.set_workflow(workflow_with(seeded_index(3).await, llm));

        let (_, body) = send(router.clone(), get("/health")).await;
        assert_eq!(body["workflow_initialized"], true);
        let (status, _) = send(router, get("/ready")).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_root_lists_endpoints() {
        let router = RagServer::build_router(AppState::new(RagConfig::default()));
        let (status, body) = send(router, get("/")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Welcome to RAG Chatbot API");
        assert_eq!(body["chat_endpoint"], "POST /chat");
        assert_eq!(body["health"], "/health");
        assert!(body.get("docs").is_none());
    }
}
