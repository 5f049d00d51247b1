//! HTTP server for the support chatbot

pub mod bootstrap;
pub mod routes;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::RagConfig;
use crate::error::{Error, Result};
use state::AppState;

/// Startup behaviour that does not belong in the config file
#[derive(Debug, Clone, Copy, Default)]
pub struct ServerOptions {
    /// Re-chunk and re-embed the knowledge document even if an index exists
    pub rebuild_index: bool,
}

/// Chatbot HTTP server
pub struct RagServer {
    config: RagConfig,
    options: ServerOptions,
    state: AppState,
}

impl RagServer {
    /// Create a server; the workflow is built after the listener is bound
    pub fn new(config: RagConfig, options: ServerOptions) -> Self {
        let state = AppState::new(config.clone());
        Self {
            config,
            options,
            state,
        }
    }

    /// Build the router with all routes
    pub fn build_router(state: AppState) -> Router {
        let enable_cors = state.config().server.enable_cors;

        let router = Router::new()
            .route("/", get(routes::root))
            .route("/health", get(routes::health))
            .route("/ready", get(routes::readiness))
            .route("/chat", post(routes::chat::chat))
            .with_state(state)
            .layer(TraceLayer::new_for_http())
            .layer(CompressionLayer::new());

        if enable_cors {
            router.layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            )
        } else {
            router
        }
    }

    /// Bind, then serve while the workflow initializes
    ///
    /// Returns the initialization error if startup fails.
    pub async fn start(self) -> Result<()> {
        let addr: SocketAddr = self
            .address()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid address: {}", e)))?;

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| Error::Config(format!("Failed to bind: {}", e)))?;

        tracing::info!("Starting chatbot server on http://{}", addr);

        let state = self.state.clone();
        let rebuild = self.options.rebuild_index;
        let initialize = async {
            let workflow = bootstrap::build_workflow(&self.config, rebuild)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to initialize workflow: {}", e);
                    e
                })?;
            state.set_workflow(workflow);
            tracing::info!("Workflow initialized; accepting chat requests");
            Ok::<_, Error>(())
        };

        let router = Self::build_router(self.state.clone());
        let serve = async {
            axum::serve(listener, router)
                .await
                .map_err(|e| Error::Internal(format!("Server error: {}", e)))
        };

        // A failed startup stops the listener and surfaces the error to the caller
        tokio::try_join!(serve, initialize)?;

        Ok(())
    }

    /// Get the server address
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.server.host, self.config.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_start_returns_when_initialization_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = RagConfig::default();
        config.server.host = "127.0.0.1".to_string();
        config.server.port = 0;
        config.llm.base_url = "http://127.0.0.1:1".to_string();
        config.knowledge.path = dir.path().join("missing.txt");
        config.vector_db.index_dir = dir.path().join("index");

        let server = RagServer::new(config, ServerOptions::default());
        let result = tokio::time::timeout(std::time::Duration::from_secs(30), server.start())
            .await
            .expect("server kept running after a failed startup");

        assert!(matches!(result, Err(Error::DocumentNotFound(_))));
    }
}
