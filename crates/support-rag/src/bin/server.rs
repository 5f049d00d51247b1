//! Chatbot server binary
//!
//! Run with: cargo run -p support-rag --bin support-rag-server

use clap::Parser;
use std::path::PathBuf;
use support_rag::{
    config::RagConfig,
    server::{RagServer, ServerOptions},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// TechGear customer-support chatbot
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the bind host
    #[arg(long)]
    host: Option<String>,

    /// Override the bind port
    #[arg(short, long)]
    port: Option<u16>,

    /// Re-chunk and re-embed the knowledge document even if an index exists
    #[arg(long)]
    rebuild_index: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "support_rag=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!(
        r#"
╔═══════════════════════════════════════════════════════════╗
║                  TechGear Support Chatbot                 ║
║          Classify, answer from docs, or escalate          ║
╚═══════════════════════════════════════════════════════════╝
"#
    );

    // Load configuration
    let mut config = RagConfig::load(args.config.as_deref())?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    tracing::info!("Configuration loaded");
    tracing::info!("  - Knowledge base: {}", config.knowledge.path.display());
    tracing::info!("  - Embedding model: {}", config.llm.embed_model);
    tracing::info!("  - LLM model: {}", config.llm.generate_model);
    tracing::info!(
        "  - Chunking: {} chars, {} overlap",
        config.chunking.chunk_size,
        config.chunking.chunk_overlap
    );
    tracing::info!("  - Top-k: {}", config.retrieval.top_k);

    let server = RagServer::new(
        config,
        ServerOptions {
            rebuild_index: args.rebuild_index,
        },
    );

    println!("\nServer starting...");
    println!("  API: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("\nEndpoints:");
    println!("  POST /chat   - Ask a support question");
    println!("  GET  /health - Liveness and workflow status");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
