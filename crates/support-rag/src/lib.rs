//! support-rag: customer-support chatbot with retrieval-grounded answers
//!
//! Each query is classified into a category, then either answered from a
//! vector index over the product knowledge document or escalated to human
//! support with a canned message. Models are served by a local Ollama
//! instance; the index is persisted in SQLite.

pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod storage;
pub mod types;
pub mod workflow;

#[cfg(test)]
mod test_support;

pub use config::RagConfig;
pub use error::{Error, Result};
pub use types::{ChatRequest, ChatResponse, Chunk, ChunkMetadata};
pub use workflow::{Category, SupportWorkflow, TurnResult};
