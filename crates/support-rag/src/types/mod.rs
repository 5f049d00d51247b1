//! Core types for the support chatbot

pub mod document;
pub mod query;
pub mod response;

pub use document::{Chunk, ChunkMetadata};
pub use query::ChatRequest;
pub use response::{ChatResponse, HealthResponse};
