//! Provider abstractions for embeddings, LLM and vector storage
//!
//! The workflow and index only talk to these traits, so the Ollama and
//! SQLite backends can be swapped for other services or for test stubs.

pub mod embedding;
pub mod llm;
pub mod local;
pub mod ollama;
pub mod vector_store;

pub use embedding::EmbeddingProvider;
pub use llm::{GenerationParams, LlmProvider};
pub use vector_store::{VectorSearchResult, VectorStoreProvider};
