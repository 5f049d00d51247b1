//! Knowledge chunk types with source tracking

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Source information attached to every chunk and surfaced as a RAG source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Knowledge document the chunk was cut from
    pub source: String,
    /// 0-based position of the chunk within its document
    pub chunk_id: u32,
}

/// A fragment of the knowledge document, the unit of retrieval
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Stable identity for the lifetime of the index
    pub id: Uuid,
    /// Chunk text
    pub content: String,
    /// Source and sequence metadata
    pub metadata: ChunkMetadata,
    /// Embedding vector (empty until embedded)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub embedding: Vec<f32>,
}

impl Chunk {
    /// Create a new chunk without an embedding
    pub fn new(content: String, source: impl Into<String>, chunk_id: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            content,
            metadata: ChunkMetadata {
                source: source.into(),
                chunk_id,
            },
            embedding: Vec::new(),
        }
    }

    /// Attach an embedding
    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = embedding;
        self
    }

    /// Whether the chunk has been embedded
    pub fn is_embedded(&self) -> bool {
        !self.embedding.is_empty()
    }
}
