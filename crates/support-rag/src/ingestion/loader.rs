//! Knowledge document loading

use sha2::{Digest, Sha256};
use std::path::Path;

use crate::config::ChunkingConfig;
use crate::error::{Error, Result};
use crate::types::Chunk;

use super::chunker::TextChunker;

/// Loads the knowledge document and splits it into chunks
#[derive(Debug, Clone)]
pub struct DocumentLoader {
    chunker: TextChunker,
}

impl DocumentLoader {
    /// Create a loader from chunking configuration
    pub fn new(config: &ChunkingConfig) -> Self {
        Self {
            chunker: TextChunker::new(config.chunk_size, config.chunk_overlap),
        }
    }

    /// Read the document as UTF-8 text
    pub fn load_document(&self, path: &Path) -> Result<String> {
        if !path.exists() {
            return Err(Error::DocumentNotFound(path.display().to_string()));
        }
        Ok(std::fs::read_to_string(path)?)
    }

    /// Split content into chunks tagged with `source`
    pub fn split_documents(&self, content: &str, source: &str) -> Vec<Chunk> {
        self.chunker.chunk_document(content, source)
    }

    /// Load and split in one step; the path doubles as the chunk source
    pub fn load_and_split(&self, path: &Path) -> Result<Vec<Chunk>> {
        let content = self.load_document(path)?;
        let chunks = self.split_documents(&content, &path.display().to_string());
        tracing::info!("Loaded and split {} into {} chunks", path.display(), chunks.len());
        Ok(chunks)
    }
}

/// SHA-256 of the document text, hex encoded
pub fn content_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}
