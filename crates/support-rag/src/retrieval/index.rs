//! Knowledge index: embeds chunks on the way in and queries on the way out

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::providers::{EmbeddingProvider, VectorSearchResult, VectorStoreProvider};
use crate::types::Chunk;

/// Embedding-backed index over the knowledge document
pub struct KnowledgeIndex {
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStoreProvider>,
    /// Default number of chunks returned by `retrieve`
    top_k: usize,
}

impl KnowledgeIndex {
    /// Create an index over an embedder and a vector store
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStoreProvider>,
        top_k: usize,
    ) -> Self {
        Self {
            embedder,
            store,
            top_k,
        }
    }

    /// Embed chunks without storing them
    pub async fn embed_chunks(&self, chunks: Vec<Chunk>) -> Result<Vec<Chunk>> {
        if chunks.is_empty() {
            return Err(Error::vector_db("No chunks to index"));
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await?;

        if embeddings.len() != chunks.len() {
            return Err(Error::embedding(format!(
                "Expected {} embeddings, got {}",
                chunks.len(),
                embeddings.len()
            )));
        }

        tracing::info!("Embedded {} chunks with {}", chunks.len(), self.embedder.model());

        Ok(chunks
            .into_iter()
            .zip(embeddings)
            .map(|(chunk, embedding)| chunk.with_embedding(embedding))
            .collect())
    }

    /// Embed and store chunks, returning how many were indexed
    pub async fn index_documents(&self, chunks: Vec<Chunk>) -> Result<usize> {
        let embedded = self.embed_chunks(chunks).await?;
        self.store.insert_chunks(&embedded).await?;
        tracing::info!("Indexed {} chunks into {}", embedded.len(), self.store.name());
        Ok(embedded.len())
    }

    /// Attach to an existing persisted index
    ///
    /// Fails when the store holds nothing, so callers can fall back to a rebuild.
    pub async fn load(&self) -> Result<usize> {
        let count = self.store.len().await?;
        if count == 0 {
            return Err(Error::vector_db("Persisted index is empty"));
        }
        tracing::info!("Loaded existing index with {} chunks", count);
        Ok(count)
    }

    /// Up to `k` most similar chunks, best first
    pub async fn similarity_search(&self, query: &str, k: usize) -> Result<Vec<VectorSearchResult>> {
        if k == 0 {
            return Ok(Vec::new());
        }
        let embedding = self.embedder.embed(query).await?;
        self.store.search(&embedding, k).await
    }

    /// Similarity search at the configured depth
    pub async fn retrieve(&self, query: &str) -> Result<Vec<VectorSearchResult>> {
        self.similarity_search(query, self.top_k).await
    }
}
