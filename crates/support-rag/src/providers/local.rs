//! Local vector store backed by the SQLite chunk database

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::VectorDbConfig;
use crate::error::{Error, Result};
use crate::storage::ChunkDb;
use crate::types::Chunk;

use super::vector_store::{VectorSearchResult, VectorStoreProvider};

/// One collection of a `ChunkDb`, exposed as a vector store
pub struct LocalVectorStore {
    db: Arc<ChunkDb>,
    collection: String,
}

impl LocalVectorStore {
    /// Wrap an open database
    pub fn new(db: Arc<ChunkDb>, collection: impl Into<String>) -> Self {
        Self {
            db,
            collection: collection.into(),
        }
    }

    /// Open the database under the configured index directory
    pub fn from_config(config: &VectorDbConfig) -> Result<Self> {
        let db = Arc::new(ChunkDb::new(config.database_path())?);
        Ok(Self::new(db, config.collection_name.clone()))
    }

    /// Get underlying database for direct access
    pub fn inner(&self) -> &Arc<ChunkDb> {
        &self.db
    }

    /// Collection this store reads and writes
    pub fn collection(&self) -> &str {
        &self.collection
    }
}

#[async_trait]
impl VectorStoreProvider for LocalVectorStore {
    async fn insert_chunks(&self, chunks: &[Chunk]) -> Result<()> {
        let db = self.db.clone();
        let collection = self.collection.clone();
        let chunks = chunks.to_vec();
        tokio::task::spawn_blocking(move || db.insert_chunks(&collection, &chunks).map(|_| ()))
            .await
            .map_err(|e| Error::Internal(format!("Task join error: {}", e)))?
    }

    async fn search(&self, query_embedding: &[f32], top_k: usize) -> Result<Vec<VectorSearchResult>> {
        let db = self.db.clone();
        let collection = self.collection.clone();
        let query = query_embedding.to_vec();

        tokio::task::spawn_blocking(move || {
            let results = db.search(&collection, &query, top_k)?;
            Ok(results
                .into_iter()
                .map(|(chunk, similarity)| VectorSearchResult { chunk, similarity })
                .collect())
        })
        .await
        .map_err(|e| Error::Internal(format!("Task join error: {}", e)))?
    }

    async fn len(&self) -> Result<usize> {
        let db = self.db.clone();
        let collection = self.collection.clone();
        tokio::task::spawn_blocking(move || db.count(&collection))
            .await
            .map_err(|e| Error::Internal(format!("Task join error: {}", e)))?
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(self.len().await.is_ok())
    }

    fn name(&self) -> &str {
        "local-sqlite"
    }
}
