//! SQLite database for embedded knowledge chunks
//!
//! Chunks are stored per collection with their embedding as a little-endian
//! `f32` blob. Similarity search is an exact cosine scan over the collection,
//! which is plenty for a single knowledge document.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use std::cmp::Ordering;
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::types::{Chunk, ChunkMetadata};

/// Bookkeeping written once an index build completes
#[derive(Debug, Clone, PartialEq)]
pub struct IndexMeta {
    /// SHA-256 of the knowledge document the index was built from
    pub document_hash: String,
    /// Embedding model used for the chunks
    pub embed_model: String,
    /// Number of chunks written
    pub chunk_count: usize,
    /// Build completion time
    pub built_at: DateTime<Utc>,
}

/// SQLite-backed chunk store
pub struct ChunkDb {
    conn: Arc<Mutex<Connection>>,
}

impl ChunkDb {
    /// Create or open the database at the given path
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)
            .map_err(|e| Error::VectorDb(format!("Failed to open database: {}", e)))?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };

        db.migrate()?;
        Ok(db)
    }

    /// Create an in-memory database (for testing)
    #[cfg(test)]
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| Error::VectorDb(format!("Failed to open in-memory database: {}", e)))?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };

        db.migrate()?;
        Ok(db)
    }

    /// Run database migrations
    fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock();

        conn.execute_batch(r#"
            PRAGMA journal_mode=WAL;
            PRAGMA synchronous=NORMAL;
        "#).map_err(|e| Error::VectorDb(format!("Failed to set pragmas: {}", e)))?;

        conn.execute_batch(r#"
            CREATE TABLE IF NOT EXISTS chunks (
                id TEXT PRIMARY KEY,
                collection TEXT NOT NULL,
                chunk_index INTEGER NOT NULL,
                source TEXT NOT NULL,
                content TEXT NOT NULL,
                embedding BLOB NOT NULL,
                dimensions INTEGER NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_chunks_collection ON chunks(collection);

            CREATE TABLE IF NOT EXISTS index_meta (
                collection TEXT PRIMARY KEY,
                document_hash TEXT NOT NULL,
                embed_model TEXT NOT NULL,
                chunk_count INTEGER NOT NULL,
                built_at TEXT NOT NULL
            );
        "#).map_err(|e| Error::VectorDb(format!("Failed to run migrations: {}", e)))?;

        Ok(())
    }

    /// Insert embedded chunks in a single transaction
    pub fn insert_chunks(&self, collection: &str, chunks: &[Chunk]) -> Result<usize> {
        ensure_embedded(chunks)?;

        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        write_chunks(&tx, collection, chunks)?;
        tx.commit()?;

        Ok(chunks.len())
    }

    /// Swap a collection's chunks and build record in one transaction
    ///
    /// On any failure the previous contents stay in place.
    pub fn replace_collection(&self, collection: &str, chunks: &[Chunk], meta: &IndexMeta) -> Result<usize> {
        ensure_embedded(chunks)?;

        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM chunks WHERE collection = ?1", params![collection])?;
        write_chunks(&tx, collection, chunks)?;
        write_meta(&tx, collection, meta)?;
        tx.commit()?;

        Ok(chunks.len())
    }

    /// Number of chunks in a collection
    pub fn count(&self, collection: &str) -> Result<usize> {
        let conn = self.conn.lock();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM chunks WHERE collection = ?1",
            params![collection],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Exact cosine search, best match first
    pub fn search(
        &self,
        collection: &str,
        query_embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<(Chunk, f32)>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT id, chunk_index, source, content, embedding
             FROM chunks WHERE collection = ?1",
        )?;

        let rows = stmt.query_map(params![collection], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, u32>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, Vec<u8>>(4)?,
            ))
        })?;

        let mut scored = Vec::new();
        for row in rows {
            let (id, chunk_index, source, content, blob) = row?;
            let embedding = decode_embedding(&blob)?;
            if embedding.len() != query_embedding.len() {
                return Err(Error::vector_db(format!(
                    "Embedding dimension mismatch: index has {}, query has {}",
                    embedding.len(),
                    query_embedding.len()
                )));
            }

            let id = Uuid::parse_str(&id)
                .map_err(|e| Error::vector_db(format!("Invalid chunk id '{}': {}", id, e)))?;
            let similarity = cosine_similarity(query_embedding, &embedding);
            let chunk = Chunk {
                id,
                content,
                metadata: ChunkMetadata {
                    source,
                    chunk_id: chunk_index,
                },
                embedding: Vec::new(),
            };
            scored.push((chunk, similarity));
        }

        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.metadata.chunk_id.cmp(&b.0.metadata.chunk_id))
        });
        scored.truncate(top_k);

        Ok(scored)
    }

    /// Read the build record of a collection
    pub fn index_meta(&self, collection: &str) -> Result<Option<IndexMeta>> {
        let conn = self.conn.lock();
        let meta = conn
            .query_row(
                "SELECT document_hash, embed_model, chunk_count, built_at
                 FROM index_meta WHERE collection = ?1",
                params![collection],
                |row| {
                    Ok(IndexMeta {
                        document_hash: row.get(0)?,
                        embed_model: row.get(1)?,
                        chunk_count: row.get::<_, i64>(2)? as usize,
                        built_at: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(meta)
    }
}

fn ensure_embedded(chunks: &[Chunk]) -> Result<()> {
    match chunks.iter().find(|c| !c.is_embedded()) {
        Some(chunk) => Err(Error::vector_db(format!("Chunk {} has no embedding", chunk.id))),
        None => Ok(()),
    }
}

fn write_chunks(conn: &Connection, collection: &str, chunks: &[Chunk]) -> Result<()> {
    let now = Utc::now();
    let mut stmt = conn.prepare(
        "INSERT OR REPLACE INTO chunks
            (id, collection, chunk_index, source, content, embedding, dimensions, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
    )?;
    for chunk in chunks {
        stmt.execute(params![
            chunk.id.to_string(),
            collection,
            chunk.metadata.chunk_id,
            chunk.metadata.source,
            chunk.content,
            encode_embedding(&chunk.embedding),
            chunk.embedding.len() as i64,
            now,
        ])?;
    }
    Ok(())
}

fn write_meta(conn: &Connection, collection: &str, meta: &IndexMeta) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO index_meta
            (collection, document_hash, embed_model, chunk_count, built_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            collection,
            meta.document_hash,
            meta.embed_model,
            meta.chunk_count as i64,
            meta.built_at,
        ],
    )?;
    Ok(())
}

fn encode_embedding(embedding: &[f32]) -> Vec<u8> {
    embedding.iter().flat_map(|v| v.to_le_bytes()).collect()
}

fn decode_embedding(blob: &[u8]) -> Result<Vec<f32>> {
    if blob.len() % 4 != 0 {
        return Err(Error::vector_db(format!(
            "Corrupt embedding blob of {} bytes",
            blob.len()
        )));
    }
    Ok(blob
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect())
}

/// Cosine similarity; zero when either vector has no magnitude
pub(crate) fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}
