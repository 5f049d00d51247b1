//! Storage module for persistent data storage
//!
//! Provides SQLite-based persistence for embedded knowledge chunks.

mod database;

pub use database::{ChunkDb, IndexMeta};
