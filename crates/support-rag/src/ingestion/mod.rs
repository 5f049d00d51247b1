//! Knowledge document ingestion: loading and chunking

mod chunker;
mod loader;

pub use chunker::TextChunker;
pub use loader::{content_hash, DocumentLoader};
