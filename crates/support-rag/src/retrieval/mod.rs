//! Vector index over the knowledge chunks

pub mod index;

pub use index::KnowledgeIndex;
