//! Startup: open or build the knowledge index, then assemble the workflow

use chrono::Utc;
use std::sync::Arc;

use crate::config::RagConfig;
use crate::error::Result;
use crate::generation::AnswerGenerator;
use crate::ingestion::{content_hash, DocumentLoader};
use crate::providers::local::LocalVectorStore;
use crate::providers::ollama::OllamaProvider;
use crate::providers::{EmbeddingProvider, LlmProvider, VectorStoreProvider};
use crate::retrieval::KnowledgeIndex;
use crate::storage::{ChunkDb, IndexMeta};
use crate::workflow::{QueryClassifier, SupportWorkflow};

/// How the index came to be ready
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexStatus {
    /// Reused what was already persisted
    Loaded(usize),
    /// Chunked and embedded the knowledge document
    Built(usize),
}

/// Build the production workflow against Ollama and the on-disk index
pub async fn build_workflow(config: &RagConfig, rebuild: bool) -> Result<SupportWorkflow> {
    let (embedder, llm) = OllamaProvider::new(config)?.split();
    let embedder: Arc<dyn EmbeddingProvider> = Arc::new(embedder);
    let llm: Arc<dyn LlmProvider> = Arc::new(llm);

    let store = LocalVectorStore::from_config(&config.vector_db)?;
    let db = Arc::clone(store.inner());
    check_providers(config, embedder.as_ref(), llm.as_ref(), &store).await;
    tracing::info!(
        "Vector index at {} (collection {})",
        config.vector_db.database_path().display(),
        store.collection()
    );

    let index = Arc::new(KnowledgeIndex::new(embedder, Arc::new(store), config.retrieval.top_k));

    match prepare_index(config, &index, &db, rebuild).await? {
        IndexStatus::Loaded(count) => tracing::info!("Using existing index ({} chunks)", count),
        IndexStatus::Built(count) => tracing::info!("Built new index ({} chunks)", count),
    }

    let classifier = QueryClassifier::from_config(Arc::clone(&llm), &config.llm);
    let generator = AnswerGenerator::from_config(index, llm, &config.llm);

    Ok(SupportWorkflow::new(classifier, generator, config.support.clone()))
}

/// Log whether each backend answers; an unreachable one is reported, not fatal
///
/// Returns true when both Ollama providers are up.
async fn check_providers(
    config: &RagConfig,
    embedder: &dyn EmbeddingProvider,
    llm: &dyn LlmProvider,
    store: &dyn VectorStoreProvider,
) -> bool {
    tracing::info!("Checking Ollama at {}...", config.llm.base_url);

    let embedder_up = matches!(embedder.health_check().await, Ok(true));
    let llm_up = matches!(llm.health_check().await, Ok(true));
    if embedder_up && llm_up {
        tracing::info!(
            "Ollama is running ({} embeddings: {}, {} generation: {})",
            embedder.name(),
            embedder.model(),
            llm.name(),
            llm.model()
        );
    } else {
        tracing::warn!("Ollama not available at {}", config.llm.base_url);
        tracing::warn!("Please start Ollama:");
        tracing::warn!("  1. Start: ollama serve");
        tracing::warn!(
            "  2. Pull models: ollama pull {} && ollama pull {}",
            embedder.model(),
            llm.model()
        );
    }

    if !matches!(store.health_check().await, Ok(true)) {
        tracing::warn!("Vector store {} failed its health check", store.name());
    }

    embedder_up && llm_up
}

/// Make sure the configured collection holds the knowledge document
///
/// A populated collection is reused as-is unless `rebuild` is set. A changed
/// document is only reported.
pub async fn prepare_index(
    config: &RagConfig,
    index: &KnowledgeIndex,
    db: &ChunkDb,
    rebuild: bool,
) -> Result<IndexStatus> {
    let collection = &config.vector_db.collection_name;
    let loader = DocumentLoader::new(&config.chunking);

    if !rebuild && db.count(collection)? > 0 {
        let count = index.load().await?;
        warn_if_stale(config, &loader, db.index_meta(collection)?);
        return Ok(IndexStatus::Loaded(count));
    }

    let path = &config.knowledge.path;
    let content = loader.load_document(path)?;
    let chunks = loader.split_documents(&content, &path.display().to_string());
    tracing::info!("Split {} into {} chunks", path.display(), chunks.len());

    // The stored collection is untouched until every chunk has an embedding
    let embedded = index.embed_chunks(chunks).await?;
    let meta = IndexMeta {
        document_hash: content_hash(&content),
        embed_model: config.llm.embed_model.clone(),
        chunk_count: embedded.len(),
        built_at: Utc::now(),
    };
    let count = db.replace_collection(collection, &embedded, &meta)?;

    Ok(IndexStatus::Built(count))
}

fn warn_if_stale(config: &RagConfig, loader: &DocumentLoader, meta: Option<IndexMeta>) {
    let Some(meta) = meta else {
        tracing::warn!("Index has no build record; cannot tell whether it is current");
        return;
    };

    match loader.load_document(&config.knowledge.path) {
        Ok(content) if content_hash(&content) != meta.document_hash => tracing::warn!(
            "{} changed since the index was built at {}; run with --rebuild-index to refresh it",
            config.knowledge.path.display(),
            meta.built_at
        ),
        Ok(_) => {}
        Err(e) => tracing::warn!("Could not re-read knowledge document: {}", e),
    }

    if meta.embed_model != config.llm.embed_model {
        tracing::warn!(
            "Index was embedded with {} but {} is configured",
            meta.embed_model,
            config.llm.embed_model
        );
    }
}
