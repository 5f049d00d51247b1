//! Deterministic stand-ins for the model and storage backends

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;

use crate::config::{LlmConfig, SupportConfig};
use crate::error::{Error, Result};
use crate::generation::AnswerGenerator;
use crate::providers::local::LocalVectorStore;
use crate::providers::{
    EmbeddingProvider, GenerationParams, LlmProvider, VectorSearchResult, VectorStoreProvider,
};
use crate::retrieval::KnowledgeIndex;
use crate::storage::ChunkDb;
use crate::types::Chunk;
use crate::workflow::{QueryClassifier, SupportWorkflow};

const DIMS: usize = 512;

/// Bag-of-words embedder: each word of three or more characters bumps one hashed bucket
#[derive(Default)]
pub struct HashEmbedder;

impl HashEmbedder {
    fn bucket(word: &str) -> usize {
        let mut hash: u64 = 0xcbf29ce484222325;
        for byte in word.bytes() {
            hash ^= u64::from(byte);
            hash = hash.wrapping_mul(0x100000001b3);
        }
        (hash % DIMS as u64) as usize
    }

    fn vector(text: &str) -> Vec<f32> {
        let mut vector = vec![0.0; DIMS];
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|word| word.chars().count() >= 3)
            .for_each(|word| vector[Self::bucket(&word.to_lowercase())] += 1.0);
        vector
    }
}

#[async_trait]
impl EmbeddingProvider for HashEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(Self::vector(text))
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "hash"
    }

    fn model(&self) -> &str {
        "hash-bow"
    }
}

/// Embedder standing in for an unreachable model server
pub struct FailingEmbedder;

#[async_trait]
impl EmbeddingProvider for FailingEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Err(Error::embedding("ollama down"))
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(false)
    }

    fn name(&self) -> &str {
        "failing"
    }

    fn model(&self) -> &str {
        "failing"
    }
}

/// LLM that gives the same reply to every prompt and records what it saw
pub struct StaticLlm {
    reply: std::result::Result<String, String>,
    prompts: Mutex<Vec<String>>,
    params: Mutex<Option<GenerationParams>>,
}

impl StaticLlm {
    pub fn new(reply: &str) -> Self {
        Self::with_reply(Ok(reply.to_string()))
    }

    pub fn failing(reason: &str) -> Self {
        Self::with_reply(Err(reason.to_string()))
    }

    fn with_reply(reply: std::result::Result<String, String>) -> Self {
        Self {
            reply,
            prompts: Mutex::new(Vec::new()),
            params: Mutex::new(None),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }

    pub fn last_params(&self) -> Option<GenerationParams> {
        *self.params.lock()
    }
}

#[async_trait]
impl LlmProvider for StaticLlm {
    async fn generate(&self, prompt: &str, params: GenerationParams) -> Result<String> {
        self.prompts.lock().push(prompt.to_string());
        *self.params.lock() = Some(params);
        self.reply.clone().map_err(Error::llm)
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "static"
    }

    fn model(&self) -> &str {
        "static"
    }
}

/// LLM with separate replies for classification and answer prompts
pub struct ScriptedLlm {
    classify: std::result::Result<String, String>,
    answer: std::result::Result<String, String>,
    answer_prompts: Mutex<Vec<String>>,
}

impl ScriptedLlm {
    pub fn new(
        classify: std::result::Result<&str, &str>,
        answer: std::result::Result<&str, &str>,
    ) -> Arc<Self> {
        Arc::new(Self {
            classify: classify.map(str::to_string).map_err(str::to_string),
            answer: answer.map(str::to_string).map_err(str::to_string),
            answer_prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn answer_calls(&self) -> usize {
        self.answer_prompts.lock().len()
    }

    pub fn last_answer_prompt(&self) -> Option<String> {
        self.answer_prompts.lock().last().cloned()
    }
}

#[async_trait]
impl LlmProvider for ScriptedLlm {
    async fn generate(&self, prompt: &str, _params: GenerationParams) -> Result<String> {
        if prompt.starts_with("Classify the following customer query") {
            return self.classify.clone().map_err(Error::llm);
        }
        self.answer_prompts.lock().push(prompt.to_string());
        self.answer.clone().map_err(Error::llm)
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "scripted"
    }

    fn model(&self) -> &str {
        "scripted"
    }
}

/// LLM that panics on use, standing in for a bug inside the workflow
pub struct PanickingLlm;

#[async_trait]
impl LlmProvider for PanickingLlm {
    async fn generate(&self, _prompt: &str, _params: GenerationParams) -> Result<String> {
        panic!("model client bug")
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "panicking"
    }

    fn model(&self) -> &str {
        "panicking"
    }
}

/// Vector store whose every operation fails
pub struct FailingStore;

#[async_trait]
impl VectorStoreProvider for FailingStore {
    async fn insert_chunks(&self, _chunks: &[Chunk]) -> Result<()> {
        Err(Error::vector_db("store unavailable"))
    }

    async fn search(&self, _query_embedding: &[f32], _top_k: usize) -> Result<Vec<VectorSearchResult>> {
        Err(Error::vector_db("store unavailable"))
    }

    async fn len(&self) -> Result<usize> {
        Err(Error::vector_db("store unavailable"))
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(false)
    }

    fn name(&self) -> &str {
        "failing"
    }
}

/// Small product knowledge base, one fact per chunk
pub fn knowledge_chunks() -> Vec<Chunk> {
    [
        "SmartWatch Pro X costs ₹15,999 and has a seven day battery.",
        "Wireless earbuds cost ₹4,999 with thirty hours of battery.",
        "Power bank 20000mAh costs ₹2,499 and charges two devices.",
        "Return policy: products can be returned within 7 days of delivery for a full refund.",
        "Support email support@techgear.com, open Monday to Saturday 9AM-6PM.",
    ]
    .iter()
    .enumerate()
    .map(|(i, text)| Chunk::new(text.to_string(), "product_info.txt", i as u32))
    .collect()
}

/// In-memory index loaded with `knowledge_chunks`
pub async fn seeded_index(top_k: usize) -> Arc<KnowledgeIndex> {
    let index = empty_index_with(top_k);
    index.index_documents(knowledge_chunks()).await.unwrap();
    Arc::new(index)
}

/// In-memory index with nothing stored
pub async fn empty_index() -> Arc<KnowledgeIndex> {
    Arc::new(empty_index_with(3))
}

/// Index whose store fails on every call
pub fn failing_index() -> Arc<KnowledgeIndex> {
    Arc::new(KnowledgeIndex::new(Arc::new(HashEmbedder), Arc::new(FailingStore), 3))
}

fn empty_index_with(top_k: usize) -> KnowledgeIndex {
    let db = Arc::new(ChunkDb::in_memory().unwrap());
    let store = LocalVectorStore::new(db, "test");
    KnowledgeIndex::new(Arc::new(HashEmbedder), Arc::new(store), top_k)
}

/// Workflow with one LLM stub behind both the classifier and the generator
pub fn workflow_with<L>(index: Arc<KnowledgeIndex>, llm: Arc<L>) -> SupportWorkflow
where
    L: LlmProvider + 'static,
{
    let config = LlmConfig::default();
    let classifier = QueryClassifier::from_config(llm.clone(), &config);
    let generator = AnswerGenerator::from_config(index, llm, &config);
    SupportWorkflow::new(classifier, generator, SupportConfig::default())
}
