//! Configuration for the support chatbot
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! environment variables (a `.env` file in the working directory is loaded
//! first).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Error, Result};

/// Main chatbot configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RagConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Knowledge document location
    #[serde(default)]
    pub knowledge: KnowledgeConfig,
    /// Chunking configuration
    #[serde(default)]
    pub chunking: ChunkingConfig,
    /// Retrieval configuration
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    /// Ollama/LLM configuration
    #[serde(default)]
    pub llm: LlmConfig,
    /// Embedding configuration
    #[serde(default)]
    pub embeddings: EmbeddingConfig,
    /// Vector database configuration
    #[serde(default)]
    pub vector_db: VectorDbConfig,
    /// Human support contact details used in escalations
    #[serde(default)]
    pub support: SupportConfig,
}

impl RagConfig {
    /// Load configuration from defaults, an optional TOML file and the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        // Missing .env is the normal case in production
        let _ = dotenvy::dotenv();

        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML configuration file; absent sections fall back to defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Invalid config: {}", e)))
    }

    /// Override values from environment variables
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_vars(|key| std::env::var(key).ok())
    }

    fn apply_vars<F>(&mut self, var: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = var("HOST") {
            self.server.host = v;
        }
        if let Some(v) = var("PORT") {
            self.server.port = parse_var("PORT", &v)?;
        }
        if let Some(v) = var("KNOWLEDGE_BASE_PATH") {
            self.knowledge.path = PathBuf::from(v);
        }
        if let Some(v) = var("CHUNK_SIZE") {
            self.chunking.chunk_size = parse_var("CHUNK_SIZE", &v)?;
        }
        if let Some(v) = var("CHUNK_OVERLAP") {
            self.chunking.chunk_overlap = parse_var("CHUNK_OVERLAP", &v)?;
        }
        if let Some(v) = var("TOP_K_RESULTS") {
            self.retrieval.top_k = parse_var("TOP_K_RESULTS", &v)?;
        }
        if let Some(v) = var("OLLAMA_BASE_URL") {
            self.llm.base_url = v;
        }
        if let Some(v) = var("MODEL_NAME") {
            self.llm.generate_model = v;
        }
        if let Some(v) = var("EMBED_MODEL") {
            self.llm.embed_model = v;
        }
        if let Some(v) = var("TEMPERATURE") {
            self.llm.temperature = parse_var("TEMPERATURE", &v)?;
        }
        if let Some(v) = var("VECTOR_INDEX_DIR") {
            self.vector_db.index_dir = PathBuf::from(v);
        }
        if let Some(v) = var("COLLECTION_NAME") {
            self.vector_db.collection_name = v;
        }
        Ok(())
    }

    /// Reject values that cannot work together
    pub fn validate(&self) -> Result<()> {
        if self.chunking.chunk_size == 0 {
            return Err(Error::Config("chunk_size must be greater than 0".to_string()));
        }
        if self.chunking.chunk_overlap >= self.chunking.chunk_size {
            return Err(Error::Config(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunking.chunk_overlap, self.chunking.chunk_size
            )));
        }
        if self.retrieval.top_k == 0 {
            return Err(Error::Config("top_k must be greater than 0".to_string()));
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(Error::Config(format!(
                "temperature must be within 0.0..=2.0, got {}",
                self.llm.temperature
            )));
        }
        if self.llm.generate_model.trim().is_empty() {
            return Err(Error::Config("generate_model must not be empty".to_string()));
        }
        if self.vector_db.collection_name.trim().is_empty() {
            return Err(Error::Config("collection_name must not be empty".to_string()));
        }
        Ok(())
    }
}

fn parse_var<T>(key: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| Error::Config(format!("Invalid value for {}: '{}' ({})", key, value, e)))
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            enable_cors: true,
        }
    }
}

/// Knowledge document configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KnowledgeConfig {
    /// Path to the plain-text knowledge document
    pub path: PathBuf,
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/product_info.txt"),
        }
    }
}

/// Text chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Target chunk size in characters
    pub chunk_size: usize,
    /// Overlap between chunks in characters
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 200,
            chunk_overlap: 50,
        }
    }
}

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Number of chunks fed to the answer prompt
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { top_k: 3 }
    }
}

/// LLM (Ollama) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Ollama base URL
    pub base_url: String,
    /// Embedding model name
    pub embed_model: String,
    /// Generation model name
    pub generate_model: String,
    /// Temperature for answer generation
    pub temperature: f32,
    /// Temperature for classification
    pub classifier_temperature: f32,
    /// Output token budget for classification (one category word)
    pub classifier_max_tokens: u32,
    /// Output token budget for answers
    pub answer_max_tokens: u32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            embed_model: "nomic-embed-text".to_string(),
            generate_model: "llama3.2:3b".to_string(),
            temperature: 0.7,
            classifier_temperature: 0.1,
            classifier_max_tokens: 10,
            answer_max_tokens: 150,
            timeout_secs: 60,
        }
    }
}

/// Embedding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Concurrent embedding requests while building the index
    pub concurrency: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self { concurrency: 4 }
    }
}

/// Vector database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorDbConfig {
    /// Directory holding the index database
    pub index_dir: PathBuf,
    /// Collection the knowledge chunks are stored under
    pub collection_name: String,
}

impl VectorDbConfig {
    /// Path of the SQLite file inside the index directory
    pub fn database_path(&self) -> PathBuf {
        self.index_dir.join("index.db")
    }
}

impl Default for VectorDbConfig {
    fn default() -> Self {
        Self {
            index_dir: PathBuf::from("./vector_index"),
            collection_name: "product_knowledge_base".to_string(),
        }
    }
}

/// Contact details quoted in escalation messages
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SupportConfig {
    /// Support email address
    pub email: String,
    /// Support hours, free text
    pub hours: String,
}

impl Default for SupportConfig {
    fn default() -> Self {
        Self {
            email: "support@techgear.com".to_string(),
            hours: "Monday-Saturday, 9AM-6PM IST".to_string(),
        }
    }
}
