//! Retrieval-grounded answer generation

use std::sync::Arc;

use crate::config::LlmConfig;
use crate::error::Result;
use crate::providers::{GenerationParams, LlmProvider};
use crate::retrieval::KnowledgeIndex;
use crate::types::ChunkMetadata;

use super::prompt::PromptBuilder;

/// An answer together with what it was grounded on
#[derive(Debug, Clone)]
pub struct GeneratedAnswer {
    /// Context block handed to the model
    pub context: String,
    /// Model output, trimmed
    pub answer: String,
    /// Metadata of the retrieved chunks, best match first
    pub sources: Vec<ChunkMetadata>,
}

/// Answers questions from the top-k retrieved chunks
pub struct AnswerGenerator {
    index: Arc<KnowledgeIndex>,
    llm: Arc<dyn LlmProvider>,
    params: GenerationParams,
}

impl AnswerGenerator {
    /// Create a generator with explicit sampling parameters
    pub fn new(index: Arc<KnowledgeIndex>, llm: Arc<dyn LlmProvider>, params: GenerationParams) -> Self {
        Self { index, llm, params }
    }

    /// Create a generator using the configured answer temperature and token budget
    pub fn from_config(index: Arc<KnowledgeIndex>, llm: Arc<dyn LlmProvider>, config: &LlmConfig) -> Self {
        Self::new(
            index,
            llm,
            GenerationParams {
                temperature: config.temperature,
                max_tokens: config.answer_max_tokens,
            },
        )
    }

    /// Answer text only
    pub async fn answer(&self, query: &str) -> Result<String> {
        Ok(self.answer_with_sources(query).await?.answer)
    }

    /// Retrieve once, build the prompt and generate
    ///
    /// An empty retrieval still produces a generation call with an empty
    /// context block.
    pub async fn answer_with_sources(&self, query: &str) -> Result<GeneratedAnswer> {
        let results = self.index.retrieve(query).await?;
        let context = PromptBuilder::build_context(&results);
        let prompt = PromptBuilder::build_answer_prompt(&context, query);

        tracing::debug!(
            "Generating answer from {} chunks ({} context chars)",
            results.len(),
            context.len()
        );

        let answer = self.llm.generate(&prompt, self.params).await?;

        Ok(GeneratedAnswer {
            context,
            answer: answer.trim().to_string(),
            sources: results.into_iter().map(|r| r.chunk.metadata).collect(),
        })
    }
}
