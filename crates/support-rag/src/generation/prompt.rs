//! Prompt templates for classification and grounded answers

use crate::providers::VectorSearchResult;

/// Prompt builder for support queries
pub struct PromptBuilder;

impl PromptBuilder {
    /// Join retrieved chunk texts into the context block, best match first
    pub fn build_context(results: &[VectorSearchResult]) -> String {
        results
            .iter()
            .map(|result| result.chunk.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Ask the model for exactly one category word
    pub fn build_classification_prompt(query: &str) -> String {
        format!(
            r#"Classify the following customer query into ONE category only.

Categories:
- "products": Questions about product features, prices, specifications, warranties, or comparisons
- "returns": Questions about return policy, refund process, or exchange procedures
- "general": General support questions, contact information, or business hours
- "unknown": Queries that are out of scope, unclear, or not related to our products/services

Query: {query}

Respond with ONLY the category name (products, returns, general, or unknown). No explanation."#,
            query = query
        )
    }

    /// Build the grounded answer prompt
    pub fn build_answer_prompt(context: &str, question: &str) -> String {
        format!(
            r#"You are a helpful customer support assistant for TechGear, an electronics company.
Use the following context to answer the customer's question accurately and concisely.
If the answer is not in the context, politely say you don't have that information.

Context:
{context}

Question: {question}

Answer:"#,
            context = context,
            question = question
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Chunk;

    fn hit(content: &str, chunk_id: u32) -> VectorSearchResult {
        VectorSearchResult {
            chunk: Chunk::new(content.to_string(), "kb.txt", chunk_id),
            similarity: 0.9,
        }
    }

    #[test]
    fn test_context_joins_with_blank_line() {
        let context = PromptBuilder::build_context(&[hit("first", 0), hit("second", 1)]);
        assert_eq!(context, "first\n\nsecond");
    }

    #[test]
    fn test_empty_context() {
        assert_eq!(PromptBuilder::build_context(&[]), "");
        let prompt = PromptBuilder::build_answer_prompt("", "Do you sell laptops?");
        assert!(prompt.contains("Context:\n\n\nQuestion: Do you sell laptops?"));
    }

    #[test]
    fn test_classification_prompt_embeds_query() {
        let prompt = PromptBuilder::build_classification_prompt("Where is my refund?");
        assert!(prompt.contains("Query: Where is my refund?"));
        assert!(prompt.ends_with("No explanation."));
    }
}
