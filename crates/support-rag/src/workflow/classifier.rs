//! LLM-backed query classification

use std::sync::Arc;

use crate::config::LlmConfig;
use crate::generation::PromptBuilder;
use crate::providers::{GenerationParams, LlmProvider};

use super::category::Category;
use super::state::ClassifierStatus;

/// Assigns each query one of the four categories
pub struct QueryClassifier {
    llm: Arc<dyn LlmProvider>,
    params: GenerationParams,
}

impl QueryClassifier {
    /// Create a classifier with explicit sampling parameters
    pub fn new(llm: Arc<dyn LlmProvider>, params: GenerationParams) -> Self {
        Self { llm, params }
    }

    /// Create a classifier with the configured low temperature and tiny token budget
    pub fn from_config(llm: Arc<dyn LlmProvider>, config: &LlmConfig) -> Self {
        Self::new(
            llm,
            GenerationParams {
                temperature: config.classifier_temperature,
                max_tokens: config.classifier_max_tokens,
            },
        )
    }

    /// Classify a query; any failure yields `Unknown` with the reason recorded
    pub async fn classify(&self, query: &str) -> (Category, ClassifierStatus) {
        let prompt = PromptBuilder::build_classification_prompt(query);

        let raw = match self.llm.generate(&prompt, self.params).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("Classification failed: {}", e);
                return (
                    Category::Unknown,
                    ClassifierStatus::Failed {
                        error: e.to_string(),
                    },
                );
            }
        };

        match Category::normalize(&raw) {
            Some(category) => {
                tracing::info!("Classified as: {}", category);
                (category, ClassifierStatus::Success)
            }
            None => {
                tracing::warn!("Classifier returned unrecognized label {:?}", raw.trim());
                (
                    Category::Unknown,
                    ClassifierStatus::Failed {
                        error: format!("unrecognized category: {:?}", raw.trim()),
                    },
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::StaticLlm;

    fn classifier(llm: Arc<StaticLlm>) -> QueryClassifier {
        QueryClassifier::from_config(llm, &LlmConfig::default())
    }

    #[tokio::test]
    async fn test_valid_label() {
        let llm = Arc::new(StaticLlm::new(" Products\n"));
        let (category, status) = classifier(llm.clone()).classify("How much is the power bank?").await;

        assert_eq!(category, Category::Products);
        assert_eq!(status, ClassifierStatus::Success);
        assert_eq!(
            llm.last_params(),
            Some(GenerationParams {
                temperature: 0.1,
                max_tokens: 10
            })
        );
    }

    #[tokio::test]
    async fn test_out_of_set_label_is_unknown() {
        let llm = Arc::new(StaticLlm::new("billing"));
        let (category, status) = classifier(llm).classify("Why was I charged twice?").await;

        assert_eq!(category, Category::Unknown);
        assert!(matches!(status, ClassifierStatus::Failed { .. }));
    }

    #[tokio::test]
    async fn test_call_failure_is_unknown() {
        let llm = Arc::new(StaticLlm::failing("connection refused"));
        let (category, status) = classifier(llm).classify("Hello?").await;

        assert_eq!(category, Category::Unknown);
        match status {
            ClassifierStatus::Failed { error } => assert!(error.contains("connection refused")),
            other => panic!("unexpected status {:?}", other),
        }
    }
}
