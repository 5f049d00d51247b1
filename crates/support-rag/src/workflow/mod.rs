//! Classification and routing workflow
//!
//! Each turn runs Classify, then Route, then exactly one of Respond or
//! Escalate. Stage failures are recorded in the turn metadata and replaced
//! by safe defaults, so `invoke` always produces a result.

pub mod category;
pub mod classifier;
pub mod escalation;
pub mod state;

pub use category::{Category, Route};
pub use classifier::QueryClassifier;
pub use escalation::FALLBACK_ANSWER;
pub use state::{ClassifiedTurn, ClassifierStatus, RagOutcome, TurnMetadata, TurnResult};

use crate::config::SupportConfig;
use crate::generation::AnswerGenerator;

/// The support chatbot pipeline
pub struct SupportWorkflow {
    classifier: QueryClassifier,
    generator: AnswerGenerator,
    support: SupportConfig,
}

impl SupportWorkflow {
    /// Assemble the workflow from its stages
    pub fn new(classifier: QueryClassifier, generator: AnswerGenerator, support: SupportConfig) -> Self {
        Self {
            classifier,
            generator,
            support,
        }
    }

    /// Run one query through the pipeline
    pub async fn invoke(&self, query: &str) -> TurnResult {
        let turn = self.classify(query).await;

        match Self::route(&turn) {
            Route::Respond => {
                tracing::info!("Routing {} query to responder", turn.category);
                self.respond(turn).await
            }
            Route::Escalate => {
                tracing::info!("Routing {} query to escalation", turn.category);
                self.escalate(turn)
            }
        }
    }

    /// Pure routing decision
    pub fn route(turn: &ClassifiedTurn) -> Route {
        turn.category.route()
    }

    async fn classify(&self, query: &str) -> ClassifiedTurn {
        let (category, classifier) = self.classifier.classify(query).await;
        ClassifiedTurn {
            query: query.to_string(),
            category,
            classifier,
        }
    }

    async fn respond(&self, turn: ClassifiedTurn) -> TurnResult {
        match self.generator.answer_with_sources(&turn.query).await {
            Ok(generated) if !generated.answer.is_empty() => {
                tracing::debug!("Answered from {} sources", generated.sources.len());
                let rag = RagOutcome::Answered {
                    context_used: true,
                    sources: generated.sources,
                };
                turn.finish(generated.answer, Some(rag), None)
            }
            Ok(_) => {
                tracing::warn!("Model returned an empty answer");
                let rag = RagOutcome::Failed {
                    error: "empty answer from model".to_string(),
                };
                turn.finish(FALLBACK_ANSWER.to_string(), Some(rag), None)
            }
            Err(e) => {
                tracing::error!("RAG error: {}", e);
                let rag = RagOutcome::Failed { error: e.to_string() };
                turn.finish(FALLBACK_ANSWER.to_string(), Some(rag), None)
            }
        }
    }

    fn escalate(&self, turn: ClassifiedTurn) -> TurnResult {
        let answer = escalation::message_for(turn.category, &self.support);
        tracing::info!("Query escalated to support");
        turn.finish(answer, None, Some(true))
    }
}
