//! Per-stage turn records
//!
//! Classification produces a `ClassifiedTurn`; the terminal stage consumes
//! it and produces the `TurnResult` handed back to the caller.

use serde::{Deserialize, Serialize};

use crate::types::ChunkMetadata;

use super::category::Category;

/// Outcome of the classification call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassifierStatus {
    /// The model returned a valid label
    Success,
    /// The call failed or returned something outside the category set
    #[serde(untagged)]
    Failed { error: String },
}

/// Outcome of the respond stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RagOutcome {
    /// An answer was generated from retrieved context
    Answered {
        sources: Vec<ChunkMetadata>,
        context_used: bool,
    },
    /// Retrieval or generation failed; the fallback answer was used
    Failed { error: String },
}

/// Diagnostic tags accumulated while a turn runs
///
/// Never read back by the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TurnMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classifier: Option<ClassifierStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rag: Option<RagOutcome>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub escalation: Option<bool>,
}

/// A query after classification, before the terminal stage
#[derive(Debug, Clone)]
pub struct ClassifiedTurn {
    pub query: String,
    pub category: Category,
    pub classifier: ClassifierStatus,
}

impl ClassifiedTurn {
    /// Finish the turn with an answer and the terminal stage's tags
    pub(crate) fn finish(self, answer: String, rag: Option<RagOutcome>, escalation: Option<bool>) -> TurnResult {
        TurnResult {
            query: self.query,
            category: self.category,
            answer,
            metadata: TurnMetadata {
                classifier: Some(self.classifier),
                rag,
                escalation,
            },
        }
    }
}

/// Final output of one workflow run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnResult {
    pub query: String,
    pub category: Category,
    pub answer: String,
    pub metadata: TurnMetadata,
}
