//! Answer generation: Ollama client, prompt templates and the answer generator

pub mod answer;
pub mod ollama;
pub mod prompt;

pub use answer::{AnswerGenerator, GeneratedAnswer};
pub use ollama::OllamaClient;
pub use prompt::PromptBuilder;
