//! Unified error types for the crate.

use thiserror::Error;

/// Top-level error for chain execution.
///
/// These never leave a record: `AnswerChain::answer` converts them into a
/// fail-soft [`ComposedAnswer`](crate::ComposedAnswer), and the batch
/// processor catches anything else.
#[derive(Debug, Error)]
pub enum ChainError {
    /// Retrieval backend failure.
    #[error("retrieval: {0}")]
    Index(#[from] index_store::IndexError),

    /// LLM completion failure.
    #[error("completion: {0}")]
    Llm(#[from] llm_service::LlmError),

    /// Prompt rendering or output parsing failure.
    #[error("prompt: {0}")]
    Prompt(#[from] prompt_store::PromptError),
}
