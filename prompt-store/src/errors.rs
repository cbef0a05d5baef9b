//! Unified error types for the crate.

use thiserror::Error;

/// Top-level error for prompt-store operations.
#[derive(Debug, Error)]
pub enum PromptError {
    /// A declared placeholder had no supplied value at render time.
    #[error("missing template variable: {0}")]
    MissingVariable(String),

    /// The map-rerank output did not match the `answer\nScore: N` shape.
    #[error("unparsable ranked answer: {0}")]
    UnparsableRankedAnswer(String),
}
