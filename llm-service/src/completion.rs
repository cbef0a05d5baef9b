//! Seams the chains depend on: completion and embedding capabilities.
//!
//! The chains only ever see these traits, which keeps them testable with
//! in-memory fakes and keeps provider churn out of the chain code.

use async_trait::async_trait;

use crate::error_handler::LlmError;

/// Per-request generation options resolved from caller overrides.
#[derive(Debug, Clone, Copy)]
pub struct GenOptions {
    /// Sampling temperature for this call.
    pub temperature: f32,
    /// Maximum number of completion tokens for this call.
    pub max_tokens: u32,
}

impl Default for GenOptions {
    fn default() -> Self {
        Self {
            temperature: 0.3,
            max_tokens: 500,
        }
    }
}

/// A blocking-round-trip text completion capability.
#[async_trait]
pub trait CompletionModel: Send + Sync {
    /// Completes `prompt` and returns the raw model text.
    async fn complete(&self, prompt: &str, opts: GenOptions) -> Result<String, LlmError>;
}

/// A blocking-round-trip embedding capability.
#[async_trait]
pub trait EmbeddingModel: Send + Sync {
    /// Embeds `input` into a dense vector.
    async fn embed(&self, input: &str) -> Result<Vec<f32>, LlmError>;
}
