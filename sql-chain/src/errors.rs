//! Error handling for `sql-chain`.

use thiserror::Error;

/// Failures inside the SQL composition chain.
///
/// Callers normally never see these raw: [`SqlChain::answer`](crate::SqlChain::answer)
/// converts them into a fail-soft payload at the chain boundary.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum SqlChainError {
    /// Warehouse configuration problems (missing env, bad port).
    #[error(transparent)]
    Config(#[from] llm_service::error_handler::ConfigError),

    /// Connection or query failure against the warehouse.
    #[error("warehouse error: {0}")]
    Warehouse(#[from] sqlx::Error),

    /// LLM completion failure in either generation stage.
    #[error(transparent)]
    Llm(#[from] llm_service::LlmError),

    /// Template rendering failure.
    #[error(transparent)]
    Prompt(#[from] prompt_store::PromptError),

    /// The model's output carried no `SQLQuery:` section to execute.
    #[error("no SQLQuery section in model output")]
    MissingQuery,
}
