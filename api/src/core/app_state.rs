use std::sync::Arc;

use answer_chain::AnswerChain;
use index_store::IndexConfig;
use llm_service::config::default_config::{config_completion, config_embedding};
use llm_service::error_handler::env_opt_u64;
use llm_service::LlmServiceProfiles;
use sql_chain::{SqlChain, WarehouseConfig};
use tracing::info;

use crate::error_handler::AppError;

/// Shared state for all HTTP handlers.
pub struct AppState {
    /// LLM completion + embedding profiles, also used by the health probe.
    pub llm_profiles: Arc<LlmServiceProfiles>,
    /// The retrieve-then-read answer chain.
    pub answer_chain: AnswerChain,
    /// The NL-to-SQL chain against the warehouse.
    pub sql_chain: SqlChain,
}

impl AppState {
    /// Loads every config struct from the environment and wires the
    /// chains. Called once at startup; handlers only ever see `Arc<Self>`.
    pub fn from_env() -> Result<Self, AppError> {
        let completion = config_completion()?;
        let embedding = config_embedding()?;
        info!(
            completion_model = %completion.model,
            embedding_model = %embedding.model,
            "LLM profiles configured"
        );
        let llm_profiles = Arc::new(LlmServiceProfiles::new(
            completion,
            embedding,
            env_opt_u64("LLM_TIMEOUT_SECS")?,
        )?);

        let index_cfg = IndexConfig::from_env()?;
        let warehouse_cfg = WarehouseConfig::from_env()?;

        let answer_chain = AnswerChain::new(
            llm_profiles.clone(),
            llm_profiles.clone(),
            index_cfg,
        );
        let sql_chain = SqlChain::new(llm_profiles.clone(), warehouse_cfg);

        Ok(Self {
            llm_profiles,
            answer_chain,
            sql_chain,
        })
    }
}
