//! Default LLM configs loaded strictly from environment variables.
//!
//! Convenience constructors for [`LlmModelConfig`], one per role:
//!
//! - **Completion** → the text-completion deployment answering questions
//! - **Embedding**  → the embedding deployment used for vector retrieval
//!
//! # Environment variables
//!
//! Common:
//! - `LLM_PROVIDER` = `azure` (default) or `openai`
//! - `OPENAI_API_KEY` = API key (mandatory)
//! - `LLM_MAX_TOKENS` = optional default token budget (u32)
//! - `LLM_TIMEOUT_SECS` = optional request timeout
//!
//! Azure-specific:
//! - `AZURE_OPENAI_SERVICE` or `AZURE_OPENAI_ENDPOINT` = resource (mandatory)
//! - `OPENAI_API_VERSION` = API version query parameter (mandatory)
//!
//! Models:
//! - `OPENAI_COMPLETION_MODEL` = completion deployment/model (mandatory)
//! - `OPENAI_EMBEDDING_MODEL`  = embedding deployment/model (mandatory)

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{ConfigError, LlmError, env_opt_u64, must_env, validate_http_endpoint},
};

/// Resolves the provider from `LLM_PROVIDER` (defaults to Azure).
///
/// # Errors
/// Returns [`ConfigError::UnsupportedProvider`] for unrecognized values.
fn provider() -> Result<LlmProvider, LlmError> {
    match std::env::var("LLM_PROVIDER") {
        Ok(v) if !v.trim().is_empty() => match v.trim().to_ascii_lowercase().as_str() {
            "azure" | "azure_openai" => Ok(LlmProvider::AzureOpenAi),
            "openai" => Ok(LlmProvider::OpenAi),
            other => Err(ConfigError::UnsupportedProvider(other.to_string()).into()),
        },
        _ => Ok(LlmProvider::AzureOpenAi),
    }
}

/// Resolves the API endpoint for the selected provider.
///
/// Precedence for Azure:
/// 1. `AZURE_OPENAI_ENDPOINT` if present and non-empty
/// 2. `AZURE_OPENAI_SERVICE` → `https://{service}.openai.azure.com`
///
/// Vanilla OpenAI defaults to `https://api.openai.com`.
fn endpoint(p: LlmProvider) -> Result<String, LlmError> {
    match p {
        LlmProvider::AzureOpenAi => {
            if let Ok(url) = std::env::var("AZURE_OPENAI_ENDPOINT") {
                if !url.trim().is_empty() {
                    validate_http_endpoint("AZURE_OPENAI_ENDPOINT", url.trim())?;
                    return Ok(url.trim().to_string());
                }
            }
            let service = must_env("AZURE_OPENAI_SERVICE")?;
            Ok(format!("https://{}.openai.azure.com", service.trim()))
        }
        LlmProvider::OpenAi => Ok(std::env::var("OPENAI_ENDPOINT")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "https://api.openai.com".to_string())),
    }
}

/// Constructs the config for the **completion** model.
///
/// # Env
/// - `OPENAI_COMPLETION_MODEL` (required)
/// - `LLM_MAX_TOKENS`, `LLM_TIMEOUT_SECS` (optional)
///
/// # Defaults
/// - `temperature = Some(0.3)`
/// - `max_tokens = Some(500)` when `LLM_MAX_TOKENS` is unset
pub fn config_completion() -> Result<LlmModelConfig, LlmError> {
    let provider = provider()?;
    let endpoint = endpoint(provider)?;
    let model = must_env("OPENAI_COMPLETION_MODEL")?;
    let api_key = must_env("OPENAI_API_KEY")?;
    let api_version = match provider {
        LlmProvider::AzureOpenAi => Some(must_env("OPENAI_API_VERSION")?),
        LlmProvider::OpenAi => None,
    };
    let max_tokens = max_tokens_u32(env_opt_u64("LLM_MAX_TOKENS")?)?.or(Some(500));
    let timeout_secs = env_opt_u64("LLM_TIMEOUT_SECS")?;

    Ok(LlmModelConfig {
        provider,
        model,
        endpoint,
        api_key: Some(api_key),
        api_version,
        max_tokens,
        temperature: Some(0.3),
        timeout_secs,
    })
}

/// Narrows the parsed token budget to `u32` without truncation.
///
/// # Errors
/// Returns [`ConfigError::InvalidNumber`] when the value exceeds `u32::MAX`.
fn max_tokens_u32(value: Option<u64>) -> Result<Option<u32>, LlmError> {
    match value {
        Some(v) => u32::try_from(v).map(Some).map_err(|_| {
            ConfigError::InvalidNumber {
                var: "LLM_MAX_TOKENS",
                reason: "expected u32",
            }
            .into()
        }),
        None => Ok(None),
    }
}

/// Constructs the config for the **embedding** model.
///
/// # Env
/// - `OPENAI_EMBEDDING_MODEL` (required)
///
/// # Defaults
/// - `temperature = None` (embeddings are deterministic)
/// - `timeout_secs = Some(30)` when `LLM_TIMEOUT_SECS` is unset
pub fn config_embedding() -> Result<LlmModelConfig, LlmError> {
    let provider = provider()?;
    let endpoint = endpoint(provider)?;
    let model = must_env("OPENAI_EMBEDDING_MODEL")?;
    let api_key = must_env("OPENAI_API_KEY")?;
    let api_version = match provider {
        LlmProvider::AzureOpenAi => Some(must_env("OPENAI_API_VERSION")?),
        LlmProvider::OpenAi => None,
    };
    let timeout_secs = env_opt_u64("LLM_TIMEOUT_SECS")?.or(Some(30));

    Ok(LlmModelConfig {
        provider,
        model,
        endpoint,
        api_key: Some(api_key),
        api_version,
        max_tokens: None,
        temperature: None,
        timeout_secs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_budget_within_range_passes_through() {
        assert_eq!(max_tokens_u32(Some(500)).unwrap(), Some(500));
        assert_eq!(max_tokens_u32(None).unwrap(), None);
        assert_eq!(
            max_tokens_u32(Some(u64::from(u32::MAX))).unwrap(),
            Some(u32::MAX)
        );
    }

    #[test]
    fn oversized_token_budget_is_a_config_error() {
        let err = max_tokens_u32(Some(u64::from(u32::MAX) + 1)).unwrap_err();
        assert!(matches!(
            err,
            LlmError::Config(ConfigError::InvalidNumber {
                var: "LLM_MAX_TOKENS",
                ..
            })
        ));
    }
}
