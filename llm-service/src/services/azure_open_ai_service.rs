//! Azure OpenAI service for text completion and embeddings.
//!
//! Minimal, non-streaming client around the Azure OpenAI REST API.
//! Endpoints are derived from `LlmModelConfig::endpoint` and the deployment
//! name in `model`:
//! - POST {endpoint}/openai/deployments/{model}/completions?api-version={v}
//! - POST {endpoint}/openai/deployments/{model}/embeddings?api-version={v}
//!
//! Constructor validation:
//! - `cfg.provider` must be `LlmProvider::AzureOpenAi`
//! - `cfg.api_key` and `cfg.api_version` must be present
//! - `cfg.endpoint` must start with http:// or https://
//!
//! Errors are normalized via the unified types in `error_handler`.

use std::time::{Duration, Instant};

use reqwest::header;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{LlmError, ProviderError, ProviderErrorKind, make_snippet},
    completion::GenOptions,
};

/// Thin client for one Azure OpenAI deployment.
///
/// Keeps a preconfigured `reqwest::Client` (timeout and `api-key` header)
/// and the two deployment-scoped URLs.
#[derive(Debug)]
pub struct AzureOpenAiService {
    client: reqwest::Client,
    cfg: LlmModelConfig,
    url_completions: String,
    url_embeddings: String,
}

impl AzureOpenAiService {
    /// Creates a new [`AzureOpenAiService`] from the given config.
    ///
    /// # Errors
    /// - [`LlmError::Provider`] with `InvalidProvider` if `cfg.provider` is not Azure
    /// - [`LlmError::Provider`] with `MissingApiKey` if `cfg.api_key` is `None`
    /// - [`LlmError::Provider`] with `InvalidEndpoint` if `cfg.endpoint` or
    ///   `cfg.api_version` is invalid
    /// - [`LlmError::HttpTransport`] if the HTTP client cannot be built
    pub fn new(cfg: LlmModelConfig) -> Result<Self, LlmError> {
        if cfg.provider != LlmProvider::AzureOpenAi {
            return Err(
                ProviderError::new(cfg.provider, ProviderErrorKind::InvalidProvider).into(),
            );
        }

        let api_key = cfg.api_key.clone().ok_or_else(|| {
            ProviderError::new(cfg.provider, ProviderErrorKind::MissingApiKey)
        })?;

        let endpoint = cfg.endpoint.trim();
        if endpoint.is_empty()
            || !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
        {
            return Err(ProviderError::new(
                cfg.provider,
                ProviderErrorKind::InvalidEndpoint(cfg.endpoint.clone()),
            )
            .into());
        }

        let api_version = cfg.api_version.clone().filter(|v| !v.trim().is_empty()).ok_or_else(
            || {
                ProviderError::new(
                    cfg.provider,
                    ProviderErrorKind::InvalidEndpoint("missing api_version".into()),
                )
            },
        )?;

        let timeout = cfg
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(60));

        let mut headers = header::HeaderMap::new();
        headers.insert(
            "api-key",
            header::HeaderValue::from_str(&api_key).map_err(|e| {
                ProviderError::new(
                    cfg.provider,
                    ProviderErrorKind::Decode(format!("invalid API key header: {e}")),
                )
            })?,
        );
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        let base = endpoint.trim_end_matches('/');
        let url_completions = format!(
            "{}/openai/deployments/{}/completions?api-version={}",
            base, cfg.model, api_version
        );
        let url_embeddings = format!(
            "{}/openai/deployments/{}/embeddings?api-version={}",
            base, cfg.model, api_version
        );

        info!(
            provider = ?cfg.provider,
            deployment = %cfg.model,
            endpoint = %cfg.endpoint,
            timeout_secs = cfg.timeout_secs.unwrap_or(60),
            "AzureOpenAiService initialized"
        );

        Ok(Self {
            client,
            cfg,
            url_completions,
            url_embeddings,
        })
    }

    /// Performs a **non-streaming** completion request.
    ///
    /// # Errors
    /// - [`LlmError::Provider`] with `HttpStatus` for non-2xx responses
    /// - [`LlmError::HttpTransport`] for client/network failures
    /// - [`LlmError::Provider`] with `Decode` if the JSON cannot be parsed
    /// - [`LlmError::Provider`] with `EmptyChoices` if no choices are returned
    pub async fn complete(&self, prompt: &str, opts: GenOptions) -> Result<String, LlmError> {
        let started = Instant::now();
        let body = CompletionRequest {
            prompt,
            temperature: opts.temperature,
            max_tokens: opts.max_tokens,
        };

        debug!(
            deployment = %self.cfg.model,
            prompt_len = prompt.len(),
            temperature = opts.temperature,
            max_tokens = opts.max_tokens,
            "POST {}", self.url_completions
        );

        let resp = self
            .client
            .post(&self.url_completions)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let url = self.url_completions.clone();
            let text = resp.text().await.unwrap_or_default();
            let snippet = make_snippet(&text);

            error!(
                %status,
                %url,
                %snippet,
                deployment = %self.cfg.model,
                latency_ms = started.elapsed().as_millis(),
                "Azure completions returned non-success status"
            );

            return Err(ProviderError::new(
                self.cfg.provider,
                ProviderErrorKind::HttpStatus {
                    status,
                    url,
                    snippet,
                },
            )
            .into());
        }

        let out: CompletionResponse = match resp.json().await {
            Ok(v) => v,
            Err(e) => {
                error!(
                    error = %e,
                    deployment = %self.cfg.model,
                    latency_ms = started.elapsed().as_millis(),
                    "failed to decode completions response"
                );
                return Err(ProviderError::new(
                    self.cfg.provider,
                    ProviderErrorKind::Decode(format!(
                        "serde error: {e}; expected `choices[0].text`"
                    )),
                )
                .into());
            }
        };

        let content = out
            .choices
            .into_iter()
            .find_map(|c| c.text)
            .ok_or_else(|| {
                ProviderError::new(self.cfg.provider, ProviderErrorKind::EmptyChoices)
            })?;

        info!(
            deployment = %self.cfg.model,
            latency_ms = started.elapsed().as_millis(),
            "completion finished"
        );

        Ok(content)
    }

    /// Retrieves a single embeddings vector.
    ///
    /// # Errors
    /// Mirrors [`AzureOpenAiService::complete`] for status/transport/decode.
    pub async fn embeddings(&self, input: &str) -> Result<Vec<f32>, LlmError> {
        let started = Instant::now();
        let body = EmbeddingsRequest { input };

        debug!(
            deployment = %self.cfg.model,
            input_len = input.len(),
            "POST {}", self.url_embeddings
        );

        let resp = self
            .client
            .post(&self.url_embeddings)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let url = self.url_embeddings.clone();
            let text = resp.text().await.unwrap_or_default();
            let snippet = make_snippet(&text);

            error!(
                %status,
                %url,
                %snippet,
                deployment = %self.cfg.model,
                latency_ms = started.elapsed().as_millis(),
                "Azure embeddings returned non-success status"
            );

            return Err(ProviderError::new(
                self.cfg.provider,
                ProviderErrorKind::HttpStatus {
                    status,
                    url,
                    snippet,
                },
            )
            .into());
        }

        let out: EmbeddingsResponse = resp.json().await.map_err(|e| {
            ProviderError::new(
                self.cfg.provider,
                ProviderErrorKind::Decode(format!("serde error: {e}; expected `data[0].embedding`")),
            )
        })?;

        let first = out.data.into_iter().next().ok_or_else(|| {
            ProviderError::new(
                self.cfg.provider,
                ProviderErrorKind::Decode("empty `data` in embeddings response".into()),
            )
        })?;

        info!(
            deployment = %self.cfg.model,
            latency_ms = started.elapsed().as_millis(),
            "embeddings finished"
        );

        Ok(first.embedding)
    }
}

/* ===========================================================================
HTTP payloads
======================================================================== */

/// Minimal request body for the completions endpoint (non-streaming).
#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    prompt: &'a str,
    temperature: f32,
    max_tokens: u32,
}

/// Minimal response for the completions endpoint.
#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    text: Option<String>,
}

/// Request body for the embeddings endpoint.
#[derive(Debug, Serialize)]
struct EmbeddingsRequest<'a> {
    input: &'a str,
}

/// Response body for the embeddings endpoint.
#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingItem>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingItem {
    embedding: Vec<f32>,
}
