//! Lightweight health probes for the configured LLM profiles.
//!
//! Azure OpenAI exposes no cheap unauthenticated probe, so the check is a
//! best-effort GET against the endpoint base (Azure) or `/v1/models`
//! (OpenAI). [`HealthService::check`] never fails; errors map to `ok=false`.

use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::llm_model_config::LlmModelConfig;
use crate::config::llm_provider::LlmProvider;
use crate::error_handler::LlmError;

/// A serializable health snapshot for a single profile.
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    /// Backend/provider (e.g. "AzureOpenAi").
    pub provider: String,
    /// Target endpoint base URL.
    pub endpoint: String,
    /// Deployment/model identifier for the probe.
    pub model: String,
    /// Overall health flag.
    pub ok: bool,
    /// Measured HTTP latency in milliseconds.
    pub latency_ms: u128,
    /// Short human-readable detail.
    pub message: String,
}

/// A health checker that reuses a single HTTP client.
pub struct HealthService {
    client: reqwest::Client,
}

impl HealthService {
    /// Builds the checker with an optional default timeout (seconds).
    pub fn new(timeout_secs: Option<u64>) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs.unwrap_or(10)))
            .build()?;
        Ok(Self { client })
    }

    /// Probes one profile; never fails.
    pub async fn check(&self, cfg: &LlmModelConfig) -> HealthStatus {
        let url = match cfg.provider {
            LlmProvider::AzureOpenAi => cfg.endpoint.trim_end_matches('/').to_string(),
            LlmProvider::OpenAi => {
                format!("{}/v1/models", cfg.endpoint.trim_end_matches('/'))
            }
        };

        debug!(provider = ?cfg.provider, %url, "health probe");
        let started = Instant::now();
        let result = self.client.get(&url).send().await;
        let latency_ms = started.elapsed().as_millis();

        match result {
            Ok(resp) => HealthStatus {
                provider: format!("{:?}", cfg.provider),
                endpoint: cfg.endpoint.clone(),
                model: cfg.model.clone(),
                ok: true,
                latency_ms,
                message: format!("reachable (HTTP {})", resp.status()),
            },
            Err(e) => {
                warn!(provider = ?cfg.provider, error = %e, "health probe failed");
                HealthStatus {
                    provider: format!("{:?}", cfg.provider),
                    endpoint: cfg.endpoint.clone(),
                    model: cfg.model.clone(),
                    ok: false,
                    latency_ms,
                    message: e.to_string(),
                }
            }
        }
    }

    /// Probes each config in order.
    pub async fn check_many(&self, cfgs: &[LlmModelConfig]) -> Vec<HealthStatus> {
        let mut out = Vec::with_capacity(cfgs.len());
        for cfg in cfgs {
            out.push(self.check(cfg).await);
        }
        out
    }
}
