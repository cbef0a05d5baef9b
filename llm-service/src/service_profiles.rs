//! Shared LLM service with two active profiles: `completion` and `embedding`.
//!
//! - Lives in the same Tokio runtime as the application.
//! - Construct once, wrap in `Arc`, and pass clones to dependents.
//! - Caches underlying HTTP clients per config (endpoint+model+key+timeout).
//! - Implements the [`CompletionModel`] and [`EmbeddingModel`] seams the
//!   chains consume.

use std::{
    collections::HashMap,
    hash::{Hash, Hasher},
    sync::Arc,
};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    completion::{CompletionModel, EmbeddingModel, GenOptions},
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::LlmError,
    health_service::{HealthService, HealthStatus},
    services::{azure_open_ai_service::AzureOpenAiService, open_ai_service::OpenAiService},
};

/// Shared service that manages the **completion** and **embedding** profiles.
///
/// Internally caches Azure/OpenAI clients keyed by their configuration to
/// avoid recreating HTTP clients on each call.
pub struct LlmServiceProfiles {
    completion: LlmModelConfig,
    embedding: LlmModelConfig,

    azure: RwLock<HashMap<ClientKey, Arc<AzureOpenAiService>>>,
    openai: RwLock<HashMap<ClientKey, Arc<OpenAiService>>>,

    health: HealthService,
}

impl LlmServiceProfiles {
    /// Creates a new service with the two profiles.
    pub fn new(
        completion: LlmModelConfig,
        embedding: LlmModelConfig,
        health_timeout_secs: Option<u64>,
    ) -> Result<Self, LlmError> {
        Ok(Self {
            completion,
            embedding,
            azure: RwLock::new(HashMap::new()),
            openai: RwLock::new(HashMap::new()),
            health: HealthService::new(health_timeout_secs)?,
        })
    }

    /// Returns a health snapshot for the distinct profiles.
    ///
    /// If the embedding profile equals the completion profile, it is checked
    /// only once.
    pub async fn health_all(&self) -> Vec<HealthStatus> {
        let mut list = Vec::<LlmModelConfig>::with_capacity(2);
        list.push(self.completion.clone());
        if self.embedding != self.completion {
            list.push(self.embedding.clone());
        }
        self.health.check_many(&list).await
    }

    /// Returns references to the current profiles `(completion, embedding)`.
    pub fn profiles(&self) -> (&LlmModelConfig, &LlmModelConfig) {
        (&self.completion, &self.embedding)
    }

    /* --------------------- Internals --------------------- */

    async fn complete_with(
        &self,
        cfg: &LlmModelConfig,
        prompt: &str,
        opts: GenOptions,
    ) -> Result<String, LlmError> {
        match cfg.provider {
            LlmProvider::AzureOpenAi => {
                let cli = self.get_or_init_azure(cfg).await?;
                cli.complete(prompt, opts).await
            }
            LlmProvider::OpenAi => {
                let cli = self.get_or_init_openai(cfg).await?;
                cli.complete(prompt, opts).await
            }
        }
    }

    async fn get_or_init_azure(
        &self,
        cfg: &LlmModelConfig,
    ) -> Result<Arc<AzureOpenAiService>, LlmError> {
        let key = ClientKey::from(cfg);
        if let Some(cli) = self.azure.read().await.get(&key).cloned() {
            return Ok(cli);
        }
        let cli = Arc::new(AzureOpenAiService::new(cfg.clone())?);
        let mut w = self.azure.write().await;
        Ok(w.entry(key).or_insert(cli).clone())
    }

    async fn get_or_init_openai(
        &self,
        cfg: &LlmModelConfig,
    ) -> Result<Arc<OpenAiService>, LlmError> {
        let key = ClientKey::from(cfg);
        if let Some(cli) = self.openai.read().await.get(&key).cloned() {
            return Ok(cli);
        }
        let cli = Arc::new(OpenAiService::new(cfg.clone())?);
        let mut w = self.openai.write().await;
        Ok(w.entry(key).or_insert(cli).clone())
    }
}

#[async_trait]
impl CompletionModel for LlmServiceProfiles {
    async fn complete(&self, prompt: &str, opts: GenOptions) -> Result<String, LlmError> {
        self.complete_with(&self.completion, prompt, opts).await
    }
}

#[async_trait]
impl EmbeddingModel for LlmServiceProfiles {
    async fn embed(&self, input: &str) -> Result<Vec<f32>, LlmError> {
        match self.embedding.provider {
            LlmProvider::AzureOpenAi => {
                let cli = self.get_or_init_azure(&self.embedding).await?;
                cli.embeddings(input).await
            }
            LlmProvider::OpenAi => {
                let cli = self.get_or_init_openai(&self.embedding).await?;
                cli.embeddings(input).await
            }
        }
    }
}

/// Internal cache key to identify unique client configs.
#[derive(Clone, Eq)]
struct ClientKey {
    provider: LlmProvider,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    timeout: Option<u64>,
}

impl From<&LlmModelConfig> for ClientKey {
    fn from(cfg: &LlmModelConfig) -> Self {
        Self {
            provider: cfg.provider,
            endpoint: cfg.endpoint.clone(),
            model: cfg.model.clone(),
            api_key: cfg.api_key.clone(),
            timeout: cfg.timeout_secs,
        }
    }
}

impl PartialEq for ClientKey {
    fn eq(&self, other: &Self) -> bool {
        self.provider == other.provider
            && self.endpoint == other.endpoint
            && self.model == other.model
            && self.api_key == other.api_key
            && self.timeout == other.timeout
    }
}

impl Hash for ClientKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.provider.hash(state);
        self.endpoint.hash(state);
        self.model.hash(state);
        if let Some(ref k) = self.api_key {
            k.hash(state);
        } else {
            0usize.hash(state);
        }
        self.timeout.hash(state);
    }
}
