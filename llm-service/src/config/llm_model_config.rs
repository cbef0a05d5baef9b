use crate::config::llm_provider::LlmProvider;

/// Configuration for an LLM model invocation.
///
/// One instance describes one deployment/model: either the completion model
/// or the embedding model. Sampling parameters here are defaults; callers
/// may override temperature and token budget per request via
/// [`GenOptions`](crate::GenOptions).
#[derive(Debug, Clone, PartialEq)]
pub struct LlmModelConfig {
    /// The LLM provider/backend.
    pub provider: LlmProvider,

    /// Deployment name (Azure) or model identifier (OpenAI).
    pub model: String,

    /// Base endpoint, e.g. `https://my-resource.openai.azure.com`.
    pub endpoint: String,

    /// API key. Required for both supported providers.
    pub api_key: Option<String>,

    /// API version query parameter (Azure only).
    pub api_version: Option<String>,

    /// Default maximum number of tokens to generate.
    pub max_tokens: Option<u32>,

    /// Default sampling temperature.
    pub temperature: Option<f32>,

    /// Optional request timeout (in seconds).
    pub timeout_secs: Option<u64>,
}
