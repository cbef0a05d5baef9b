/// Represents the provider (backend) used for LLM inference.
///
/// Distinguishes Azure-hosted OpenAI deployments from the vanilla OpenAI
/// API. The two differ in URL shape and auth header, nothing else; adding
/// more providers later means extending this enum and the client factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LlmProvider {
    /// Azure OpenAI resource (deployment-scoped URLs, `api-key` header).
    AzureOpenAi,
    /// OpenAI API (`/v1/...` URLs, `Authorization: Bearer` header).
    OpenAi,
}
