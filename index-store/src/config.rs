//! Backend connection configuration.
//!
//! All values are read once at process start (see `IndexConfig::from_env`)
//! and passed into retriever constructors; no retriever reads the
//! environment itself.

use llm_service::error_handler::{Result, must_env};

/// Vector-store backend (nearest-neighbor over an HTTP query API).
///
/// # Env
/// - `VECTOR_STORE_ENDPOINT` (required), e.g. the index's query base URL
/// - `VECTOR_STORE_API_KEY` (required)
/// - `VECTOR_STORE_INDEX` (required) target index name
#[derive(Debug, Clone)]
pub struct VectorStoreConfig {
    pub endpoint: String,
    pub api_key: String,
    pub index_name: String,
}

/// Hybrid keyword+vector search backend.
///
/// # Env
/// - `HYBRID_SEARCH_ENDPOINT` (required)
/// - `HYBRID_SEARCH_API_KEY` (optional)
#[derive(Debug, Clone)]
pub struct HybridSearchConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
}

/// Enterprise (managed) search backend.
///
/// # Env
/// - `SEARCH_SERVICE` (required) service name, expanded to
///   `https://{service}.search.windows.net`
/// - `SEARCH_KEY` (required)
/// - `SEARCH_API_VERSION` (optional, defaults to `2021-04-30-Preview`)
#[derive(Debug, Clone)]
pub struct EnterpriseSearchConfig {
    pub endpoint: String,
    pub api_key: String,
    pub api_version: String,
}

/// Connection configuration for every retrieval backend.
#[derive(Debug, Clone)]
pub struct IndexConfig {
    pub vector: VectorStoreConfig,
    pub hybrid: HybridSearchConfig,
    pub enterprise: EnterpriseSearchConfig,
}

impl IndexConfig {
    /// Loads all backend configs strictly from environment variables.
    ///
    /// # Errors
    /// Returns a config error when any required variable is missing.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            vector: VectorStoreConfig {
                endpoint: must_env("VECTOR_STORE_ENDPOINT")?,
                api_key: must_env("VECTOR_STORE_API_KEY")?,
                index_name: must_env("VECTOR_STORE_INDEX")?,
            },
            hybrid: HybridSearchConfig {
                endpoint: must_env("HYBRID_SEARCH_ENDPOINT")?,
                api_key: std::env::var("HYBRID_SEARCH_API_KEY")
                    .ok()
                    .filter(|s| !s.trim().is_empty()),
            },
            enterprise: EnterpriseSearchConfig {
                endpoint: format!(
                    "https://{}.search.windows.net",
                    must_env("SEARCH_SERVICE")?.trim()
                ),
                api_key: must_env("SEARCH_KEY")?,
                api_version: std::env::var("SEARCH_API_VERSION")
                    .ok()
                    .filter(|s| !s.trim().is_empty())
                    .unwrap_or_else(|| "2021-04-30-Preview".to_string()),
            },
        })
    }
}
