//! Shared LLM service for the QA gateway.
//!
//! Provides thin, non-streaming clients for text completion and embeddings
//! over two providers (Azure OpenAI and vanilla OpenAI), a profile facade
//! that caches HTTP clients per config, lightweight health probes, and
//! unified error types. Construct [`LlmServiceProfiles`] once, wrap it in
//! `Arc`, and pass clones to dependents.

pub mod config;
pub mod error_handler;
pub mod health_service;
pub mod service_profiles;
pub mod services;

mod completion;

pub use completion::{CompletionModel, EmbeddingModel, GenOptions};
pub use config::llm_model_config::LlmModelConfig;
pub use config::llm_provider::LlmProvider;
pub use error_handler::{LlmError, Result};
pub use service_profiles::LlmServiceProfiles;
