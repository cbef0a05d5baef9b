//! Retrieval adapter: a uniform interface over three search backends.
//!
//! The chains only see [`Retriever`]: `retrieve(question, namespace, top_k)`
//! returning ranked [`RetrievedFragment`]s. The backend is selected by the
//! request's [`IndexKind`] discriminator; unsupported kinds are surfaced to
//! the caller as `None` from [`retriever_for`] so the chain can answer with
//! a structured placeholder instead of failing the record.

mod backends;
mod config;
mod errors;
mod kind;
mod record;
mod retriever;

pub use backends::enterprise::EnterpriseSearchRetriever;
pub use backends::hybrid::HybridSearchRetriever;
pub use backends::vector::VectorStoreRetriever;
pub use config::{EnterpriseSearchConfig, HybridSearchConfig, IndexConfig, VectorStoreConfig};
pub use errors::IndexError;
pub use kind::IndexKind;
pub use record::RetrievedFragment;
pub use retriever::{Retriever, retriever_for};
