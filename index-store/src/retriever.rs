//! The retrieval seam and backend dispatch.

use std::sync::Arc;

use async_trait::async_trait;
use llm_service::EmbeddingModel;
use tracing::debug;

use crate::backends::{
    enterprise::EnterpriseSearchRetriever, hybrid::HybridSearchRetriever,
    vector::VectorStoreRetriever,
};
use crate::config::IndexConfig;
use crate::errors::IndexError;
use crate::kind::IndexKind;
use crate::record::RetrievedFragment;

/// Uniform retrieval contract over all backends.
///
/// Returns at most `top_k` fragments, ranked by relevance descending.
#[async_trait]
pub trait Retriever: Send + Sync {
    async fn retrieve(
        &self,
        question: &str,
        namespace: &str,
        top_k: usize,
    ) -> Result<Vec<RetrievedFragment>, IndexError>;
}

/// Builds the retriever for a backend kind.
///
/// Returns `None` for kinds without an implementation (`milvus`, unknown
/// discriminators); the caller degrades to a placeholder answer rather
/// than failing the record.
pub fn retriever_for(
    kind: &IndexKind,
    cfg: &IndexConfig,
    embedder: Arc<dyn EmbeddingModel>,
) -> Result<Option<Box<dyn Retriever>>, IndexError> {
    debug!(kind = %kind, "resolving retriever");
    match kind {
        IndexKind::Pinecone => Ok(Some(Box::new(VectorStoreRetriever::new(
            cfg.vector.clone(),
            embedder,
        )?))),
        IndexKind::Redis => Ok(Some(Box::new(HybridSearchRetriever::new(
            cfg.hybrid.clone(),
            embedder,
        )?))),
        IndexKind::CogSearch => Ok(Some(Box::new(EnterpriseSearchRetriever::new(
            cfg.enterprise.clone(),
        )?))),
        IndexKind::Milvus | IndexKind::Unsupported(_) => Ok(None),
    }
}
