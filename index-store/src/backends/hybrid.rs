//! Hybrid keyword+vector backend.
//!
//! Issues a combined query (raw question text plus its embedding) against a
//! named index partition. Each hit carries `content`, a `vector_score`, and
//! a `metadata` JSON string; the fragment's source identifier is recovered
//! from that metadata and a parse failure is a hard
//! [`IndexError::MalformedMetadata`].

use std::sync::Arc;

use async_trait::async_trait;
use llm_service::EmbeddingModel;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::backends::{http_client, status_error};
use crate::config::HybridSearchConfig;
use crate::errors::IndexError;
use crate::record::RetrievedFragment;
use crate::retriever::Retriever;

/// Keyword+vector retriever over the hybrid search index.
pub struct HybridSearchRetriever {
    client: reqwest::Client,
    cfg: HybridSearchConfig,
    embedder: Arc<dyn EmbeddingModel>,
}

impl HybridSearchRetriever {
    /// Creates the retriever; validates the endpoint scheme.
    pub fn new(
        cfg: HybridSearchConfig,
        embedder: Arc<dyn EmbeddingModel>,
    ) -> Result<Self, IndexError> {
        if !(cfg.endpoint.starts_with("http://") || cfg.endpoint.starts_with("https://")) {
            return Err(IndexError::Config(format!(
                "hybrid search endpoint must be http(s): {}",
                cfg.endpoint
            )));
        }
        Ok(Self {
            client: http_client(30)?,
            cfg,
            embedder,
        })
    }
}

#[async_trait]
impl Retriever for HybridSearchRetriever {
    async fn retrieve(
        &self,
        question: &str,
        namespace: &str,
        top_k: usize,
    ) -> Result<Vec<RetrievedFragment>, IndexError> {
        let vector = self.embedder.embed(question).await?;
        debug!(namespace, top_k, "hybrid search query");

        let url = format!("{}/search", self.cfg.endpoint.trim_end_matches('/'));
        let body = SearchRequest {
            index: namespace,
            query: question,
            vector: &vector,
            vector_field: "content_vector",
            top_k,
            return_fields: &["metadata", "content", "vector_score"],
        };

        let mut req = self.client.post(&url).json(&body);
        if let Some(key) = &self.cfg.api_key {
            req = req.header("Authorization", format!("Bearer {key}"));
        }
        let resp = req.send().await?;

        if !resp.status().is_success() {
            return Err(status_error(resp, &url).await);
        }

        let out: SearchResponse = resp.json().await?;
        let fragments = map_hits(out, top_k)?;
        info!(hits = fragments.len(), namespace, "hybrid retrieval done");
        Ok(fragments)
    }
}

/// Maps hybrid hits into fragments, parsing each hit's metadata JSON.
///
/// # Errors
/// Returns [`IndexError::MalformedMetadata`] when a hit's metadata string is
/// not valid JSON or lacks a string `source` field.
fn map_hits(resp: SearchResponse, top_k: usize) -> Result<Vec<RetrievedFragment>, IndexError> {
    resp.results
        .into_iter()
        .take(top_k)
        .map(|hit| {
            let meta: serde_json::Value = serde_json::from_str(&hit.metadata)
                .map_err(|e| IndexError::MalformedMetadata(format!("{e}: {}", hit.metadata)))?;
            let source_id = meta
                .get("source")
                .and_then(|v| v.as_str())
                .ok_or_else(|| {
                    IndexError::MalformedMetadata(format!(
                        "metadata has no string `source`: {}",
                        hit.metadata
                    ))
                })?
                .to_string();
            Ok(RetrievedFragment {
                content: hit.content,
                source_id,
                score: hit.vector_score,
            })
        })
        .collect()
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    index: &'a str,
    query: &'a str,
    vector: &'a [f32],
    vector_field: &'a str,
    top_k: usize,
    return_fields: &'a [&'a str],
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    content: String,
    /// JSON-encoded metadata string, as stored alongside the vector.
    metadata: String,
    vector_score: Option<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resp(json: &str) -> SearchResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn recovers_source_from_metadata_json() {
        let got = map_hits(
            resp(
                r#"{"results":[{"content":"Refunds within 30 days","metadata":"{\"source\":\"policy.pdf\"}","vector_score":0.42}]}"#,
            ),
            5,
        )
        .unwrap();
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].source_id, "policy.pdf");
        assert_eq!(got[0].score, Some(0.42));
    }

    #[test]
    fn malformed_metadata_is_an_error() {
        let err = map_hits(
            resp(r#"{"results":[{"content":"x","metadata":"not-json","vector_score":null}]}"#),
            5,
        )
        .unwrap_err();
        assert!(matches!(err, IndexError::MalformedMetadata(_)));
    }

    #[test]
    fn metadata_without_source_is_an_error() {
        let err = map_hits(
            resp(r#"{"results":[{"content":"x","metadata":"{\"id\":1}","vector_score":null}]}"#),
            5,
        )
        .unwrap_err();
        assert!(matches!(err, IndexError::MalformedMetadata(_)));
    }
}
