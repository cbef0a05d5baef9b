//! Vector-store backend: nearest-neighbor search over an HTTP query API.
//!
//! Embeds the question, then POSTs `{endpoint}/query` with the query vector
//! scoped to `namespace`. Matches carry their text and source identifier in
//! the metadata object.

use std::sync::Arc;

use async_trait::async_trait;
use llm_service::EmbeddingModel;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::backends::{http_client, status_error};
use crate::config::VectorStoreConfig;
use crate::errors::IndexError;
use crate::record::RetrievedFragment;
use crate::retriever::Retriever;

/// Nearest-neighbor retriever over the vector store's query API.
pub struct VectorStoreRetriever {
    client: reqwest::Client,
    cfg: VectorStoreConfig,
    embedder: Arc<dyn EmbeddingModel>,
}

impl VectorStoreRetriever {
    /// Creates the retriever; validates the endpoint scheme.
    pub fn new(
        cfg: VectorStoreConfig,
        embedder: Arc<dyn EmbeddingModel>,
    ) -> Result<Self, IndexError> {
        if !(cfg.endpoint.starts_with("http://") || cfg.endpoint.starts_with("https://")) {
            return Err(IndexError::Config(format!(
                "vector store endpoint must be http(s): {}",
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
impl Retriever for VectorStoreRetriever {
    async fn retrieve(
        &self,
        question: &str,
        namespace: &str,
        top_k: usize,
    ) -> Result<Vec<RetrievedFragment>, IndexError> {
        let vector = self.embedder.embed(question).await?;
        debug!(
            namespace,
            top_k,
            dim = vector.len(),
            "vector store query"
        );

        let url = format!("{}/query", self.cfg.endpoint.trim_end_matches('/'));
        let body = QueryRequest {
            namespace,
            top_k,
            include_metadata: true,
            vector: &vector,
        };

        let resp = self
            .client
            .post(&url)
            .header("Api-Key", &self.cfg.api_key)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(status_error(resp, &url).await);
        }

        let out: QueryResponse = resp.json().await?;
        let fragments = map_matches(out, top_k);
        info!(hits = fragments.len(), namespace, "vector store retrieval done");
        Ok(fragments)
    }
}

/// Maps the query response into ranked fragments, capped at `top_k`.
fn map_matches(resp: QueryResponse, top_k: usize) -> Vec<RetrievedFragment> {
    resp.matches
        .into_iter()
        .take(top_k)
        .map(|m| {
            let metadata = m.metadata.unwrap_or_default();
            RetrievedFragment {
                content: metadata.text.unwrap_or_default(),
                source_id: metadata.source.unwrap_or(m.id),
                score: m.score,
            }
        })
        .collect()
}

#[derive(Debug, Serialize)]
struct QueryRequest<'a> {
    namespace: &'a str,
    #[serde(rename = "topK")]
    top_k: usize,
    #[serde(rename = "includeMetadata")]
    include_metadata: bool,
    vector: &'a [f32],
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

#[derive(Debug, Deserialize)]
struct QueryMatch {
    id: String,
    score: Option<f32>,
    metadata: Option<MatchMetadata>,
}

#[derive(Debug, Default, Deserialize)]
struct MatchMetadata {
    text: Option<String>,
    source: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_matches_in_rank_order() {
        let resp: QueryResponse = serde_json::from_str(
            r#"{"matches":[
                {"id":"a","score":0.9,"metadata":{"text":"first","source":"doc-a.pdf"}},
                {"id":"b","score":0.5,"metadata":{"text":"second","source":"doc-b.pdf"}}
            ]}"#,
        )
        .unwrap();
        let got = map_matches(resp, 5);
        assert_eq!(got.len(), 2);
        assert_eq!(got[0].content, "first");
        assert_eq!(got[0].source_id, "doc-a.pdf");
        assert_eq!(got[0].score, Some(0.9));
        assert_eq!(got[1].source_id, "doc-b.pdf");
    }

    #[test]
    fn caps_at_top_k() {
        let resp: QueryResponse = serde_json::from_str(
            r#"{"matches":[
                {"id":"a","score":0.9,"metadata":{"text":"1","source":"s1"}},
                {"id":"b","score":0.8,"metadata":{"text":"2","source":"s2"}},
                {"id":"c","score":0.7,"metadata":{"text":"3","source":"s3"}}
            ]}"#,
        )
        .unwrap();
        assert_eq!(map_matches(resp, 2).len(), 2);
    }

    #[test]
    fn falls_back_to_match_id_when_source_absent() {
        let resp: QueryResponse =
            serde_json::from_str(r#"{"matches":[{"id":"frag-7","metadata":{"text":"t"}}]}"#)
                .unwrap();
        let got = map_matches(resp, 5);
        assert_eq!(got[0].source_id, "frag-7");
        assert_eq!(got[0].score, None);
    }
}
