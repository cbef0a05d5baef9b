//! Enterprise search backend (managed search index).
//!
//! POSTs a plain-text query against
//! `{endpoint}/indexes/{namespace}/docs/search?api-version={v}`. Zero hits
//! are not an error: the retriever yields a single synthetic fragment with
//! content "No results found" so downstream logic always has at least one
//! fragment to reason over.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::backends::{http_client, status_error};
use crate::config::EnterpriseSearchConfig;
use crate::errors::IndexError;
use crate::record::RetrievedFragment;
use crate::retriever::Retriever;

/// Retriever over the enterprise search service. Needs no embedder; the
/// service ranks by its own relevance model.
pub struct EnterpriseSearchRetriever {
    client: reqwest::Client,
    cfg: EnterpriseSearchConfig,
}

impl EnterpriseSearchRetriever {
    /// Creates the retriever; validates the endpoint scheme.
    pub fn new(cfg: EnterpriseSearchConfig) -> Result<Self, IndexError> {
        if !(cfg.endpoint.starts_with("http://") || cfg.endpoint.starts_with("https://")) {
            return Err(IndexError::Config(format!(
                "enterprise search endpoint must be http(s): {}",
                cfg.endpoint
            )));
        }
        Ok(Self {
            client: http_client(30)?,
            cfg,
        })
    }
}

#[async_trait]
impl Retriever for EnterpriseSearchRetriever {
    async fn retrieve(
        &self,
        question: &str,
        namespace: &str,
        top_k: usize,
    ) -> Result<Vec<RetrievedFragment>, IndexError> {
        debug!(namespace, top_k, "enterprise search query");

        let url = format!(
            "{}/indexes/{}/docs/search?api-version={}",
            self.cfg.endpoint.trim_end_matches('/'),
            namespace,
            self.cfg.api_version
        );
        let body = SearchRequest {
            search: question,
            top: top_k,
        };

        let resp = self
            .client
            .post(&url)
            .header("api-key", &self.cfg.api_key)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(status_error(resp, &url).await);
        }

        let out: SearchResponse = resp.json().await?;
        let fragments = map_docs(out, top_k);
        info!(hits = fragments.len(), namespace, "enterprise retrieval done");
        Ok(fragments)
    }
}

/// Maps search documents into fragments; empty result sets become the
/// single synthetic "No results found" fragment.
fn map_docs(resp: SearchResponse, top_k: usize) -> Vec<RetrievedFragment> {
    if resp.value.is_empty() {
        return vec![RetrievedFragment::no_results()];
    }
    resp.value
        .into_iter()
        .take(top_k)
        .map(|doc| RetrievedFragment {
            content: doc.content.unwrap_or_default(),
            source_id: doc.sourcefile.unwrap_or_default(),
            score: doc.score,
        })
        .collect()
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    search: &'a str,
    top: usize,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    value: Vec<SearchDoc>,
}

#[derive(Debug, Deserialize)]
struct SearchDoc {
    content: Option<String>,
    sourcefile: Option<String>,
    #[serde(rename = "@search.score")]
    score: Option<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_hits_yield_the_synthetic_fragment() {
        let resp: SearchResponse = serde_json::from_str(r#"{"value":[]}"#).unwrap();
        let got = map_docs(resp, 5);
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].content, "No results found");
        assert_eq!(got[0].source_id, "");
    }

    #[test]
    fn maps_documents_with_source_and_score() {
        let resp: SearchResponse = serde_json::from_str(
            r#"{"value":[{"content":"Refunds within 30 days","sourcefile":"policy.pdf","@search.score":1.7}]}"#,
        )
        .unwrap();
        let got = map_docs(resp, 5);
        assert_eq!(got[0].source_id, "policy.pdf");
        assert_eq!(got[0].score, Some(1.7));
    }
}
