//! Retrieval data model.

/// One retrieved unit of source text, ranked by relevance.
///
/// Produced by a backend and owned by the call that produced it; the gateway
/// never persists fragments.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievedFragment {
    /// Fragment text fed into the prompt context.
    pub content: String,
    /// Identifier of the originating document (empty for synthetic hits).
    pub source_id: String,
    /// Backend similarity score, when the backend reports one.
    pub score: Option<f32>,
}

impl RetrievedFragment {
    /// Synthetic fragment used when a backend legitimately finds nothing,
    /// so downstream logic always has at least one fragment to reason over.
    pub fn no_results() -> Self {
        Self {
            content: "No results found".to_string(),
            source_id: String::new(),
            score: None,
        }
    }
}
