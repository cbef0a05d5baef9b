//! Backend discriminator.

use std::fmt;

/// Which retrieval backend a request targets.
///
/// Parsed from the `indexType` query parameter. Unknown values are kept
/// verbatim in [`IndexKind::Unsupported`] so the chain can answer with a
/// structured placeholder instead of rejecting the batch item. Planned but
/// unshipped backends (`milvus`) take the same path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexKind {
    /// Vector-store nearest-neighbor search.
    Pinecone,
    /// Hybrid keyword+vector search index.
    Redis,
    /// Enterprise (managed) search index.
    CogSearch,
    /// Recognized but not implemented.
    Milvus,
    /// Anything else seen on the wire.
    Unsupported(String),
}

impl IndexKind {
    /// Parses the wire discriminator. Never fails.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pinecone" => IndexKind::Pinecone,
            "redis" => IndexKind::Redis,
            "cogsearch" => IndexKind::CogSearch,
            "milvus" => IndexKind::Milvus,
            _ => IndexKind::Unsupported(raw.to_string()),
        }
    }

    /// Label used as the prefix of fail-soft error messages.
    pub fn label(&self) -> &str {
        match self {
            IndexKind::Pinecone => "pinecone",
            IndexKind::Redis => "redis",
            IndexKind::CogSearch => "cogsearch",
            IndexKind::Milvus => "milvus",
            IndexKind::Unsupported(raw) => raw,
        }
    }

    /// Whether a retriever implementation exists for this kind.
    pub fn is_implemented(&self) -> bool {
        matches!(
            self,
            IndexKind::Pinecone | IndexKind::Redis | IndexKind::CogSearch
        )
    }
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_kinds() {
        assert_eq!(IndexKind::parse("pinecone"), IndexKind::Pinecone);
        assert_eq!(IndexKind::parse("Redis"), IndexKind::Redis);
        assert_eq!(IndexKind::parse("cogsearch"), IndexKind::CogSearch);
        assert_eq!(IndexKind::parse("milvus"), IndexKind::Milvus);
    }

    #[test]
    fn keeps_unknown_values_verbatim() {
        match IndexKind::parse("weaviate") {
            IndexKind::Unsupported(raw) => assert_eq!(raw, "weaviate"),
            other => panic!("unexpected kind: {other:?}"),
        }
    }

    #[test]
    fn milvus_is_recognized_but_unimplemented() {
        assert!(!IndexKind::Milvus.is_implemented());
        assert!(IndexKind::Pinecone.is_implemented());
    }
}
