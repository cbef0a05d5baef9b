//! Per-record configuration overrides.

use llm_service::GenOptions;
use prompt_store::Strategy;
use serde::Deserialize;

/// Recognized per-record options, all optional on the wire.
///
/// Scoped to one record's processing only; defaults are applied by
/// [`Overrides::resolve`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Overrides {
    /// Retrieval count.
    pub top: Option<usize>,
    /// Chain strategy.
    #[serde(rename = "chainType")]
    pub chain_type: Option<Strategy>,
    /// LLM sampling temperature.
    pub temperature: Option<f32>,
    /// Max completion tokens.
    #[serde(rename = "tokenLength")]
    pub token_length: Option<u32>,
}

/// Overrides with defaults applied, fixed before any LLM call.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedOverrides {
    pub top_k: usize,
    pub strategy: Strategy,
    pub r#gen: GenOptions,
}

impl Overrides {
    /// Applies the documented defaults: `top=5`, `chainType=stuff`,
    /// `temperature=0.3`, `tokenLength=500`.
    pub fn resolve(&self) -> ResolvedOverrides {
        ResolvedOverrides {
            top_k: self.top.unwrap_or(5),
            strategy: self.chain_type.unwrap_or_default(),
            r#gen: GenOptions {
                temperature: self.temperature.unwrap_or(0.3),
                max_tokens: self.token_length.unwrap_or(500),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_contract() {
        let r = Overrides::default().resolve();
        assert_eq!(r.top_k, 5);
        assert_eq!(r.strategy, Strategy::Stuff);
        assert_eq!(r.r#gen.temperature, 0.3);
        assert_eq!(r.r#gen.max_tokens, 500);
    }

    #[test]
    fn wire_names_deserialize() {
        let o: Overrides = serde_json::from_str(
            r#"{"top":3,"chainType":"map_rerank","temperature":0.7,"tokenLength":256}"#,
        )
        .unwrap();
        let r = o.resolve();
        assert_eq!(r.top_k, 3);
        assert_eq!(r.strategy, Strategy::MapRerank);
        assert_eq!(r.r#gen.temperature, 0.7);
        assert_eq!(r.r#gen.max_tokens, 256);
    }

    #[test]
    fn same_chain_type_always_selects_the_same_strategy() {
        for raw in ["stuff", "map_reduce", "map_rerank", "refine"] {
            let json = format!(r#"{{"chainType":"{raw}"}}"#);
            let a: Overrides = serde_json::from_str(&json).unwrap();
            let b: Overrides = serde_json::from_str(&json).unwrap();
            assert_eq!(a.resolve().strategy, b.resolve().strategy);
        }
    }
}
