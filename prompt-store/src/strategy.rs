//! Chain strategy enumeration and its template table.

use serde::{Deserialize, Serialize};

use crate::catalog::{
    MAP_REDUCE_COMBINE_TEMPLATE, MAP_REDUCE_QUESTION_TEMPLATE, MAP_RERANK_TEMPLATE,
    REFINE_INITIAL_TEMPLATE, REFINE_STEP_TEMPLATE, STUFF_TEMPLATE,
};
use crate::template::PromptTemplate;

/// Fragment-combination strategy for the answer chain.
///
/// Selected once per record from the caller's overrides and fixed before any
/// LLM call is issued. Each variant maps to a fixed set of templates via
/// [`Strategy::templates`], so the pairing is exhaustive at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// One combined prompt listing all fragments.
    #[default]
    Stuff,
    /// Per-fragment extraction then a combine pass.
    MapReduce,
    /// Per-fragment scored answers; highest score wins.
    MapRerank,
    /// Initial answer folded through each remaining fragment.
    Refine,
}

/// Template set for one strategy.
///
/// `primary` renders the first (or only) completion prompt; `secondary` is
/// the combine prompt for map-reduce and the refinement prompt for refine.
#[derive(Debug, Clone, Copy)]
pub struct StrategyTemplates {
    pub primary: PromptTemplate,
    pub secondary: Option<PromptTemplate>,
}

impl Strategy {
    /// Returns the fixed template set for this strategy.
    pub fn templates(&self) -> StrategyTemplates {
        match self {
            Strategy::Stuff => StrategyTemplates {
                primary: STUFF_TEMPLATE,
                secondary: None,
            },
            Strategy::MapReduce => StrategyTemplates {
                primary: MAP_REDUCE_QUESTION_TEMPLATE,
                secondary: Some(MAP_REDUCE_COMBINE_TEMPLATE),
            },
            Strategy::MapRerank => StrategyTemplates {
                primary: MAP_RERANK_TEMPLATE,
                secondary: None,
            },
            Strategy::Refine => StrategyTemplates {
                primary: REFINE_INITIAL_TEMPLATE,
                secondary: Some(REFINE_STEP_TEMPLATE),
            },
        }
    }

    /// Wire label used in overrides and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Stuff => "stuff",
            Strategy::MapReduce => "map_reduce",
            Strategy::MapRerank => "map_rerank",
            Strategy::Refine => "refine",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_values_round_trip() {
        for (raw, want) in [
            ("\"stuff\"", Strategy::Stuff),
            ("\"map_reduce\"", Strategy::MapReduce),
            ("\"map_rerank\"", Strategy::MapRerank),
            ("\"refine\"", Strategy::Refine),
        ] {
            let got: Strategy = serde_json::from_str(raw).unwrap();
            assert_eq!(got, want);
            assert_eq!(serde_json::to_string(&got).unwrap(), raw);
        }
    }

    #[test]
    fn template_selection_is_stable() {
        // Same strategy value always yields the same template set.
        let a = Strategy::MapReduce.templates();
        let b = Strategy::MapReduce.templates();
        assert_eq!(a.primary.text, b.primary.text);
        assert_eq!(
            a.secondary.map(|t| t.text),
            b.secondary.map(|t| t.text)
        );
    }

    #[test]
    fn two_phase_strategies_carry_a_secondary_template() {
        assert!(Strategy::Stuff.templates().secondary.is_none());
        assert!(Strategy::MapRerank.templates().secondary.is_none());
        assert!(Strategy::MapReduce.templates().secondary.is_some());
        assert!(Strategy::Refine.templates().secondary.is_some());
    }

    #[test]
    fn stuff_template_declares_summaries_and_question() {
        let t = Strategy::Stuff.templates().primary;
        assert_eq!(t.variables, &["summaries", "question"]);
        assert!(t.text.contains("I don't know"));
        assert!(t.text.contains("SOURCES"));
    }
}
