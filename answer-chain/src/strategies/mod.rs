//! Fragment-combination pipelines, one module per strategy.
//!
//! Each pipeline takes the retrieved fragments and drives one or more
//! completion calls, strictly sequentially, returning the raw (pre-
//! normalization) answer text.

mod map_reduce;
mod map_rerank;
mod refine;
mod stuff;

use index_store::RetrievedFragment;
use llm_service::{CompletionModel, GenOptions};
use prompt_store::Strategy;
use tracing::debug;

use crate::errors::ChainError;

/// Runs the primary-answer pipeline for `strategy`.
pub(crate) async fn run_primary(
    llm: &dyn CompletionModel,
    strategy: Strategy,
    question: &str,
    fragments: &[RetrievedFragment],
    opts: GenOptions,
) -> Result<String, ChainError> {
    debug!(strategy = strategy.as_str(), fragments = fragments.len(), "running primary pipeline");
    match strategy {
        Strategy::Stuff => stuff::run(llm, question, fragments, opts).await,
        Strategy::MapReduce => map_reduce::run(llm, question, fragments, opts).await,
        Strategy::MapRerank => map_rerank::run(llm, question, fragments, opts).await,
        Strategy::Refine => refine::run(llm, question, fragments, opts).await,
    }
}

/// Renders one fragment as a context block: content plus its source line.
pub(crate) fn fragment_block(fragment: &RetrievedFragment) -> String {
    format!("Content: {}\nSource: {}", fragment.content, fragment.source_id)
}

/// Joins all fragment blocks into one summaries section.
pub(crate) fn joined_blocks(fragments: &[RetrievedFragment]) -> String {
    fragments
        .iter()
        .map(fragment_block)
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Joins the raw fragment contents, used for the prompt trace and the
/// follow-up context.
pub(crate) fn joined_contents(fragments: &[RetrievedFragment]) -> String {
    fragments
        .iter()
        .map(|f| f.content.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}
