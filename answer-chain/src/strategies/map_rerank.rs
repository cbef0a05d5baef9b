//! Map-rerank pipeline: score every fragment's answer, keep the best.

use index_store::RetrievedFragment;
use llm_service::{CompletionModel, GenOptions};
use prompt_store::{RankedAnswer, Strategy, parse_ranked_answer};
use tracing::warn;

use crate::errors::ChainError;
use crate::strategies::fragment_block;

pub(crate) async fn run(
    llm: &dyn CompletionModel,
    question: &str,
    fragments: &[RetrievedFragment],
    opts: GenOptions,
) -> Result<String, ChainError> {
    let template = Strategy::MapRerank.templates().primary;

    let mut best: Option<RankedAnswer> = None;
    let mut first_raw: Option<String> = None;

    for fragment in fragments {
        let block = fragment_block(fragment);
        let prompt = template.render(&[("summaries", block.as_str()), ("question", question)])?;
        let raw = llm.complete(&prompt, opts).await?;

        match parse_ranked_answer(&raw) {
            Ok(ranked) => {
                if best.as_ref().is_none_or(|b| ranked.score > b.score) {
                    best = Some(ranked);
                }
            }
            Err(e) => {
                warn!(error = %e, source = %fragment.source_id, "unscored rerank output, skipping");
                if first_raw.is_none() {
                    first_raw = Some(raw);
                }
            }
        }
    }

    // No fragment produced a scored answer: fall back to the first raw
    // output so the record still carries the model's text.
    Ok(best
        .map(|b| b.answer)
        .or(first_raw)
        .unwrap_or_default())
}
