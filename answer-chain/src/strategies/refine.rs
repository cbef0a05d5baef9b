//! Refine pipeline: initial answer, then fold in one fragment at a time.

use index_store::RetrievedFragment;
use llm_service::{CompletionModel, GenOptions};
use prompt_store::Strategy;

use crate::errors::ChainError;
use crate::strategies::fragment_block;

pub(crate) async fn run(
    llm: &dyn CompletionModel,
    question: &str,
    fragments: &[RetrievedFragment],
    opts: GenOptions,
) -> Result<String, ChainError> {
    let templates = Strategy::Refine.templates();
    let refine = templates
        .secondary
        .expect("refine always has a refinement template");

    let initial_context = fragments.first().map(fragment_block).unwrap_or_default();
    let prompt = templates.primary.render(&[
        ("context_str", initial_context.as_str()),
        ("question", question),
    ])?;
    let mut answer = llm.complete(&prompt, opts).await?;

    for fragment in fragments.iter().skip(1) {
        let block = fragment_block(fragment);
        let prompt = refine.render(&[
            ("question", question),
            ("existing_answer", answer.trim()),
            ("context_str", block.as_str()),
        ])?;
        answer = llm.complete(&prompt, opts).await?;
    }

    Ok(answer)
}
