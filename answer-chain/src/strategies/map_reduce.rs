//! Map-reduce pipeline: per-fragment extraction, then one combine pass.

use index_store::RetrievedFragment;
use llm_service::{CompletionModel, GenOptions};
use prompt_store::Strategy;

use crate::errors::ChainError;

pub(crate) async fn run(
    llm: &dyn CompletionModel,
    question: &str,
    fragments: &[RetrievedFragment],
    opts: GenOptions,
) -> Result<String, ChainError> {
    let templates = Strategy::MapReduce.templates();
    let combine = templates
        .secondary
        .expect("map_reduce always has a combine template");

    // Map phase: extract whatever each fragment contributes.
    let mut extracts = Vec::with_capacity(fragments.len());
    for fragment in fragments {
        let prompt = templates.primary.render(&[
            ("context", fragment.content.as_str()),
            ("question", question),
        ])?;
        let extract = llm.complete(&prompt, opts).await?;
        let trimmed = extract.trim();
        if !trimmed.is_empty() {
            extracts.push(format!("{trimmed}\nSource: {}", fragment.source_id));
        }
    }

    // Reduce phase: synthesize a final sourced answer from the extracts.
    let summaries = extracts.join("\n\n");
    let prompt = combine.render(&[("summaries", summaries.as_str()), ("question", question)])?;
    Ok(llm.complete(&prompt, opts).await?)
}
