//! "Stuff" pipeline: one combined prompt over every fragment.

use index_store::RetrievedFragment;
use llm_service::{CompletionModel, GenOptions};
use prompt_store::Strategy;

use crate::errors::ChainError;
use crate::strategies::joined_blocks;

pub(crate) async fn run(
    llm: &dyn CompletionModel,
    question: &str,
    fragments: &[RetrievedFragment],
    opts: GenOptions,
) -> Result<String, ChainError> {
    let summaries = joined_blocks(fragments);
    let prompt = Strategy::Stuff
        .templates()
        .primary
        .render(&[("summaries", summaries.as_str()), ("question", question)])?;
    Ok(llm.complete(&prompt, opts).await?)
}
