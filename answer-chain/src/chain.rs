//! The answer composition chain.
//!
//! Stages: resolve strategy → retrieve → render → complete(primary) →
//! complete(followup) → normalize → finalize. All stage failures are
//! converted at this boundary into a fail-soft [`ComposedAnswer`] carrying
//! a backend-labeled `error`; the same contract applies to every backend.

use std::sync::Arc;

use index_store::{IndexConfig, IndexKind, RetrievedFragment, Retriever, retriever_for};
use llm_service::{CompletionModel, EmbeddingModel, GenOptions};
use prompt_store::{FOLLOWUP_TEMPLATE, Strategy};
use tracing::{debug, info, warn};

use crate::answer::ComposedAnswer;
use crate::errors::ChainError;
use crate::normalize::{is_refusal, normalize_answer, normalize_followup};
use crate::overrides::Overrides;
use crate::strategies::{joined_contents, run_primary};

/// Approach selector for the retrieve-then-read chain; the other approaches
/// are recognized but unshipped.
const APPROACH_RTR: &str = "rtr";

/// Drives answer composition for one record at a time.
///
/// Holds the shared (read-only) collaborators; per-record state lives on
/// the stack of [`AnswerChain::answer`].
pub struct AnswerChain {
    llm: Arc<dyn CompletionModel>,
    embedder: Arc<dyn EmbeddingModel>,
    index_cfg: IndexConfig,
}

impl AnswerChain {
    pub fn new(
        llm: Arc<dyn CompletionModel>,
        embedder: Arc<dyn EmbeddingModel>,
        index_cfg: IndexConfig,
    ) -> Self {
        Self {
            llm,
            embedder,
            index_cfg,
        }
    }

    /// Composes the answer for one record. Never fails: unsupported
    /// approaches/backends yield the placeholder answer, and any stage
    /// error degrades to a `ComposedAnswer` with `error` populated.
    pub async fn answer(
        &self,
        question: &str,
        kind: &IndexKind,
        namespace: &str,
        approach: &str,
        overrides: &Overrides,
    ) -> ComposedAnswer {
        if approach != APPROACH_RTR {
            info!(approach, "approach not implemented, returning placeholder");
            return ComposedAnswer::not_implemented();
        }

        let resolved = overrides.resolve();
        info!(
            kind = %kind,
            namespace,
            strategy = resolved.strategy.as_str(),
            top_k = resolved.top_k,
            "composing answer"
        );

        let retriever = match retriever_for(kind, &self.index_cfg, self.embedder.clone()) {
            Ok(Some(r)) => r,
            Ok(None) => {
                info!(kind = %kind, "backend not implemented, returning placeholder");
                return ComposedAnswer::not_implemented();
            }
            Err(e) => {
                warn!(kind = %kind, error = %e, "retriever construction failed");
                return ComposedAnswer::failed(kind.label(), e);
            }
        };

        match compose_answer(
            self.llm.as_ref(),
            retriever.as_ref(),
            question,
            namespace,
            resolved.strategy,
            resolved.top_k,
            resolved.r#gen,
        )
        .await
        {
            Ok(answer) => answer,
            Err(e) => {
                warn!(kind = %kind, error = %e, "chain failed, degrading to error payload");
                ComposedAnswer::failed(kind.label(), e)
            }
        }
    }
}

/// Runs the composition stages against explicit collaborators.
///
/// Split out from [`AnswerChain`] so the pipeline is testable with
/// in-memory completion and retrieval fakes.
///
/// # Errors
/// Propagates retrieval, rendering, and completion failures; the caller
/// owns the fail-soft conversion.
pub async fn compose_answer(
    llm: &dyn CompletionModel,
    retriever: &dyn Retriever,
    question: &str,
    namespace: &str,
    strategy: Strategy,
    top_k: usize,
    opts: GenOptions,
) -> Result<ComposedAnswer, ChainError> {
    // Retrieve. An empty context is allowed; the model will typically
    // refuse, which the suppression rule then handles.
    let fragments = retriever.retrieve(question, namespace, top_k).await?;
    debug!(fragments = fragments.len(), "retrieval complete");

    // Diagnostic prompt trace: the primary template rendered over the raw
    // fragment contents. Never used to influence parsing.
    let thoughts = render_trace(strategy, question, &fragments)?;

    // Primary pass, then the independent follow-up pass, strictly in order.
    let raw_answer = run_primary(llm, strategy, question, &fragments, opts).await?;
    let raw_followup = run_followup(llm, &fragments, opts).await?;

    let answer = normalize_answer(&raw_answer);
    let mut next_questions = normalize_followup(&raw_followup);

    // A refusal must never carry fabricated citations or follow-ups.
    let mut sources = String::new();
    if is_refusal(&answer) {
        next_questions = String::new();
    } else if let Some(first) = fragments.first() {
        sources = format!("\n{}", first.source_id);
    }

    Ok(ComposedAnswer {
        data_points: fragments.iter().map(|f| f.content.clone()).collect(),
        answer,
        thoughts,
        sources,
        next_questions,
        error: String::new(),
    })
}

/// Follow-up pass: conditioned on the retrieved context, not the primary
/// answer.
async fn run_followup(
    llm: &dyn CompletionModel,
    fragments: &[RetrievedFragment],
    opts: GenOptions,
) -> Result<String, ChainError> {
    let context = joined_contents(fragments);
    let prompt = FOLLOWUP_TEMPLATE.render(&[("context", context.as_str())])?;
    Ok(llm.complete(&prompt, opts).await?)
}

/// Renders the human-readable prompt trace for the strategy's primary
/// template (newlines become `<br>` for display).
fn render_trace(
    strategy: Strategy,
    question: &str,
    fragments: &[RetrievedFragment],
) -> Result<String, ChainError> {
    let contents = joined_contents(fragments);
    let context_var = match strategy {
        Strategy::Stuff | Strategy::MapRerank => "summaries",
        Strategy::MapReduce => "context",
        Strategy::Refine => "context_str",
    };
    let rendered = strategy
        .templates()
        .primary
        .render(&[(context_var, contents.as_str()), ("question", question)])?;
    Ok(format!("<br><br>Prompt:<br>{}", rendered.replace('\n', "<br>")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use index_store::IndexError;
    use llm_service::LlmError;
    use std::sync::Mutex;

    /// Completion fake: pops scripted responses in order and records the
    /// prompts it saw.
    struct ScriptedLlm {
        responses: Mutex<Vec<String>>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedLlm {
        fn new<const N: usize>(responses: [&str; N]) -> Self {
            Self {
                responses: Mutex::new(responses.iter().rev().map(|s| s.to_string()).collect()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl CompletionModel for ScriptedLlm {
        async fn complete(&self, prompt: &str, _opts: GenOptions) -> Result<String, LlmError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(self
                .responses
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| "I don't know".to_string()))
        }
    }

    /// Retrieval fake returning preset fragments.
    struct FixedRetriever {
        fragments: Vec<RetrievedFragment>,
    }

    #[async_trait]
    impl Retriever for FixedRetriever {
        async fn retrieve(
            &self,
            _question: &str,
            _namespace: &str,
            top_k: usize,
        ) -> Result<Vec<RetrievedFragment>, IndexError> {
            Ok(self.fragments.iter().take(top_k).cloned().collect())
        }
    }

    fn fragment(content: &str, source: &str) -> RetrievedFragment {
        RetrievedFragment {
            content: content.to_string(),
            source_id: source.to_string(),
            score: Some(0.5),
        }
    }

    fn policy_fragments() -> Vec<RetrievedFragment> {
        vec![
            fragment("Refunds within 30 days", "policy.pdf"),
            fragment("Shipping takes 5 days", "shipping.pdf"),
            fragment("Support hours are 9-5", "support.pdf"),
        ]
    }

    #[tokio::test]
    async fn refusal_suppresses_sources_and_followups() {
        let llm = ScriptedLlm::new([
            "I don't know",
            "<<What is the shipping time?>> <<When is support open?>> <<Is there a warranty?>>",
        ]);
        let retriever = FixedRetriever {
            fragments: policy_fragments(),
        };

        let got = compose_answer(
            &llm,
            &retriever,
            "What is the gift-wrap policy?",
            "ns",
            Strategy::Stuff,
            3,
            GenOptions::default(),
        )
        .await
        .unwrap();

        assert!(got.answer.contains("I don't know"));
        assert_eq!(got.sources, "");
        assert_eq!(got.next_questions, "");
        assert_eq!(got.error, "");
        assert_eq!(got.data_points.len(), 3);
    }

    #[tokio::test]
    async fn answer_cites_exactly_the_top_fragment() {
        let llm = ScriptedLlm::new([
            "Answer: Refunds are honored within 30 days.\nSources: policy.pdf",
            "<<Can I exchange instead?>> <<Who pays return shipping?>> <<Is there a restocking fee?>>",
        ]);
        let retriever = FixedRetriever {
            fragments: policy_fragments(),
        };

        let got = compose_answer(
            &llm,
            &retriever,
            "What is the refund policy?",
            "ns",
            Strategy::Stuff,
            3,
            GenOptions::default(),
        )
        .await
        .unwrap();

        assert_eq!(
            got.answer,
            "Refunds are honored within 30 days.\nSOURCES: policy.pdf"
        );
        assert_eq!(got.sources, "\npolicy.pdf");
        assert!(got.next_questions.contains("<<Can I exchange instead?>>"));
        assert!(got.thoughts.starts_with("<br><br>Prompt:<br>"));
        assert!(got.thoughts.contains("Refunds within 30 days"));
    }

    #[tokio::test]
    async fn stuff_issues_one_primary_and_one_followup_call() {
        let llm = ScriptedLlm::new(["Some answer", "<<a?>> <<b?>> <<c?>>"]);
        let retriever = FixedRetriever {
            fragments: policy_fragments(),
        };

        compose_answer(
            &llm,
            &retriever,
            "q",
            "ns",
            Strategy::Stuff,
            3,
            GenOptions::default(),
        )
        .await
        .unwrap();

        assert_eq!(llm.calls(), 2);
    }

    #[tokio::test]
    async fn map_reduce_issues_n_map_calls_plus_reduce_plus_followup() {
        let llm = ScriptedLlm::new([
            "extract one",
            "extract two",
            "extract three",
            "Final combined answer.\nSOURCES: policy.pdf",
            "<<a?>> <<b?>> <<c?>>",
        ]);
        let retriever = FixedRetriever {
            fragments: policy_fragments(),
        };

        let got = compose_answer(
            &llm,
            &retriever,
            "q",
            "ns",
            Strategy::MapReduce,
            3,
            GenOptions::default(),
        )
        .await
        .unwrap();

        // 3 map + 1 reduce + 1 followup
        assert_eq!(llm.calls(), 5);
        assert_eq!(got.answer, "Final combined answer.\nSOURCES: policy.pdf");
    }

    #[tokio::test]
    async fn map_rerank_picks_the_highest_score() {
        let llm = ScriptedLlm::new([
            "Weak guess.\nScore: 20",
            "Refunds within 30 days.\nScore: 95",
            "Unrelated.\nScore: 5",
            "<<a?>> <<b?>> <<c?>>",
        ]);
        let retriever = FixedRetriever {
            fragments: policy_fragments(),
        };

        let got = compose_answer(
            &llm,
            &retriever,
            "q",
            "ns",
            Strategy::MapRerank,
            3,
            GenOptions::default(),
        )
        .await
        .unwrap();

        assert_eq!(got.answer, "Refunds within 30 days.");
        assert_eq!(llm.calls(), 4);
    }

    #[tokio::test]
    async fn refine_folds_each_remaining_fragment() {
        let llm = ScriptedLlm::new([
            "Initial answer",
            "Refined once",
            "Refined twice",
            "<<a?>> <<b?>> <<c?>>",
        ]);
        let retriever = FixedRetriever {
            fragments: policy_fragments(),
        };

        let got = compose_answer(
            &llm,
            &retriever,
            "q",
            "ns",
            Strategy::Refine,
            3,
            GenOptions::default(),
        )
        .await
        .unwrap();

        // 1 initial + 2 refine + 1 followup
        assert_eq!(llm.calls(), 4);
        assert_eq!(got.answer, "Refined twice");
    }

    #[tokio::test]
    async fn synthetic_no_results_fragment_flows_through() {
        let llm = ScriptedLlm::new(["I don't know", "<<a?>> <<b?>> <<c?>>"]);
        let retriever = FixedRetriever {
            fragments: vec![RetrievedFragment::no_results()],
        };

        let got = compose_answer(
            &llm,
            &retriever,
            "q",
            "ns",
            Strategy::Stuff,
            3,
            GenOptions::default(),
        )
        .await
        .unwrap();

        assert_eq!(got.data_points, vec!["No results found".to_string()]);
        assert_eq!(got.sources, "");
        assert_eq!(got.error, "");
    }

    #[tokio::test]
    async fn empty_retrieval_does_not_panic_or_cite() {
        let llm = ScriptedLlm::new(["Some text", "<<a?>> <<b?>> <<c?>>"]);
        let retriever = FixedRetriever { fragments: vec![] };

        let got = compose_answer(
            &llm,
            &retriever,
            "q",
            "ns",
            Strategy::Stuff,
            3,
            GenOptions::default(),
        )
        .await
        .unwrap();

        assert_eq!(got.sources, "");
        assert!(got.data_points.is_empty());
    }
}
