//! Answer composition engine for the QA gateway.
//!
//! Given a question, a chain [`Strategy`](prompt_store::Strategy), and a
//! retrieval backend, this crate drives the LLM calls that turn retrieved
//! fragments into a [`ComposedAnswer`]: primary answer, top-fragment
//! citation, up to three follow-up questions, and a human-readable prompt
//! trace. It also implements the batch record protocol with per-record
//! error isolation.
//!
//! Failure contract: every retrieval or completion failure inside a record
//! is converted into a `ComposedAnswer` whose `error` field carries a
//! backend-labeled message. Nothing escapes a record except through the
//! batch processor's own safety net.

mod answer;
mod batch;
mod chain;
mod errors;
mod normalize;
mod overrides;
mod strategies;

pub use answer::ComposedAnswer;
pub use batch::{
    BatchEnvelope, BatchRecord, OutputRecord, RecordData, RecordError, ResponseEnvelope, process,
};
pub use chain::{AnswerChain, compose_answer};
pub use errors::ChainError;
pub use overrides::{Overrides, ResolvedOverrides};
