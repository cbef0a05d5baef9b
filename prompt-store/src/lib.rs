//! Static prompt catalog for the QA gateway.
//!
//! This crate holds every prompt template the gateway renders: one primary
//! template set per chain [`Strategy`], the shared follow-up-questions
//! template, and the two SQL-chain templates. Templates are build-time
//! constants; rendering substitutes exact-match `{name}` placeholders and
//! fails on a missing variable instead of emitting a partial prompt.

mod catalog;
mod errors;
mod rerank;
mod strategy;
mod template;

pub use catalog::{FOLLOWUP_TEMPLATE, SQL_QUERY_TEMPLATE, SQL_TABLE_SELECT_TEMPLATE};
pub use errors::PromptError;
pub use rerank::{RankedAnswer, parse_ranked_answer};
pub use strategy::{Strategy, StrategyTemplates};
pub use template::PromptTemplate;
