//! Natural-language-to-SQL chain for the QA gateway.
//!
//! Two-stage flow over a Postgres warehouse: the model first picks the
//! relevant tables from the schema catalog, then writes a query in the
//! Question/SQLQuery/SQLResult/Answer frame. The query is executed with
//! `sqlx` and the result is folded back into a final answer, with every
//! intermediate step preserved as a reasoning trace.
//!
//! Like the answer chain, this component never lets a failure escape: any
//! connect, generation, or execution error degrades to a payload with a
//! populated `error` field.

mod chain;
mod config;
mod errors;
mod schema;

pub use chain::SqlChain;
pub use config::WarehouseConfig;
pub use errors::SqlChainError;
