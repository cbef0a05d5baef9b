//! The two-stage SQL composition chain.

use std::sync::Arc;

use answer_chain::ComposedAnswer;
use llm_service::{CompletionModel, GenOptions};
use prompt_store::{SQL_QUERY_TEMPLATE, SQL_TABLE_SELECT_TEMPLATE};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use tracing::{debug, info, warn};

use crate::config::WarehouseConfig;
use crate::errors::SqlChainError;
use crate::schema::{TableSchema, load_catalog, parse_table_selection, render_table_info};

const DIALECT: &str = "postgresql";

/// Drives question-to-SQL composition against the warehouse.
pub struct SqlChain {
    llm: Arc<dyn CompletionModel>,
    cfg: WarehouseConfig,
}

impl SqlChain {
    pub fn new(llm: Arc<dyn CompletionModel>, cfg: WarehouseConfig) -> Self {
        Self { llm, cfg }
    }

    /// Answers one question via SQL. Never fails: any connect, generation,
    /// or execution error degrades to a payload with `error` populated and
    /// everything else empty.
    pub async fn answer(&self, question: &str, top_k: usize) -> ComposedAnswer {
        info!(top_k, "composing SQL answer");
        match self.run(question, top_k).await {
            Ok((answer, thoughts)) => ComposedAnswer {
                answer,
                thoughts,
                ..ComposedAnswer::default()
            },
            Err(e) => {
                warn!(error = %e, "SQL chain failed, degrading to error payload");
                ComposedAnswer::failed("warehouse", e)
            }
        }
    }

    async fn run(&self, question: &str, top_k: usize) -> Result<(String, String), SqlChainError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(&self.cfg.connection_url())
            .await?;

        let catalog = load_catalog(&pool).await?;
        debug!(tables = catalog.len(), "schema catalog loaded");

        // Stage 1: narrow the catalog to the tables the question needs.
        let table_names = catalog
            .iter()
            .map(|t| t.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let selection_prompt = SQL_TABLE_SELECT_TEMPLATE
            .render(&[("question", question), ("table_names", &table_names)])?;
        let opts = GenOptions {
            temperature: 0.0,
            max_tokens: 500,
        };
        let selection = self.llm.complete(&selection_prompt, opts).await?;

        let picked: Vec<TableSchema> = parse_table_selection(&selection, &catalog)
            .into_iter()
            .cloned()
            .collect();
        // An unparseable or empty selection falls back to the full catalog
        // rather than producing a query over nothing.
        let scoped = if picked.is_empty() { &catalog } else { &picked };
        let table_info = render_table_info(scoped);

        // Stage 2: write the query.
        let top_k_str = top_k.to_string();
        let query_prompt = SQL_QUERY_TEMPLATE.render(&[
            ("input", question),
            ("table_info", table_info.as_str()),
            ("dialect", DIALECT),
            ("top_k", top_k_str.as_str()),
        ])?;
        let generated = self.llm.complete(&query_prompt, opts).await?;
        let sql = extract_sql_query(&generated)?;
        info!(sql = %sql, "executing generated query");

        let result_text = execute_to_text(&pool, &sql).await?;

        // Fold the result back through the same frame for the final answer.
        let answer_prompt = format!(
            "{query_prompt}SQLQuery: {sql}\nSQLResult: {result_text}\nAnswer:"
        );
        let answer = self.llm.complete(&answer_prompt, opts).await?;

        let thoughts = format!(
            "<br><br>Tables:<br>{}<br><br>SQLQuery:<br>{sql}<br><br>SQLResult:<br>{result_text}",
            selection.trim()
        );
        Ok((answer.trim().to_string(), thoughts))
    }
}

/// Extracts the query text from the model's Question/SQLQuery/... output.
///
/// Tolerates a bare `SELECT` with no frame; everything else without a
/// `SQLQuery:` marker is rejected.
fn extract_sql_query(raw: &str) -> Result<String, SqlChainError> {
    if let Some(idx) = raw.find("SQLQuery:") {
        let after = &raw[idx + "SQLQuery:".len()..];
        let end = after.find("SQLResult").unwrap_or(after.len());
        let sql = after[..end].trim().trim_matches('"').trim();
        if sql.is_empty() {
            return Err(SqlChainError::MissingQuery);
        }
        return Ok(sql.to_string());
    }

    let trimmed = raw.trim().trim_matches('"').trim();
    if trimmed.to_lowercase().starts_with("select") {
        return Ok(trimmed.to_string());
    }
    Err(SqlChainError::MissingQuery)
}

/// Runs the query and renders every row as a tuple line.
async fn execute_to_text(pool: &PgPool, sql: &str) -> Result<String, SqlChainError> {
    let rows = sqlx::query(sql).fetch_all(pool).await?;
    debug!(rows = rows.len(), "query executed");

    let mut lines = Vec::with_capacity(rows.len());
    for row in &rows {
        let fields: Vec<String> = (0..row.columns().len())
            .map(|i| decode_column(row, i))
            .collect();
        lines.push(format!("({})", fields.join(", ")));
    }
    Ok(lines.join("\n"))
}

/// Best-effort scalar decoding for a dynamically typed result column.
fn decode_column(row: &sqlx::postgres::PgRow, idx: usize) -> String {
    if let Ok(v) = row.try_get::<Option<String>, _>(idx) {
        return v.unwrap_or_else(|| "NULL".to_string());
    }
    if let Ok(v) = row.try_get::<Option<i64>, _>(idx) {
        return v.map_or_else(|| "NULL".to_string(), |n| n.to_string());
    }
    if let Ok(v) = row.try_get::<Option<i32>, _>(idx) {
        return v.map_or_else(|| "NULL".to_string(), |n| n.to_string());
    }
    if let Ok(v) = row.try_get::<Option<f64>, _>(idx) {
        return v.map_or_else(|| "NULL".to_string(), |n| n.to_string());
    }
    if let Ok(v) = row.try_get::<Option<bool>, _>(idx) {
        return v.map_or_else(|| "NULL".to_string(), |b| b.to_string());
    }
    "?".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_query_from_full_frame() {
        let raw = "Question: \"How many orders?\"\nSQLQuery: \"SELECT COUNT(*) FROM orders\"\nSQLResult: \"42\"\nAnswer: \"42 orders\"";
        assert_eq!(
            extract_sql_query(raw).unwrap(),
            "SELECT COUNT(*) FROM orders"
        );
    }

    #[test]
    fn extracts_query_without_result_section() {
        let raw = "SQLQuery: SELECT total FROM orders LIMIT 5";
        assert_eq!(
            extract_sql_query(raw).unwrap(),
            "SELECT total FROM orders LIMIT 5"
        );
    }

    #[test]
    fn accepts_a_bare_select() {
        let raw = "select id from customers";
        assert_eq!(extract_sql_query(raw).unwrap(), "select id from customers");
    }

    #[test]
    fn rejects_output_without_a_query() {
        assert!(matches!(
            extract_sql_query("I cannot answer this."),
            Err(SqlChainError::MissingQuery)
        ));
        assert!(matches!(
            extract_sql_query("SQLQuery:\nSQLResult:"),
            Err(SqlChainError::MissingQuery)
        ));
    }
}
