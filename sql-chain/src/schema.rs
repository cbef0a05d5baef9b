//! Schema catalog: what the warehouse looks like, rendered for the model.

use std::collections::BTreeMap;

use sqlx::{PgPool, Row};

use crate::errors::SqlChainError;

/// One table's shape, as fed into the query-generation prompt.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TableSchema {
    pub name: String,
    pub columns: Vec<(String, String)>,
}

/// Enumerates the public tables and their columns from
/// `information_schema`.
pub(crate) async fn load_catalog(pool: &PgPool) -> Result<Vec<TableSchema>, SqlChainError> {
    let rows = sqlx::query(
        "SELECT table_name, column_name, data_type \
         FROM information_schema.columns \
         WHERE table_schema = 'public' \
         ORDER BY table_name, ordinal_position",
    )
    .fetch_all(pool)
    .await?;

    let mut tables: BTreeMap<String, Vec<(String, String)>> = BTreeMap::new();
    for row in rows {
        let table: String = row.try_get("table_name")?;
        let column: String = row.try_get("column_name")?;
        let data_type: String = row.try_get("data_type")?;
        tables.entry(table).or_default().push((column, data_type));
    }

    Ok(tables
        .into_iter()
        .map(|(name, columns)| TableSchema { name, columns })
        .collect())
}

/// Renders the `table_info` block: one `CREATE TABLE`-style stanza per
/// table.
pub(crate) fn render_table_info(tables: &[TableSchema]) -> String {
    tables
        .iter()
        .map(|t| {
            let cols = t
                .columns
                .iter()
                .map(|(name, ty)| format!("  {name} {ty}"))
                .collect::<Vec<_>>()
                .join(",\n");
            format!("CREATE TABLE {} (\n{cols}\n)", t.name)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Parses the model's comma-separated table selection, keeping only names
/// that actually exist in the catalog.
pub(crate) fn parse_table_selection<'a>(
    raw: &str,
    tables: &'a [TableSchema],
) -> Vec<&'a TableSchema> {
    let wanted: Vec<String> = raw
        .split(',')
        .map(|s| s.trim().trim_matches('"').to_lowercase())
        .filter(|s| !s.is_empty())
        .collect();

    tables
        .iter()
        .filter(|t| wanted.iter().any(|w| w == &t.name.to_lowercase()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<TableSchema> {
        vec![
            TableSchema {
                name: "orders".to_string(),
                columns: vec![
                    ("id".to_string(), "integer".to_string()),
                    ("total".to_string(), "numeric".to_string()),
                ],
            },
            TableSchema {
                name: "customers".to_string(),
                columns: vec![("id".to_string(), "integer".to_string())],
            },
        ]
    }

    #[test]
    fn table_info_renders_one_stanza_per_table() {
        let info = render_table_info(&catalog());
        assert!(info.contains("CREATE TABLE orders (\n  id integer,\n  total numeric\n)"));
        assert!(info.contains("CREATE TABLE customers"));
    }

    #[test]
    fn selection_parses_commas_and_ignores_unknown_names() {
        let tables = catalog();
        let picked = parse_table_selection("Orders, invoices , \"customers\"", &tables);
        let names: Vec<&str> = picked.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["orders", "customers"]);
    }

    #[test]
    fn empty_selection_yields_no_tables() {
        let tables = catalog();
        assert!(parse_table_selection("  ", &tables).is_empty());
    }
}
