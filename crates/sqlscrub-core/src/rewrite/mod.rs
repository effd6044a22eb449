//! Statement rewriters for `INSERT`, `WHERE` and `JOIN` content.

pub mod insert;
pub mod join;
pub mod where_clause;

use crate::scan::split_statements;

/// Applies `f` to every statement and rejoins the survivors with blank
/// lines. Statements mapped to an empty string are dropped.
fn for_each_statement(content: &str, mut f: impl FnMut(&str) -> String) -> String {
    split_statements(content)
        .iter()
        .map(|statement| f(statement))
        .filter(|rewritten| !rewritten.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}
