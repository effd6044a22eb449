//! Table alias discovery, scoped to a single statement.

use crate::patterns::compile;

/// Identifiers that can follow a table name without being an alias.
const CLAUSE_WORDS: &[&str] = &[
    "on", "where", "join", "inner", "left", "right", "full", "cross", "outer", "group", "order",
    "having", "limit", "union", "set", "values", "using",
];

/// Finds aliases bound to `table` via `FROM`/`JOIN` clauses in one
/// statement: `FROM|JOIN [schema.]table [AS] alias`.
///
/// Aliases are returned lowercase in occurrence order; duplicates are kept.
/// Clause keywords are never treated as aliases, so `FROM users WHERE`
/// yields nothing.
#[must_use]
pub fn find_aliases(statement: &str, table: &str) -> Vec<String> {
    let pattern = format!(
        r"(?i)\b(?:from|join)\s+(?:\w+\.)?{}\s+(?:as\s+)?([A-Za-z_]\w*)",
        regex::escape(table)
    );
    compile(&pattern)
        .captures_iter(statement)
        .map(|caps| caps[1].to_lowercase())
        .filter(|alias| !CLAUSE_WORDS.contains(&alias.as_str()))
        .collect()
}
