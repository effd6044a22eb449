//! Target-table set and table-name heuristics.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::patterns::compile;

static INSERT_TABLE: Lazy<Regex> = Lazy::new(|| compile(r"(?i)\binsert\s+into\s+(?:\w+\.)?(\w+)"));
static FROM_TABLE: Lazy<Regex> = Lazy::new(|| compile(r"(?i)\bfrom\s+(?:\w+\.)?(\w+)"));
static JOIN_TABLE: Lazy<Regex> = Lazy::new(|| compile(r"(?i)\bjoin\s+(?:\w+\.)?(\w+)"));
static DELETE_TABLE: Lazy<Regex> = Lazy::new(|| compile(r"(?i)\bdelete\s+from\s+(?:\w+\.)?(\w+)"));
static UPDATE_TABLE: Lazy<Regex> = Lazy::new(|| compile(r"(?i)\bupdate\s+(?:\w+\.)?(\w+)"));
static ID_STEM: Lazy<Regex> = Lazy::new(|| compile(r"(?i)\b(\w+)_id\b"));

/// Read-only set of tables whose data should be removed.
///
/// Names are normalized to lowercase on construction and deduplicated while
/// preserving the caller's order. Every pipeline stage reads this set;
/// nothing mutates it.
#[derive(Debug, Clone, Default)]
pub struct TargetTables {
    names: Vec<String>,
}

impl TargetTables {
    /// Builds the set from caller-supplied names.
    #[must_use]
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized = Vec::new();
        for name in names {
            let name = name.as_ref().trim().to_lowercase();
            if !name.is_empty() && !normalized.contains(&name) {
                normalized.push(name);
            }
        }
        Self { names: normalized }
    }

    /// Lowercase table names in caller order.
    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Target tables the document mentions, by bare name or by their
    /// `<table>_id` reference column.
    #[must_use]
    pub fn present_in(&self, content: &str) -> Vec<String> {
        self.names
            .iter()
            .filter(|table| {
                let pattern = format!(
                    r"(?i)\b{}\b|\b{}\b",
                    regex::escape(table),
                    regex::escape(&reference_column(table))
                );
                compile(&pattern).is_match(content)
            })
            .cloned()
            .collect()
    }
}

/// Whether the document mentions any of the target tables at all. Used to
/// skip the pipeline before it rewrites anything.
#[must_use]
pub fn mentions_any(content: &str, tables: &TargetTables) -> bool {
    !tables.present_in(content).is_empty()
}

/// Conventional foreign-key column for a table: trailing underscores are
/// collapsed before the `_id` suffix, so `users_` becomes `users_id` rather
/// than `users__id`.
#[must_use]
pub fn reference_column(table: &str) -> String {
    format!("{}_id", table.trim_end_matches('_'))
}

/// Extracts lowercase table names appearing in INSERT INTO, FROM, JOIN,
/// DELETE FROM and UPDATE clauses, plus the stems of `*_id` columns. An
/// over-approximation by design; callers treat it as a hint.
#[must_use]
pub fn extract_table_names(content: &str) -> BTreeSet<String> {
    let mut tables = BTreeSet::new();
    for re in [
        &*INSERT_TABLE,
        &*FROM_TABLE,
        &*JOIN_TABLE,
        &*DELETE_TABLE,
        &*UPDATE_TABLE,
        &*ID_STEM,
    ] {
        for caps in re.captures_iter(content) {
            tables.insert(caps[1].to_lowercase());
        }
    }
    tables
}
