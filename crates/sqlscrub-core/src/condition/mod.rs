//! Boolean condition trees for `WHERE` and `ON` bodies.
//!
//! A clause body is parsed into a [`Condition`] tree, leaves that touch a
//! target table are dropped by [`reduce_text`], and the survivors are
//! rendered back into SQL text.

mod parser;
mod reduce;

pub use parser::parse;
pub use reduce::{reduce, reduce_text};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::patterns::compile;
use crate::tables::reference_column;

/// A parsed boolean expression from a `WHERE` or `ON` clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// A single comparison or predicate, kept as raw text.
    Atom(String),
    /// A parenthesised subexpression.
    Paren(Box<Condition>),
    /// Two or more operands joined by `AND`.
    And(Vec<Condition>),
    /// Two or more operands joined by `OR`.
    Or(Vec<Condition>),
    /// A negated parenthesised group.
    Not(Box<Condition>),
}

impl Condition {
    /// Renders the tree back into clause text.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Atom(text) => text.clone(),
            Self::Paren(inner) => format!("({})", inner.render()),
            Self::And(parts) => parts
                .iter()
                .map(Self::render)
                .collect::<Vec<_>>()
                .join(" AND "),
            Self::Or(parts) => parts
                .iter()
                .map(Self::render)
                .collect::<Vec<_>>()
                .join(" OR "),
            Self::Not(inner) => {
                // `NOT` always renders a parenthesised body, so unwrap a
                // `Paren` child to avoid doubled parentheses.
                let body = match inner.as_ref() {
                    Self::Paren(grouped) => grouped.render(),
                    other => other.render(),
                };
                format!("NOT ({body})")
            }
        }
    }
}

static BETWEEN: Lazy<Regex> =
    Lazy::new(|| compile(r"(?is)(\w+(?:\.\w+)?)\s+between\s+(.+?)\s+and\s+(.+)"));

/// Everything needed to decide whether a predicate touches one target table.
#[derive(Debug)]
pub struct TargetContext {
    table: String,
    aliases: Vec<String>,
    reference_column: String,
    table_dot: Regex,
    alias_dots: Vec<Regex>,
    ref_col_predicate: Regex,
    ref_col_qualified: Regex,
}

impl TargetContext {
    /// Builds a context for `table` with the aliases it carries in the
    /// statement being rewritten.
    #[must_use]
    pub fn new(table: &str, aliases: Vec<String>) -> Self {
        let table = table.to_lowercase();
        let ref_col = reference_column(&table);
        let table_dot = compile(&format!(r"(?i)(^|\W){}\.", regex::escape(&table)));
        let alias_dots = aliases
            .iter()
            .map(|alias| compile(&format!(r"(?i)(^|\W){}\.", regex::escape(alias))))
            .collect();
        let ref_col_predicate = compile(&format!(
            r"(?i)(^|\W)(\w+\.)?{}\b\s*(=|!=|<>|>=|<=|>|<|is\s+not\s+null|is\s+null|in\b|like\b|not\b|between\b)",
            regex::escape(&ref_col)
        ));
        let ref_col_qualified =
            compile(&format!(r"(?i)(^|\W)\w+\.{}\b", regex::escape(&ref_col)));
        Self {
            table,
            aliases,
            reference_column: ref_col,
            table_dot,
            alias_dots,
            ref_col_predicate,
            ref_col_qualified,
        }
    }

    /// The lowercase target table name.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// The `<table>_id` column that marks foreign-key references.
    #[must_use]
    pub fn reference_column(&self) -> &str {
        &self.reference_column
    }

    /// Whether a column expression (`t.col`, `alias.col` or a bare name)
    /// belongs to the target table.
    #[must_use]
    pub fn column_references(&self, column: &str) -> bool {
        let column = column.trim().to_lowercase();
        if column.contains(&format!("{}.", self.table)) {
            return true;
        }
        if self
            .aliases
            .iter()
            .any(|alias| column.contains(&format!("{alias}.")))
        {
            return true;
        }
        column == self.reference_column
            || column
                .rsplit('.')
                .next()
                .is_some_and(|tail| tail == self.reference_column)
    }

    /// Whether a predicate fragment touches the target table through its
    /// name, an alias or its reference column.
    #[must_use]
    pub fn references(&self, text: &str) -> bool {
        if let Some(caps) = BETWEEN.captures(text) {
            if self.column_references(&caps[1]) {
                return true;
            }
            let lower_table = &self.table;
            for bound in [&caps[2], &caps[3]] {
                let bound = bound.to_lowercase();
                if bound.contains(lower_table)
                    || bound.contains(&self.reference_column)
                    || self
                        .aliases
                        .iter()
                        .any(|alias| bound.contains(&format!("{alias}.")))
                {
                    return true;
                }
            }
        }
        self.table_dot.is_match(text)
            || self.alias_dots.iter().any(|re| re.is_match(text))
            || self.ref_col_predicate.is_match(text)
            || self.ref_col_qualified.is_match(text)
    }
}

#[cfg(test)]
mod tests {
    use super::{Condition, TargetContext};

    fn ctx() -> TargetContext {
        TargetContext::new("target", vec!["t".to_string()])
    }

    #[test]
    fn qualified_column_references_table() {
        assert!(ctx().references("target.id = 5"));
        assert!(ctx().references("t.name LIKE 'x%'"));
        assert!(!ctx().references("product.id = 5"));
    }

    #[test]
    fn reference_column_predicates_match() {
        assert!(ctx().references("target_id = 5"));
        assert!(ctx().references("p.target_id IS NOT NULL"));
        assert!(ctx().references("target_id in (1, 2)"));
        assert!(!ctx().references("other_target_id = 5"));
    }

    #[test]
    fn between_bounds_are_inspected() {
        assert!(ctx().references("target_id BETWEEN 1 AND 10"));
        assert!(ctx().references("amount BETWEEN t.low AND t.high"));
        assert!(!ctx().references("amount BETWEEN 1 AND 10"));
    }

    #[test]
    fn similar_names_do_not_match() {
        assert!(!ctx().references("target_history.id = 5"));
        assert!(!ctx().references("retargeted = true"));
    }

    #[test]
    fn render_round_trip_shapes() {
        let tree = Condition::And(vec![
            Condition::Atom("a = 1".to_string()),
            Condition::Paren(Box::new(Condition::Or(vec![
                Condition::Atom("b = 2".to_string()),
                Condition::Atom("c = 3".to_string()),
            ]))),
        ]);
        assert_eq!(tree.render(), "a = 1 AND (b = 2 OR c = 3)");

        let negated = Condition::Not(Box::new(Condition::Paren(Box::new(Condition::Atom(
            "x = 1".to_string(),
        )))));
        assert_eq!(negated.render(), "NOT (x = 1)");
    }
}
