//! Recursive-descent parser from clause text to a [`Condition`] tree.

use crate::scan::{matching_paren, split_keyword};

use super::Condition;

/// Nesting depth past which an expression is kept as an opaque atom.
const MAX_DEPTH: usize = 10;

/// Parses a `WHERE` or `ON` body into a condition tree.
///
/// `OR` binds loosest, then `AND`, then `NOT` and parenthesised groups.
/// A dangling leading or trailing operator is dropped. Expressions nested
/// deeper than [`MAX_DEPTH`] collapse into a single atom.
#[must_use]
pub fn parse(text: &str) -> Condition {
    parse_or(text, 0)
}

fn parse_or(text: &str, depth: usize) -> Condition {
    if depth >= MAX_DEPTH {
        return Condition::Atom(text.trim().to_string());
    }
    let parts = split_keyword(text, "OR");
    match parts.len() {
        0 => Condition::Atom(text.trim().to_string()),
        1 => parse_and(&parts[0], depth),
        _ => Condition::Or(
            parts
                .iter()
                .map(|part| parse_and(part, depth + 1))
                .collect(),
        ),
    }
}

fn parse_and(text: &str, depth: usize) -> Condition {
    if depth >= MAX_DEPTH {
        return Condition::Atom(text.trim().to_string());
    }
    let parts = split_keyword(text, "AND");
    match parts.len() {
        0 => Condition::Atom(text.trim().to_string()),
        1 => parse_unary(&parts[0], depth),
        _ => Condition::And(
            parts
                .iter()
                .map(|part| parse_unary(part, depth + 1))
                .collect(),
        ),
    }
}

fn parse_unary(text: &str, depth: usize) -> Condition {
    let text = text.trim();
    if depth >= MAX_DEPTH {
        return Condition::Atom(text.to_string());
    }

    if let Some(prefix) = text.get(..3) {
        if prefix.eq_ignore_ascii_case("not") && text.len() > 3 {
            let after = &text[3..];
            let starts_group = after.starts_with(char::is_whitespace) || after.starts_with('(');
            if starts_group {
                if let Some(inner) = full_group(after.trim_start()) {
                    return Condition::Not(Box::new(Condition::Paren(Box::new(parse_or(
                        inner,
                        depth + 1,
                    )))));
                }
            }
        }
    }

    if let Some(inner) = full_group(text) {
        return Condition::Paren(Box::new(parse_or(inner, depth + 1)));
    }

    Condition::Atom(text.to_string())
}

/// When the whole of `text` is one parenthesised group, returns its body.
fn full_group(text: &str) -> Option<&str> {
    if !text.starts_with('(') {
        return None;
    }
    let close = matching_paren(text, 0)?;
    if close == text.len() - 1 {
        Some(text[1..close].trim())
    } else {
        None
    }
}
