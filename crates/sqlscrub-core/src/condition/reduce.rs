//! Removal of target-table predicates from a condition tree.

use crate::scan::is_balanced;

use super::{Condition, TargetContext};

/// Drops every leaf that references the target table and rebuilds the tree.
///
/// An `AND`/`OR` node whose children all vanish vanishes itself; a single
/// surviving child replaces the node. Returns `None` when nothing survives.
#[must_use]
pub fn reduce(condition: Condition, ctx: &TargetContext) -> Option<Condition> {
    match condition {
        Condition::Atom(text) => {
            if ctx.references(&text) {
                None
            } else {
                Some(Condition::Atom(text))
            }
        }
        Condition::Paren(inner) => reduce(*inner, ctx).map(|kept| Condition::Paren(Box::new(kept))),
        Condition::Not(inner) => reduce(*inner, ctx).map(|kept| Condition::Not(Box::new(kept))),
        Condition::And(parts) => rebuild(parts, ctx, Condition::And),
        Condition::Or(parts) => rebuild(parts, ctx, Condition::Or),
    }
}

fn rebuild(
    parts: Vec<Condition>,
    ctx: &TargetContext,
    make: fn(Vec<Condition>) -> Condition,
) -> Option<Condition> {
    let mut kept: Vec<Condition> = parts
        .into_iter()
        .filter_map(|part| reduce(part, ctx))
        .collect();
    match kept.len() {
        0 => None,
        1 => Some(kept.remove(0)),
        _ => Some(make(kept)),
    }
}

/// Rewrites a clause body, removing predicates that touch the target table.
///
/// Text with unbalanced parentheses is returned unchanged, as is text that
/// never mentions the target. An empty result means the whole clause must go.
#[must_use]
pub fn reduce_text(body: &str, ctx: &TargetContext) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    if !is_balanced(trimmed) {
        return body.to_string();
    }
    if !ctx.references(trimmed) {
        return body.to_string();
    }
    match reduce(super::parse(trimmed), ctx) {
        Some(kept) => kept.render(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::reduce_text;
    use crate::condition::TargetContext;

    fn ctx() -> TargetContext {
        TargetContext::new("target", vec!["t".to_string()])
    }

    #[test]
    fn removes_a_referencing_conjunct() {
        assert_eq!(
            reduce_text("a = 1 AND target_id = 5", &ctx()),
            "a = 1"
        );
    }

    #[test]
    fn removes_a_referencing_disjunct() {
        assert_eq!(
            reduce_text("t.status = 'x' OR b = 2 OR c = 3", &ctx()),
            "b = 2 OR c = 3"
        );
    }

    #[test]
    fn collapses_an_emptied_group() {
        assert_eq!(
            reduce_text("a = 1 AND (target.id = 1 OR t.id = 2)", &ctx()),
            "a = 1"
        );
    }

    #[test]
    fn keeps_groups_that_partially_survive() {
        assert_eq!(
            reduce_text("a = 1 AND (target_id = 1 OR b = 2)", &ctx()),
            "a = 1 AND (b = 2)"
        );
    }

    #[test]
    fn empty_result_when_everything_references() {
        assert_eq!(reduce_text("target_id = 5", &ctx()), "");
        assert_eq!(reduce_text("target.id = 1 AND t.x = 2", &ctx()), "");
    }

    #[test]
    fn negated_groups_reduce_inside() {
        assert_eq!(
            reduce_text("NOT (target_id = 1 OR b = 2)", &ctx()),
            "NOT (b = 2)"
        );
        assert_eq!(reduce_text("NOT (target_id = 1)", &ctx()), "");
    }

    #[test]
    fn between_predicates_drop_as_one_leaf() {
        assert_eq!(
            reduce_text("target_id BETWEEN 1 AND 10 AND b = 2", &ctx()),
            "b = 2"
        );
    }

    #[test]
    fn untouched_text_is_returned_byte_for_byte() {
        let body = "a = 1   AND    b = 2";
        assert_eq!(reduce_text(body, &ctx()), body);
    }

    #[test]
    fn unbalanced_text_is_left_alone() {
        let body = "a = 1 AND (target_id = 5";
        assert_eq!(reduce_text(body, &ctx()), body);
    }
}
