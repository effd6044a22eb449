//! `WHERE` clause pruning: conditions touching a target table are removed
//! and the clause (or just the keyword) disappears when nothing is left.

use crate::alias::find_aliases;
use crate::condition::{reduce_text, TargetContext};
use crate::scan::{find_keyword, squash_spaces};
use crate::tables::TargetTables;

const TAIL_KEYWORDS: &[&str] = &["ORDER", "GROUP", "HAVING", "LIMIT", "RETURNING"];

/// Prunes `WHERE` conditions referencing any target table from every
/// statement in `content`.
#[must_use]
pub fn rewrite(content: &str, tables: &TargetTables) -> String {
    let mut out = content.to_string();
    for table in tables.iter() {
        out = super::for_each_statement(&out, |statement| rewrite_statement(statement, table));
    }
    out
}

/// Rewrites one statement for one target table. Statements without a
/// `WHERE` clause, or whose clause never touches the table, come back
/// unchanged byte for byte.
pub(crate) fn rewrite_statement(statement: &str, table: &str) -> String {
    let Some((where_pos, where_len)) = find_keyword(statement, 0, &["WHERE"]) else {
        return statement.to_string();
    };

    let trimmed_len = statement.trim_end().len();
    let has_semi = statement.trim_end().ends_with(';');
    let core_end = if has_semi { trimmed_len - 1 } else { trimmed_len };
    let body_start = where_pos + where_len;
    let tail_pos = find_keyword(statement, body_start, TAIL_KEYWORDS).map(|(pos, _)| pos);
    let body_end = tail_pos.unwrap_or(core_end);
    let body = statement[body_start..body_end].trim();

    let ctx = TargetContext::new(table, find_aliases(statement, table));
    let reduced = reduce_text(body, &ctx);
    if reduced == body {
        return statement.to_string();
    }

    let mut out = statement[..where_pos].trim_end().to_string();
    if !reduced.trim().is_empty() {
        out.push_str(" WHERE ");
        out.push_str(reduced.trim());
    }
    if let Some(pos) = tail_pos {
        out.push(' ');
        out.push_str(statement[pos..core_end].trim());
    }
    let mut out = squash_spaces(&out);
    if has_semi {
        out.push(';');
    }
    out
}
