//! `JOIN` rewriting: joins onto a target table are removed outright, and
//! `ON` conditions of other joins lose the predicates that reference one.

use crate::alias::find_aliases;
use crate::condition::{reduce_text, TargetContext};
use crate::scan::{find_keyword, squash_spaces};
use crate::tables::TargetTables;

/// Keywords that terminate a join clause.
const CLAUSE_KEYWORDS: &[&str] = &[
    "JOIN", "WHERE", "GROUP", "ORDER", "HAVING", "LEFT", "RIGHT", "INNER", "OUTER", "CROSS",
    "FULL", "LIMIT", "UNION", "RETURNING",
];

/// Join-type words that may precede `JOIN` and belong to its span.
const JOIN_TYPE_WORDS: &[&str] = &["left", "right", "inner", "outer", "cross", "full"];

/// Words that can follow a joined table without being its alias.
const NON_ALIAS_WORDS: &[&str] = &[
    "on", "where", "group", "order", "having", "join", "left", "right", "inner", "outer", "cross",
    "full", "union", "limit", "set", "values", "as", "using",
];

/// One `JOIN ... [alias] [ON ...]` clause located inside a statement.
struct JoinClause {
    /// Span of the whole clause, join-type words included.
    start: usize,
    end: usize,
    table: String,
    alias: Option<String>,
    /// Span of the text after the `ON` keyword, when present.
    on_body: Option<(usize, usize)>,
}

/// Rewrites the joins in `content` for every target table.
#[must_use]
pub fn rewrite(content: &str, tables: &TargetTables) -> String {
    let mut out = content.to_string();
    for table in tables.iter() {
        out = super::for_each_statement(&out, |statement| remove_direct(statement, table));
        out = super::for_each_statement(&out, |statement| prune_references(statement, table));
    }
    out
}

const fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// The next run of word characters and dots after `from`, skipping leading
/// whitespace. Returns its byte span.
fn next_word(statement: &str, from: usize) -> Option<(usize, usize)> {
    let rest = &statement[from..];
    let offset = rest.len() - rest.trim_start().len();
    let start = from + offset;
    let end = statement[start..]
        .char_indices()
        .find(|&(_, c)| !is_word_char(c) && c != '.')
        .map_or(statement.len(), |(i, _)| start + i);
    (end > start).then_some((start, end))
}

/// Extends a clause start backwards over join-type words (`LEFT OUTER`,
/// `INNER` and so on) and the whitespace before them.
fn extend_over_join_type(statement: &str, join_pos: usize) -> usize {
    let mut start = join_pos;
    loop {
        let before = statement[..start].trim_end();
        let word_start = before
            .rfind(|c: char| !is_word_char(c))
            .map_or(0, |i| i + c_len(before, i));
        let word = &before[word_start..];
        if !word.is_empty() && JOIN_TYPE_WORDS.contains(&word.to_lowercase().as_str()) {
            start = word_start;
        } else {
            break;
        }
    }
    statement[..start].trim_end().len()
}

fn c_len(text: &str, at: usize) -> usize {
    text[at..].chars().next().map_or(1, char::len_utf8)
}

/// Locates every join clause in one statement. `core_end` excludes the
/// trailing semicolon.
fn find_clauses(statement: &str, core_end: usize) -> Vec<JoinClause> {
    let mut clauses = Vec::new();
    let mut from = 0;

    while let Some((join_pos, join_len)) = find_keyword(statement, from, &["JOIN"]) {
        from = join_pos + join_len;
        let Some((table_start, table_end)) = next_word(statement, from) else {
            continue;
        };
        from = table_end;
        let table = statement[table_start..table_end].to_lowercase();

        let mut alias = None;
        if let Some((alias_start, alias_end)) = next_word(statement, table_end) {
            let word = statement[alias_start..alias_end].to_lowercase();
            if !word.contains('.') && !NON_ALIAS_WORDS.contains(&word.as_str()) {
                alias = Some(word);
                from = alias_end;
            }
        }

        let end_raw = find_keyword(statement, from, CLAUSE_KEYWORDS)
            .map_or(core_end, |(pos, _)| pos.min(core_end));
        let on_body = find_keyword(statement, from, &["ON"])
            .filter(|&(pos, _)| pos < end_raw)
            .map(|(pos, len)| (pos + len, statement[..end_raw].trim_end().len()));

        clauses.push(JoinClause {
            start: extend_over_join_type(statement, join_pos),
            end: statement[..end_raw].trim_end().len(),
            table,
            alias,
            on_body,
        });
        from = end_raw.max(from);
    }
    clauses
}

fn base_name(table: &str) -> &str {
    table.rsplit('.').next().unwrap_or(table)
}

fn core_end_of(statement: &str) -> usize {
    let trimmed = statement.trim_end();
    if trimmed.ends_with(';') {
        trimmed.len() - 1
    } else {
        trimmed.len()
    }
}

/// Removes every join onto `table` itself, then prunes conditions that were
/// bound to the removed alias from the rest of the statement.
fn remove_direct(statement: &str, table: &str) -> String {
    let core_end = core_end_of(statement);
    let clauses = find_clauses(statement, core_end);
    let doomed: Vec<&JoinClause> = clauses
        .iter()
        .filter(|clause| base_name(&clause.table) == table)
        .collect();
    if doomed.is_empty() {
        return statement.to_string();
    }

    let has_semi = statement.trim_end().ends_with(';');
    let mut out = statement[..core_end].to_string();
    for clause in doomed.iter().rev() {
        out.replace_range(clause.start..clause.end, " ");
    }
    let mut out = squash_spaces(&out);
    if has_semi {
        out.push(';');
    }

    for clause in &doomed {
        if let Some(alias) = &clause.alias {
            out = crate::rewrite::where_clause::rewrite_statement(&out, alias);
        }
    }
    out
}

/// Prunes target-table predicates from the `ON` conditions of joins onto
/// other tables. A join whose whole `ON` condition vanishes is removed.
fn prune_references(statement: &str, table: &str) -> String {
    let ctx = TargetContext::new(table, find_aliases(statement, table));
    if !ctx.references(statement) {
        return statement.to_string();
    }

    let core_end = core_end_of(statement);
    let has_semi = statement.trim_end().ends_with(';');
    let mut edits: Vec<(usize, usize, String)> = Vec::new();

    for clause in find_clauses(statement, core_end) {
        if base_name(&clause.table) == table {
            continue;
        }
        let Some((body_start, body_end)) = clause.on_body else {
            continue;
        };
        let body = statement[body_start..body_end].trim();
        let reduced = reduce_text(body, &ctx);
        if reduced == body {
            continue;
        }
        if reduced.trim().is_empty() {
            edits.push((clause.start, clause.end, " ".to_string()));
        } else {
            edits.push((body_start, body_end, format!(" {}", reduced.trim())));
        }
    }

    if edits.is_empty() {
        return statement.to_string();
    }
    let mut out = statement[..core_end].to_string();
    for (start, end, replacement) in edits.iter().rev() {
        out.replace_range(*start..*end, replacement);
    }
    let mut out = squash_spaces(&out);
    if has_semi {
        out.push(';');
    }
    out
}
