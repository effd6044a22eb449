//! The stage pipeline that turns raw SQL text into scrubbed SQL text.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::patterns::compile;
use crate::tables::{mentions_any, TargetTables};
use crate::{comments, rewrite};

/// A single rewriting stage over the whole content.
pub type StageFn = fn(&str, &TargetTables) -> String;

/// The stages in application order.
pub const STAGES: &[(&str, StageFn)] = &[
    ("comments", strip_comments),
    ("inserts", rewrite_inserts),
    ("where", rewrite::where_clause::rewrite),
    ("joins", rewrite::join::rewrite),
];

/// Rounds of `INSERT` rewriting before giving up on reaching a fixed point.
const MAX_INSERT_ROUNDS: usize = 10;

static BLANK_RUNS: Lazy<Regex> = Lazy::new(|| compile(r"\n(?:[ \t]*\n){3,}"));

fn strip_comments(content: &str, _tables: &TargetTables) -> String {
    comments::strip(content)
}

/// `INSERT` rewriting can expose further work (a stripped column may leave
/// another target's column in first position), so it runs to a fixed point.
fn rewrite_inserts(content: &str, tables: &TargetTables) -> String {
    let mut current = content.to_string();
    for _ in 0..MAX_INSERT_ROUNDS {
        let next = rewrite::insert::rewrite(&current, tables);
        if next == current {
            break;
        }
        current = next;
    }
    current
}

/// Runs every stage over `content` for the given target tables.
///
/// Content that never mentions a target comes back unchanged byte for byte.
/// When stages did change something, runs of blank lines are collapsed.
#[must_use]
pub fn process(content: &str, tables: &TargetTables) -> String {
    if content.trim().is_empty() || tables.is_empty() {
        return content.to_string();
    }
    if !mentions_any(content, tables) {
        return content.to_string();
    }

    let mut current = content.to_string();
    let mut changed = false;
    for (name, stage) in STAGES {
        let next = stage(&current, tables);
        if next != current {
            tracing::debug!("stage {} rewrote content", name);
            changed = true;
            current = next;
        }
    }

    if changed {
        current = BLANK_RUNS.replace_all(&current, "\n\n").into_owned();
    }
    current
}

/// The comment left behind when scrubbing empties a file completely.
#[must_use]
pub fn placeholder_comment(tables: &[String]) -> String {
    if tables.is_empty() {
        return "-- All content was removed\n".to_string();
    }
    format!("-- All content was removed for tables: {}\n", tables.join(", "))
}
