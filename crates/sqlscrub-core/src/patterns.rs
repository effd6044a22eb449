//! Regex construction helper shared by the rewriters.

use regex::Regex;

/// Compiles a pattern that is either a hand-written constant or built from
/// an escaped identifier; neither can produce an invalid expression.
pub fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("hand-written pattern is valid")
}
