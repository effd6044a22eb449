//! String-literal-aware scanning primitives.
//!
//! Every rewriter in this crate works on raw SQL text, so the one thing they
//! all need is a scanner that knows when a character is "real" and when it
//! sits inside a string literal or a nested parenthesized group. The
//! functions here provide exactly that: statement splitting, top-level list
//! splitting, and word-boundary keyword location at nesting depth zero.

/// Tracks whether a scan position is inside a string literal.
///
/// Both `'` and `"` delimiters are recognized; a backslash escapes the next
/// character, so an escaped quote does not end the string. An unterminated
/// literal simply runs to the end of the input.
#[derive(Debug, Default, Clone, Copy)]
struct StringTracker {
    quote: Option<char>,
    escaped: bool,
}

impl StringTracker {
    const fn in_string(self) -> bool {
        self.quote.is_some()
    }

    /// Consumes one character. Call after inspecting the character, so the
    /// opening quote itself is still seen as outside the string.
    fn advance(&mut self, c: char) {
        if let Some(quote) = self.quote {
            if self.escaped {
                self.escaped = false;
            } else if c == '\\' {
                self.escaped = true;
            } else if c == quote {
                self.quote = None;
            }
        } else if c == '\'' || c == '"' {
            self.quote = Some(c);
        }
    }
}

const fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Splits SQL text into statements at semicolons outside string literals.
///
/// The terminating semicolon stays attached to its statement. A trailing
/// non-blank remainder without a terminator is returned as a final
/// statement. Empty input yields an empty list.
#[must_use]
pub fn split_statements(text: &str) -> Vec<String> {
    let mut tracker = StringTracker::default();
    let mut statements = Vec::new();
    let mut start = 0;

    for (i, c) in text.char_indices() {
        if c == ';' && !tracker.in_string() {
            let statement = text[start..=i].trim();
            if !statement.is_empty() {
                statements.push(statement.to_string());
            }
            start = i + 1;
        }
        tracker.advance(c);
    }

    let rest = text[start..].trim();
    if !rest.is_empty() {
        statements.push(rest.to_string());
    }
    statements
}

/// Splits text at a delimiter, respecting string literals and nesting of
/// `(`, `[` and `{`. Parts are trimmed; a blank trailing part is dropped.
#[must_use]
pub fn split_top_level(text: &str, delimiter: char) -> Vec<String> {
    let mut tracker = StringTracker::default();
    let mut depth = 0i32;
    let mut parts = Vec::new();
    let mut start = 0;

    for (i, c) in text.char_indices() {
        if !tracker.in_string() {
            match c {
                '(' | '[' | '{' => depth += 1,
                ')' | ']' | '}' => depth -= 1,
                c if c == delimiter && depth == 0 => {
                    parts.push(text[start..i].trim().to_string());
                    start = i + c.len_utf8();
                }
                _ => {}
            }
        }
        tracker.advance(c);
    }

    let rest = text[start..].trim();
    if !rest.is_empty() {
        parts.push(rest.to_string());
    }
    parts
}

/// Finds the next case-insensitive, word-boundary occurrence of any of
/// `keywords` at nesting depth zero outside string literals, starting the
/// search at byte offset `from`. Returns the byte offset and length of the
/// matched keyword.
#[must_use]
pub fn find_keyword(text: &str, from: usize, keywords: &[&str]) -> Option<(usize, usize)> {
    let mut tracker = StringTracker::default();
    let mut depth = 0i32;
    let mut prev: Option<char> = None;

    for (i, c) in text.char_indices() {
        if !tracker.in_string() {
            match c {
                '(' | '[' | '{' => depth += 1,
                ')' | ']' | '}' => depth -= 1,
                _ => {}
            }
            if i >= from && depth == 0 && !prev.is_some_and(is_word_char) {
                for keyword in keywords {
                    let Some(slice) = text.get(i..i + keyword.len()) else {
                        continue;
                    };
                    if slice.eq_ignore_ascii_case(keyword)
                        && !text[i + keyword.len()..]
                            .chars()
                            .next()
                            .is_some_and(is_word_char)
                    {
                        return Some((i, keyword.len()));
                    }
                }
            }
        }
        tracker.advance(c);
        prev = Some(c);
    }
    None
}

/// Splits a logical expression on a boolean keyword (`AND` or `OR`) at
/// nesting depth zero outside strings.
///
/// When splitting on `AND`, the single `AND` belonging to a pending
/// top-level `BETWEEN` is not a split point, so `x BETWEEN 1 AND 10` stays
/// one part. Blank parts are dropped.
#[must_use]
pub fn split_keyword(text: &str, keyword: &str) -> Vec<String> {
    let track_between = keyword.eq_ignore_ascii_case("AND");
    let plain = [keyword];
    let search: &[&str] = if track_between {
        &["AND", "BETWEEN"]
    } else {
        &plain
    };

    let mut parts = Vec::new();
    let mut start = 0;
    let mut from = 0;
    let mut pending_between = false;

    while let Some((pos, len)) = find_keyword(text, from, search) {
        let word = &text[pos..pos + len];
        if word.eq_ignore_ascii_case("BETWEEN") {
            pending_between = true;
        } else if pending_between {
            pending_between = false;
        } else {
            parts.push(text[start..pos].trim().to_string());
            start = pos + len;
        }
        from = pos + len;
    }

    parts.push(text[start..].trim().to_string());
    parts.retain(|part| !part.is_empty());
    parts
}

/// Whether parentheses outside string literals are balanced.
#[must_use]
pub fn is_balanced(text: &str) -> bool {
    let mut tracker = StringTracker::default();
    let mut depth = 0i32;

    for c in text.chars() {
        if !tracker.in_string() {
            if c == '(' {
                depth += 1;
            } else if c == ')' {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
        }
        tracker.advance(c);
    }
    depth == 0
}

/// Byte offset of the `)` matching the `(` at `open`, honoring string
/// literals from that point on. Returns `None` when unmatched.
#[must_use]
pub fn matching_paren(text: &str, open: usize) -> Option<usize> {
    let mut tracker = StringTracker::default();
    let mut depth = 0i32;

    for (i, c) in text[open..].char_indices() {
        if !tracker.in_string() {
            if c == '(' {
                depth += 1;
            } else if c == ')' {
                depth -= 1;
                if depth == 0 {
                    return Some(open + i);
                }
            }
        }
        tracker.advance(c);
    }
    None
}

/// Collapses every whitespace run to a single space and trims the ends.
#[must_use]
pub fn squash_spaces(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_no_statements() {
        assert!(split_statements("").is_empty());
        assert!(split_statements("   \n\t ").is_empty());
    }

    #[test]
    fn statements_split_on_semicolons() {
        let parts = split_statements("SELECT 1; SELECT 2;\nSELECT 3;");
        assert_eq!(parts, vec!["SELECT 1;", "SELECT 2;", "SELECT 3;"]);
    }

    #[test]
    fn semicolon_inside_string_is_not_a_boundary() {
        let parts = split_statements("INSERT INTO t (a) VALUES ('x;y'); SELECT 1;");
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0], "INSERT INTO t (a) VALUES ('x;y');");
    }

    #[test]
    fn escaped_quote_does_not_end_a_string() {
        let parts = split_statements(r"INSERT INTO t (a) VALUES ('it\'s; fine'); SELECT 1;");
        assert_eq!(parts.len(), 2);
    }

    #[test]
    fn unterminated_string_scans_to_end() {
        let parts = split_statements("SELECT 'oops; SELECT 2;");
        assert_eq!(parts, vec!["SELECT 'oops; SELECT 2;"]);
    }

    #[test]
    fn trailing_remainder_is_a_statement() {
        let parts = split_statements("SELECT 1; SELECT 2");
        assert_eq!(parts, vec!["SELECT 1;", "SELECT 2"]);
    }

    #[test]
    fn top_level_commas_ignore_nesting() {
        let parts = split_top_level("a, f(b, c), 'd,e', (g, h)", ',');
        assert_eq!(parts, vec!["a", "f(b, c)", "'d,e'", "(g, h)"]);
    }

    #[test]
    fn keyword_search_skips_strings_and_parens() {
        let text = "SELECT 'where' FROM t JOIN (SELECT 1 WHERE x) q WHERE a = 1";
        let (pos, len) = find_keyword(text, 0, &["WHERE"]).unwrap();
        assert_eq!(&text[pos..pos + len], "WHERE");
        assert_eq!(pos, text.rfind("WHERE").unwrap());
    }

    #[test]
    fn keyword_search_requires_word_boundaries() {
        assert!(find_keyword("SELECT ordering FROM t", 0, &["ORDER"]).is_none());
        assert!(find_keyword("a ORDER BY b", 0, &["OR"]).is_none());
    }

    #[test]
    fn and_split_keeps_between_intact() {
        let parts = split_keyword("a BETWEEN 1 AND 10 AND b = 2", "AND");
        assert_eq!(parts, vec!["a BETWEEN 1 AND 10", "b = 2"]);
    }

    #[test]
    fn or_split_ignores_nested_or() {
        let parts = split_keyword("(a = 1 OR b = 2) OR c = 3", "OR");
        assert_eq!(parts, vec!["(a = 1 OR b = 2)", "c = 3"]);
    }

    #[test]
    fn balance_check() {
        assert!(is_balanced("(a AND (b OR c))"));
        assert!(!is_balanced("(a AND (b OR c)"));
        assert!(!is_balanced("a) AND (b"));
        assert!(is_balanced("a = '(' AND b = 1"));
    }

    #[test]
    fn matching_paren_honors_strings() {
        let text = "(a, ')', b)";
        assert_eq!(matching_paren(text, 0), Some(text.len() - 1));
        assert_eq!(matching_paren("(a, (b)", 0), None);
    }
}
