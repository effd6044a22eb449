//! Comment removal and whitespace normalization.

/// Strips `--` line comments and nested `/* */` block comments, then
/// collapses whitespace runs to single spaces and trims the ends.
///
/// Characters inside string literals are copied verbatim even when they look
/// like comment markers. Each removed comment becomes a single space so
/// adjacent tokens never merge. The result is stable under repeated calls.
#[must_use]
pub fn strip(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut line_comment = false;
    let mut block_depth = 0usize;

    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();

        if let Some(q) = quote {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            i += 1;
            continue;
        }

        if line_comment {
            if c == '\n' || c == '\r' {
                line_comment = false;
                out.push(' ');
            }
            i += 1;
            continue;
        }

        if block_depth > 0 {
            if c == '/' && next == Some('*') {
                block_depth += 1;
                i += 2;
            } else if c == '*' && next == Some('/') {
                block_depth -= 1;
                i += 2;
                if block_depth == 0 {
                    out.push(' ');
                }
            } else {
                i += 1;
            }
            continue;
        }

        if c == '-' && next == Some('-') {
            line_comment = true;
            i += 2;
            continue;
        }
        if c == '/' && next == Some('*') {
            block_depth = 1;
            i += 2;
            continue;
        }
        if c == '\'' || c == '"' {
            quote = Some(c);
        }
        out.push(c);
        i += 1;
    }

    crate::scan::squash_spaces(&out)
}
