//! String- and bracket-aware source scanning.
//!
//! The one low-level primitive shared by the call finder and the parameter
//! parser: walk a buffer one byte at a time, tracking whether the cursor is
//! inside a string literal (`"`, `'`, or backtick, with the active delimiter
//! remembered) and a bracket depth counter over `( { [` / `) } ]` that only
//! moves while outside a string.
//!
//! All offsets are byte offsets. Delimiters and brackets are ASCII, so
//! multi-byte UTF-8 sequences pass through untouched.

/// Characters that open a string literal.
pub const STRING_DELIMS: [u8; 3] = [b'"', b'\'', b'`'];

/// A string literal located in source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Literal {
    /// Offset of the opening delimiter.
    pub start: usize,
    /// Offset one past the closing delimiter.
    pub end: usize,
    /// The delimiter character.
    pub delim: u8,
}

impl Literal {
    /// The text strictly between the delimiters.
    pub fn inner<'a>(&self, text: &'a str) -> &'a str {
        &text[self.start + 1..self.end - 1]
    }
}

/// Find the balanced bracket span starting at or after `start`: the offsets
/// of the first opening bracket and of the bracket that returns depth to
/// zero after depth has been positive at least once.
///
/// Brackets inside string literals do not count. A backslash escapes the
/// next character when it is not itself escaped (standard parity rule).
/// Returns `None` if the buffer ends before the span closes, or before any
/// opening bracket is seen.
pub fn balanced_span(text: &str, start: usize) -> Option<(usize, usize)> {
    let bytes = text.as_bytes();
    let mut depth: i32 = 0;
    let mut open: Option<usize> = None;
    let mut in_string = false;
    let mut delim = 0u8;
    let mut escaped = false;

    for (i, &c) in bytes.iter().enumerate().skip(start) {
        if escaped {
            escaped = false;
            continue;
        }
        if c == b'\\' {
            escaped = true;
            continue;
        }

        if in_string {
            if c == delim {
                in_string = false;
            }
            continue;
        }
        if STRING_DELIMS.contains(&c) {
            in_string = true;
            delim = c;
            continue;
        }

        match c {
            b'(' | b'{' | b'[' => {
                if open.is_none() {
                    open = Some(i);
                }
                depth += 1;
            }
            b')' | b'}' | b']' => {
                depth -= 1;
                if depth == 0 {
                    if let Some(o) = open {
                        return Some((o, i));
                    }
                }
            }
            _ => {}
        }
    }
    None
}

/// Find the next string literal at or after `start`, outside any literal.
///
/// Scans forward for an unescaped delimiter, then for its matching unescaped
/// closing delimiter. Returns `None` if no literal starts before the end of
/// the buffer; an unterminated literal yields `None` as well.
pub fn next_literal(text: &str, start: usize) -> Option<Literal> {
    let bytes = text.as_bytes();
    let mut escaped = false;
    let mut open: Option<(usize, u8)> = None;

    for (i, &c) in bytes.iter().enumerate().skip(start) {
        if escaped {
            escaped = false;
            continue;
        }
        if c == b'\\' {
            escaped = true;
            continue;
        }
        match open {
            None => {
                if STRING_DELIMS.contains(&c) {
                    open = Some((i, c));
                }
            }
            Some((lit_start, delim)) => {
                if c == delim {
                    return Some(Literal {
                        start: lit_start,
                        end: i + 1,
                        delim,
                    });
                }
            }
        }
    }
    None
}
