//! Locating annotation calls and splitting source text into a runnable
//! stream and a documentation stream.
//!
//! An annotation call is `namespace . word ( ... )`, where the argument list
//! is found with the string-aware scanner so quotes and nested brackets in
//! the arguments cannot break the span. Everything between call spans is the
//! runnable stream; the spans themselves, in order, are the documentation
//! stream.

use crate::error::ExtractError;
use crate::scan;
use regex::Regex;
use std::ops::Range;

/// One annotation call located in source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCall {
    /// The word after the namespace dot, e.g. `function`.
    pub kind: String,
    /// The text strictly between the call's opening `(` and its matching `)`.
    pub args: String,
    /// Byte span of the whole call, including trailing `;`/`)`/whitespace.
    pub span: Range<usize>,
}

/// Result of splitting one source buffer.
#[derive(Debug, Default)]
pub struct Split {
    /// Input with every call span removed.
    pub runnable: String,
    /// The call spans, concatenated in original order.
    pub documentation: String,
    /// The located calls, in original order.
    pub calls: Vec<RawCall>,
    /// Per-call failures; the split always runs to the end of the buffer.
    pub errors: Vec<ExtractError>,
}

/// Conventions for one split pass.
#[derive(Debug, Clone)]
pub struct Conventions {
    /// Identifier the annotation calls hang off, e.g. `gloss`.
    pub namespace: String,
    /// Line content that begins an excised authoring-support block.
    pub begin_marker: String,
    /// Line content that ends it.
    pub end_marker: String,
}

impl Default for Conventions {
    fn default() -> Self {
        Conventions {
            namespace: "gloss".to_string(),
            begin_marker: "// BEGIN GLOSS".to_string(),
            end_marker: "// END GLOSS".to_string(),
        }
    }
}

/// Finds annotation call spans in source text.
pub struct CallFinder {
    token: Regex,
}

impl CallFinder {
    pub fn new(namespace: &str) -> Self {
        // Whitespace is allowed around the dot, matching how the calls are
        // written across line breaks in practice.
        let pattern = format!(r"\b{}\s*\.\s*(\w+)", regex::escape(namespace));
        CallFinder {
            token: Regex::new(&pattern).expect("namespace token pattern"),
        }
    }

    /// Locate every non-overlapping call, left to right.
    ///
    /// A call whose argument list never closes is abandoned and reported;
    /// the scan resynchronizes at the next namespace token.
    pub fn find(&self, text: &str) -> (Vec<RawCall>, Vec<ExtractError>) {
        let mut calls = Vec::new();
        let mut errors = Vec::new();
        let mut pos = 0;

        while let Some(m) = self.token.find_at(text, pos) {
            let caps = self
                .token
                .captures_at(text, m.start())
                .expect("find_at and captures_at agree");
            let kind = caps[1].to_string();

            let Some((open, close)) = scan::balanced_span(text, m.end()) else {
                errors.push(ExtractError::MalformedCallSpan {
                    kind,
                    offset: m.start(),
                });
                pos = m.end();
                continue;
            };

            // Consume trailing statement punctuation: the closing bracket
            // itself, then any run of whitespace, `;`, or extra `)`.
            let bytes = text.as_bytes();
            let mut end = close + 1;
            while end < bytes.len()
                && (bytes[end].is_ascii_whitespace() || bytes[end] == b';' || bytes[end] == b')')
            {
                end += 1;
            }

            calls.push(RawCall {
                kind,
                args: text[open + 1..close].to_string(),
                span: m.start()..end,
            });
            pos = end;
        }

        (calls, errors)
    }
}

/// Split source text into runnable and documentation streams.
///
/// If both marker lines are present and well ordered, the block between them
/// (markers included) is excised first and appears in neither stream.
pub fn split(text: &str, conventions: &Conventions) -> Split {
    let mut errors = Vec::new();
    let text = excise_marker_block(text, conventions, &mut errors);

    let finder = CallFinder::new(&conventions.namespace);
    let (calls, find_errors) = finder.find(&text);
    errors.extend(find_errors);

    let mut runnable = String::with_capacity(text.len());
    let mut documentation = String::new();
    let mut cursor = 0;
    for call in &calls {
        runnable.push_str(&text[cursor..call.span.start]);
        documentation.push_str(&text[call.span.clone()]);
        cursor = call.span.end;
    }
    runnable.push_str(&text[cursor..]);

    Split {
        runnable,
        documentation,
        calls,
        errors,
    }
}

/// Remove the authoring-support block delimited by the marker lines.
///
/// Mirrors the original convention: the begin match swallows surrounding
/// whitespace, and the block is only excised when the begin marker comes
/// first and the end marker finishes before the end of the buffer.
fn excise_marker_block(
    text: &str,
    conventions: &Conventions,
    errors: &mut Vec<ExtractError>,
) -> String {
    let begin = Regex::new(&format!(r"\s*{}\s*", regex::escape(&conventions.begin_marker)))
        .expect("begin marker pattern");
    let end = Regex::new(&format!(r"\s*{}\s*", regex::escape(&conventions.end_marker)))
        .expect("end marker pattern");

    let (Some(b), Some(e)) = (begin.find(text), end.find(text)) else {
        return text.to_string();
    };

    if b.start() > e.end() {
        errors.push(ExtractError::MalformedMarkerBlock {
            reason: "end marker appears before begin marker".to_string(),
        });
        return text.to_string();
    }
    if e.end() >= text.len() {
        errors.push(ExtractError::MalformedMarkerBlock {
            reason: "marker block extends to the end of the buffer".to_string(),
        });
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    out.push_str(&text[..b.start()]);
    out.push_str(&text[e.end()..]);
    out
}
