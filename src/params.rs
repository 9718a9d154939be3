//! Quasi-JSON argument normalization and parsing.
//!
//! Annotation arguments are written as loose object literals: bare keys,
//! single-quoted or backtick strings, line continuations. Normalization
//! rewrites that into strict JSON, then `serde_json` does the actual
//! parsing. The argument must reduce to exactly one top-level value.
//!
//! The passes run in a fixed order:
//! 1. pull every string literal out into a placeholder table, re-encoding
//!    its content as a JSON double-quoted string;
//! 2. double-quote every bare object key;
//! 3. put the literals back;
//! 4. drop backslash-newline line continuations;
//! 5. strict parse.

use crate::scan;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static RE_BARE_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\w+)\b\s*:").unwrap());

// Placeholders are framed in control characters, which cannot survive in a
// JSON-encoded literal (they come back as \u00XX escapes), so a restored
// literal can never introduce a spurious placeholder.
static RE_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("\u{1}(\\d+)\u{2}").unwrap());

static RE_CONTINUATION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\\\r?\n").unwrap());

/// Parse one annotation call's raw argument text into a strict JSON value.
pub fn parse_argument(raw: &str) -> Result<Value, serde_json::Error> {
    serde_json::from_str(normalize(raw).trim())
}

/// Rewrite quasi-JSON into strict JSON without parsing it.
pub fn normalize(raw: &str) -> String {
    let (masked, literals) = mask_literals(raw);

    let keyed = RE_BARE_KEY.replace_all(&masked, "\"${1}\":");

    let restored = RE_PLACEHOLDER.replace_all(&keyed, |caps: &regex::Captures| {
        let n: usize = caps[1].parse().expect("placeholder index");
        literals[n].clone()
    });

    RE_CONTINUATION.replace_all(&restored, "").into_owned()
}

/// Replace every string literal with a numbered placeholder, returning the
/// masked text and the literals, each re-encoded as a JSON string.
fn mask_literals(text: &str) -> (String, Vec<String>) {
    let mut out = String::with_capacity(text.len());
    let mut literals = Vec::new();
    let mut pos = 0;

    while let Some(lit) = scan::next_literal(text, pos) {
        out.push_str(&text[pos..lit.start]);
        out.push('\u{1}');
        out.push_str(&literals.len().to_string());
        out.push('\u{2}');

        let decoded = decode_literal(lit.inner(text), lit.delim);
        literals.push(encode_json_string(&decoded));
        pos = lit.end;
    }
    out.push_str(&text[pos..]);
    (out, literals)
}

/// Decode the source-level content of a string literal to the raw text it
/// denotes, whichever delimiter it was written with.
fn decode_literal(inner: &str, _delim: u8) -> String {
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{c}'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) => out.push(decoded),
                    None => {
                        out.push_str("\\u");
                        out.push_str(&hex);
                    }
                }
            }
            // Escaped line break is a line continuation: it denotes nothing.
            Some('\n') => {}
            Some('\r') => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
            }
            // Covers \', \", \`, \\, \/ and anything else: the character
            // stands for itself.
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

/// Encode raw text as a JSON double-quoted string literal.
fn encode_json_string(text: &str) -> String {
    serde_json::to_string(text).expect("strings always serialize")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bare_keys_are_quoted() {
        let v = parse_argument("{name: \"A\", optional: true}").unwrap();
        assert_eq!(v, json!({"name": "A", "optional": true}));
    }

    #[test]
    fn single_quoted_strings_become_json_strings() {
        let v = parse_argument("{name: 'A'}").unwrap();
        assert_eq!(v, json!({"name": "A"}));
    }

    #[test]
    fn mixed_quoting_with_embedded_quotes() {
        // The normalization example from the original: single-quoted value,
        // double-quoted value with escaped quotes and an apostrophe.
        let v = parse_argument(r#"{name: 'A', description: "it's a \"test\""}"#).unwrap();
        assert_eq!(v, json!({"name": "A", "description": "it's a \"test\""}));
    }

    #[test]
    fn escaped_single_quote_in_single_quoted_string() {
        let v = parse_argument(r"{a: 'it\'s'}").unwrap();
        assert_eq!(v, json!({"a": "it's"}));
    }

    #[test]
    fn double_quotes_inside_single_quoted_string() {
        let v = parse_argument(r#"{a: 'say "hi"'}"#).unwrap();
        assert_eq!(v, json!({"a": "say \"hi\""}));
    }

    #[test]
    fn backtick_string_with_raw_newline() {
        let v = parse_argument("{a: `line one\nline two`}").unwrap();
        assert_eq!(v, json!({"a": "line one\nline two"}));
    }

    #[test]
    fn colon_inside_string_is_not_a_key() {
        let v = parse_argument(r#"{a: "not:akey", b: 1}"#).unwrap();
        assert_eq!(v, json!({"a": "not:akey", "b": 1}));
    }

    #[test]
    fn numeric_bare_key() {
        let v = parse_argument("{1: 'one'}").unwrap();
        assert_eq!(v, json!({"1": "one"}));
    }

    #[test]
    fn line_continuation_outside_strings() {
        let v = parse_argument("{a: 1, \\\n b: 2}").unwrap();
        assert_eq!(v, json!({"a": 1, "b": 2}));
    }

    #[test]
    fn line_continuation_inside_double_quoted_string() {
        let v = parse_argument("{a: \"one \\\ntwo\"}").unwrap();
        assert_eq!(v, json!({"a": "one two"}));
    }

    #[test]
    fn non_ascii_passes_through() {
        let v = parse_argument(r"{a: 'café'}").unwrap();
        assert_eq!(v, json!({"a": "café"}));
    }

    #[test]
    fn unicode_escape_is_decoded() {
        let v = parse_argument(r#"{a: "\u0041"}"#).unwrap();
        assert_eq!(v, json!({"a": "A"}));
    }

    #[test]
    fn full_parameter_object() {
        let v = parse_argument(
            "{parent: \"Hello\", name: \"World\", returns: \"nothing\", \
             parameters: [{name: \"A\", type: \"Number\", optional: true, defaultValue: 17}]}",
        )
        .unwrap();
        assert_eq!(
            v,
            json!({
                "parent": "Hello",
                "name": "World",
                "returns": "nothing",
                "parameters": [
                    {"name": "A", "type": "Number", "optional": true, "defaultValue": 17}
                ]
            })
        );
    }

    #[test]
    fn arrays_pass_through() {
        let v = parse_argument("[{name: 'a'}, {name: 'b'}]").unwrap();
        assert_eq!(v, json!([{"name": "a"}, {"name": "b"}]));
    }

    #[test]
    fn two_top_level_values_fail() {
        assert!(parse_argument("{a: 1}, {b: 2}").is_err());
    }

    #[test]
    fn empty_argument_fails() {
        assert!(parse_argument("").is_err());
        assert!(parse_argument("   ").is_err());
    }

    #[test]
    fn unquoted_value_fails() {
        assert!(parse_argument("{a: undefined}").is_err());
    }

    #[test]
    fn normalize_is_pure_rewriting() {
        assert_eq!(normalize("{a: 'x'}"), "{\"a\": \"x\"}");
    }
}
