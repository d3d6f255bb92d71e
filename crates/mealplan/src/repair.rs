//! Lenient JSON parsing for model output.
//!
//! Model answers are frequently near-miss JSON. Parsing is attempted strictly
//! first; on failure a fixed, ordered chain of text rewrites is applied once and
//! the result is parsed again. The chain is deliberately small: it recovers
//! quoting mistakes, trailing commas and raw control characters in strings, and
//! nothing else.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde_json::Value;

use crate::GenerationError;

static RE_BARE_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([{,]\s*)([A-Za-z_][A-Za-z0-9_]*)\s*:").unwrap());
static RE_TRAILING_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*([\]}])").unwrap());
static RE_STRING_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?s)"((?:[^"\\]|\\.)*)""#).unwrap());
static RE_CONTROL_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\n\r\t]+").unwrap());

/// A named text rewrite in the repair chain.
#[derive(Clone, Copy, Debug)]
pub struct Repair {
    pub name: &'static str,
    pub apply: fn(&str) -> String,
}

/// Repairs in the order they are applied. The order is part of the contract:
/// later rewrites assume the quoting produced by earlier ones.
pub const REPAIRS: &[Repair] = &[
    Repair {
        name: "single_to_double_quotes",
        apply: single_to_double_quotes,
    },
    Repair {
        name: "quote_bare_keys",
        apply: quote_bare_keys,
    },
    Repair {
        name: "strip_trailing_commas",
        apply: strip_trailing_commas,
    },
    Repair {
        name: "collapse_string_whitespace",
        apply: collapse_string_whitespace,
    },
];

/// Replaces every single quote with a double quote.
///
/// Lossy: an apostrophe inside a value ("chef's") becomes a stray quote.
pub fn single_to_double_quotes(input: &str) -> String {
    input.replace('\'', "\"")
}

/// Quotes identifier keys that directly follow `{` or `,`.
pub fn quote_bare_keys(input: &str) -> String {
    RE_BARE_KEY
        .replace_all(input, r#"${1}"${2}":"#)
        .into_owned()
}

/// Drops a comma that only has whitespace before a closing `]` or `}`.
pub fn strip_trailing_commas(input: &str) -> String {
    RE_TRAILING_COMMA.replace_all(input, "${1}").into_owned()
}

/// Inside every string literal, turns runs of newlines, carriage returns and
/// tabs into one space and trims the value.
pub fn collapse_string_whitespace(input: &str) -> String {
    RE_STRING_LITERAL
        .replace_all(input, |caps: &Captures| {
            let collapsed = RE_CONTROL_RUN.replace_all(&caps[1], " ");
            format!("\"{}\"", collapsed.trim())
        })
        .into_owned()
}

/// Runs the whole repair chain once.
pub fn repair_json(input: &str) -> String {
    REPAIRS
        .iter()
        .fold(input.to_owned(), |text, repair| (repair.apply)(&text))
}

/// Parses `input` strictly, falling back to [`repair_json`] once.
pub fn parse_lenient(input: &str) -> Result<Value, GenerationError> {
    let strict_err = match serde_json::from_str(input) {
        Ok(value) => return Ok(value),
        Err(e) => e,
    };

    tracing::warn!(error = %strict_err, "Strict JSON parse failed, applying repairs");

    let cleaned = repair_json(input);

    serde_json::from_str(&cleaned).map_err(|e| {
        tracing::error!(error = %e, cleaned = %cleaned, "Failed to parse JSON after repairs");
        GenerationError::UnrecoverableJson { cleaned }
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_repair_order() {
        let names: Vec<_> = REPAIRS.iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            [
                "single_to_double_quotes",
                "quote_bare_keys",
                "strip_trailing_commas",
                "collapse_string_whitespace"
            ]
        );
    }

    #[test]
    fn test_single_to_double_quotes() {
        assert_eq!(single_to_double_quotes("{'a': 'b'}"), r#"{"a": "b"}"#);
    }

    #[test]
    fn test_quote_bare_keys() {
        assert_eq!(
            quote_bare_keys(r#"{name: "x", calories: 400}"#),
            r#"{"name": "x", "calories": 400}"#
        );
        assert_eq!(
            quote_bare_keys("{\n  meals: []\n}"),
            "{\n  \"meals\": []\n}"
        );
    }

    #[test]
    fn test_quote_bare_keys_leaves_quoted_keys_and_values() {
        let input = r#"{"name": "Breakfast: Oatmeal", "date": "2026-10-19"}"#;
        assert_eq!(quote_bare_keys(input), input);
    }

    #[test]
    fn test_strip_trailing_commas() {
        assert_eq!(
            strip_trailing_commas(r#"{"a": [1, 2, ], "b": 3,}"#),
            r#"{"a": [1, 2], "b": 3}"#
        );
        assert_eq!(strip_trailing_commas("[1,\n]"), "[1]");
    }

    #[test]
    fn test_collapse_string_whitespace() {
        assert_eq!(
            collapse_string_whitespace("{\"d\": \"  Hot oats\n\twith\r\nberries \"}"),
            r#"{"d": "Hot oats with berries"}"#
        );
    }

    #[test]
    fn test_collapse_string_whitespace_respects_escaped_quotes() {
        let input = r#"{"d": "a \"quoted\" word"}"#;
        assert_eq!(collapse_string_whitespace(input), input);
    }

    #[test]
    fn test_strict_parse_needs_no_repair() {
        let value = parse_lenient(r#"{"meals": [], "note": "chef's choice"}"#).unwrap();
        assert_eq!(value, json!({"meals": [], "note": "chef's choice"}));
    }

    #[test]
    fn test_recovers_trailing_comma() {
        let value = parse_lenient(r#"{"meals": [{"calories": 400},],}"#).unwrap();
        assert_eq!(value, json!({"meals": [{"calories": 400}]}));
    }

    #[test]
    fn test_recovers_single_quotes_and_bare_keys() {
        let value = parse_lenient("{meals: [{name: 'Lunch: Salad', calories: 500}]}").unwrap();
        assert_eq!(
            value,
            json!({"meals": [{"name": "Lunch: Salad", "calories": 500}]})
        );
    }

    #[test]
    fn test_recovers_raw_newlines_in_strings() {
        let value = parse_lenient("{\"description\": \"Line one\nline two\"}").unwrap();
        assert_eq!(value, json!({"description": "Line one line two"}));
    }

    #[test]
    fn test_apostrophe_in_broken_input_is_unrecoverable() {
        let result = parse_lenient(r#"{"description": "chef's special",}"#);

        match result {
            Err(GenerationError::UnrecoverableJson { cleaned }) => {
                assert_eq!(cleaned, r#"{"description": "chef"s special"}"#);
            }
            other => panic!("expected unrecoverable JSON, got {other:?}"),
        }
    }

    #[test]
    fn test_garbage_is_unrecoverable() {
        assert!(matches!(
            parse_lenient("{ this is not json at all"),
            Err(GenerationError::UnrecoverableJson { .. })
        ));
    }

    #[test]
    fn test_reparsing_own_output_is_stable() {
        let first = parse_lenient("{meals: [{name: 'Dinner: Stew', calories: 700,}],}").unwrap();
        let second = parse_lenient(&first.to_string()).unwrap();
        let third = parse_lenient(&serde_json::to_string_pretty(&second).unwrap()).unwrap();

        assert_eq!(first, second);
        assert_eq!(second, third);
    }

    #[test]
    fn test_repair_chain_is_idempotent() {
        let inputs = [
            "{meals: [{name: 'Dinner: Stew', calories: 700}]}",
            "{'description': 'Hearty', 'calories': 650}",
            r#"{"meals": [{"calories": 400},],}"#,
            "{\"description\": \"  Line one\n\tline two  \"}",
        ];

        for input in inputs {
            let once = repair_json(input);
            let twice = repair_json(&once);

            let once: serde_json::Value = serde_json::from_str(&once).unwrap();
            let twice: serde_json::Value = serde_json::from_str(&twice).unwrap();

            assert_eq!(once, twice, "input: {input}");
        }
    }
}
