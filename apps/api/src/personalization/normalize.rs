//! Text Normalizer: cleans model output so it has a better chance of parsing as JSON.
//!
//! Two rules only:
//! 1. Lines that are nothing but a truncation placeholder (`...`, `, ...`, `...,`) are dropped.
//! 2. A comma followed only by whitespace and then `]` or `}` is removed.
//!
//! Nothing else in the text is touched.

use once_cell::sync::Lazy;
use regex::Regex;

static TRAILING_COMMA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r",(\s*[\]}])").expect("trailing comma pattern is valid"));

const ELLIPSIS: &str = "...";

/// Applies both normalization rules and returns the cleaned text.
pub fn normalize_json_candidate(text: &str) -> String {
    let kept: Vec<&str> = text
        .lines()
        .filter(|line| !is_placeholder_line(line))
        .collect();

    TRAILING_COMMA
        .replace_all(&kept.join("\n"), "$1")
        .into_owned()
}

/// True when the trimmed line is the ellipsis token, optionally with a single
/// comma before or after it (whitespace between the two allowed).
fn is_placeholder_line(line: &str) -> bool {
    let trimmed = line.trim();
    let body = trimmed
        .strip_prefix(',')
        .or_else(|| trimmed.strip_suffix(','))
        .unwrap_or(trimmed);
    body.trim() == ELLIPSIS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drops_placeholder_variants() {
        for placeholder in ["...", ",...", "...,", ", ...", "... ,", "   ...   "] {
            let input = format!("[\n1,\n{placeholder}\n2\n]");
            assert_eq!(
                normalize_json_candidate(&input),
                "[\n1,\n2\n]",
                "placeholder {placeholder:?} was not removed"
            );
        }
    }

    #[test]
    fn test_keeps_lines_that_merely_contain_an_ellipsis() {
        let input = "{\n\"reason\": \"wait...\",\n\"n\": 1\n}";
        assert_eq!(normalize_json_candidate(input), input);
    }

    #[test]
    fn test_keeps_double_comma_placeholder() {
        // Only a single comma is part of a placeholder line.
        let input = ",...,";
        assert_eq!(normalize_json_candidate(input), ",...,");
    }

    #[test]
    fn test_removes_trailing_comma_before_closer() {
        assert_eq!(normalize_json_candidate("[1, 2, ]"), "[1, 2 ]");
        assert_eq!(normalize_json_candidate("{\"a\": 1,\n}"), "{\"a\": 1\n}");
    }

    #[test]
    fn test_truncated_array_becomes_parseable() {
        let input = r#"{
  "items": [
    {"id": "ml-101"},
    {"id": "ml-102"},
    ...
  ]
}"#;
        let cleaned = normalize_json_candidate(input);
        let value: serde_json::Value = serde_json::from_str(&cleaned).unwrap();
        assert_eq!(value["items"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_trailing_placeholder_with_leading_comma() {
        let input = "{\"items\": [\n  {\"id\": \"a\"}\n  , ...\n]}";
        let cleaned = normalize_json_candidate(input);
        assert!(!cleaned.contains("..."));
        let value: serde_json::Value = serde_json::from_str(&cleaned).unwrap();
        assert_eq!(value["items"][0]["id"], "a");
    }

    #[test]
    fn test_preserves_line_order() {
        let input = "a\n...\nb\n, ...\nc";
        assert_eq!(normalize_json_candidate(input), "a\nb\nc");
    }

    #[test]
    fn test_no_placeholder_line_survives() {
        let input = "...\n...\n,...\nx\n...,";
        let cleaned = normalize_json_candidate(input);
        assert!(cleaned.lines().all(|l| !is_placeholder_line(l)));
        assert_eq!(cleaned, "x");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize_json_candidate(""), "");
    }
}
