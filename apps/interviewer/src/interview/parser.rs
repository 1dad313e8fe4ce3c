//! Response parser: turns free-form generated text into a typed struct.
//!
//! Generated text is untrusted and often malformed. Three strategies are tried
//! in order, stopping at the first that yields a value of the target type:
//!
//! 1. the whole text as JSON,
//! 2. the contents of each fenced code block (```` ``` ```` with an optional
//!    language tag) that holds a `{...}` object,
//! 3. every balanced `{...}` span in the text, left to right. Braces inside
//!    JSON string literals do not count towards nesting.
//!
//! Failure is an ordinary value (`ParseError::Unparseable`), never a panic.

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

/// How much of the offending text is kept for diagnostics.
const EXCERPT_CHARS: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("could not extract structured data from response: {excerpt:?}")]
    Unparseable { excerpt: String },
}

/// Parses `text` into `T` using the layered fallback strategy.
pub fn parse<T: DeserializeOwned>(text: &str) -> Result<T, ParseError> {
    let trimmed = text.trim();

    if !trimmed.is_empty() {
        if let Ok(value) = serde_json::from_str::<T>(trimmed) {
            return Ok(value);
        }

        for block in fenced_blocks(trimmed) {
            if let Ok(value) = serde_json::from_str::<T>(block) {
                debug!("Parsed structured response from fenced block");
                return Ok(value);
            }
        }

        for span in brace_spans(trimmed) {
            if let Ok(value) = serde_json::from_str::<T>(span) {
                debug!("Parsed structured response from embedded object");
                return Ok(value);
            }
        }
    }

    Err(ParseError::Unparseable {
        excerpt: trimmed.chars().take(EXCERPT_CHARS).collect(),
    })
}

/// Yields the trimmed body of every fenced block whose body is a `{...}` object.
fn fenced_blocks(text: &str) -> Vec<&str> {
    let mut blocks = Vec::new();
    let mut rest = text;

    while let Some(open) = rest.find("```") {
        let after_open = &rest[open + 3..];
        // Optional language tag, e.g. ```json
        let tag_len = after_open
            .find(|c: char| !c.is_ascii_alphanumeric() && c != '_' && c != '-')
            .unwrap_or(after_open.len());
        let body_start = &after_open[tag_len..];

        let Some(close) = body_start.find("```") else {
            break;
        };

        let body = body_start[..close].trim();
        if body.starts_with('{') && body.ends_with('}') {
            blocks.push(body);
        }
        rest = &body_start[close + 3..];
    }

    blocks
}

/// Yields every balanced `{...}` span, ordered by its opening brace.
fn brace_spans(text: &str) -> Vec<&str> {
    text.char_indices()
        .filter(|(_, c)| *c == '{')
        .filter_map(|(start, _)| matching_close(text, start).map(|end| &text[start..=end]))
        .collect()
}

/// Byte index of the `}` that closes the `{` at `start`, skipping braces that
/// appear inside double-quoted strings.
fn matching_close(text: &str, start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(start + offset);
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use serde_json::{json, Value};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Verdict {
        grade: String,
        score: u32,
    }

    #[test]
    fn test_direct_document_round_trips() {
        let doc = json!({
            "questions": [{"question": "Why {braces}?", "skill": "Lookup"}],
            "reasoning": "nested {\"quoted\"} text",
            "count": 2
        });
        let text = serde_json::to_string_pretty(&doc).unwrap();
        let parsed: Value = parse(&text).unwrap();
        assert_eq!(parsed, doc);
    }

    #[test]
    fn test_fenced_block_with_leading_prose() {
        let text = "Here is my evaluation of the answer:\n\n```json\n{\"grade\": \"Satisfactory\", \"score\": 91}\n```\nLet me know if you need more.";
        let verdict: Verdict = parse(text).unwrap();
        assert_eq!(
            verdict,
            Verdict {
                grade: "Satisfactory".to_string(),
                score: 91
            }
        );
    }

    #[test]
    fn test_fenced_block_without_language_tag() {
        let text = "Result:\n```\n{\"grade\": \"Unsatisfactory\", \"score\": 30}\n```";
        let verdict: Verdict = parse(text).unwrap();
        assert_eq!(verdict.score, 30);
    }

    #[test]
    fn test_skips_fenced_block_of_wrong_shape() {
        let text = "```json\n{\"unrelated\": true}\n```\nand then ```json\n{\"grade\": \"Satisfactory\", \"score\": 80}\n```";
        let verdict: Verdict = parse(text).unwrap();
        assert_eq!(verdict.score, 80);
    }

    #[test]
    fn test_brace_scan_finds_object_in_prose() {
        let text = "Sure! The verdict is {\"grade\": \"Partly Acceptable\", \"score\": 65} as requested.";
        let verdict: Verdict = parse(text).unwrap();
        assert_eq!(verdict.grade, "Partly Acceptable");
    }

    #[test]
    fn test_brace_scan_ignores_braces_inside_strings() {
        let text = "Note {not json}. Output: {\"grade\": \"Use {curly} }} braces\", \"score\": 70} trailing";
        let verdict: Verdict = parse(text).unwrap();
        assert_eq!(verdict.grade, "Use {curly} }} braces");
        assert_eq!(verdict.score, 70);
    }

    #[test]
    fn test_brace_scan_tries_later_candidates() {
        let text = "{\"other\": 1} then {\"grade\": \"Satisfactory\", \"score\": 99}";
        let verdict: Verdict = parse(text).unwrap();
        assert_eq!(verdict.score, 99);
    }

    #[test]
    fn test_brace_scan_finds_nested_target() {
        let text = "wrapper {\"meta\": \"x\", \"inner\": {\"grade\": \"Satisfactory\", \"score\": 77}, oops}";
        let verdict: Verdict = parse(text).unwrap();
        assert_eq!(verdict.score, 77);
    }

    #[test]
    fn test_garbage_is_unparseable() {
        let result: Result<Value, ParseError> = parse("I'm sorry, I can't help with { that");
        assert!(matches!(result, Err(ParseError::Unparseable { .. })));
    }

    #[test]
    fn test_empty_text_is_unparseable() {
        let result: Result<Verdict, ParseError> = parse("   \n ");
        assert_eq!(
            result,
            Err(ParseError::Unparseable {
                excerpt: String::new()
            })
        );
    }

    #[test]
    fn test_unparseable_excerpt_is_truncated() {
        let garbage = "é".repeat(500);
        let Err(ParseError::Unparseable { excerpt }) = parse::<Value>(&garbage) else {
            panic!("garbage must not parse");
        };
        assert_eq!(excerpt.chars().count(), EXCERPT_CHARS);
    }

    #[test]
    fn test_unterminated_fence_falls_through_to_brace_scan() {
        let text = "```json\n{\"grade\": \"Satisfactory\", \"score\": 85}";
        let verdict: Verdict = parse(text).unwrap();
        assert_eq!(verdict.score, 85);
    }
}
