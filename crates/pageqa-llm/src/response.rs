//! Recover JSON payloads from LLM output
//!
//! Models are asked for bare JSON but routinely wrap it in a markdown code
//! fence or surround it with prose. Both the question and the answer stage go
//! through [`parse_json_value`] so the recovery rules live in one place.

use crate::LlmError;
use serde_json::Value;

/// Parse the JSON payload of an LLM response
///
/// Tries, in order: the whole trimmed response, the first fenced code block
/// anywhere in the response, and the outermost `{...}` span.
pub fn parse_json_value(response: &str) -> Result<Value, LlmError> {
    let trimmed = response.trim();
    if trimmed.is_empty() {
        return Err(LlmError::InvalidResponse("Empty response".to_string()));
    }

    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        return Ok(value);
    }

    if let Some(block) = extract_fenced_block(trimmed) {
        if let Ok(value) = serde_json::from_str::<Value>(block.trim()) {
            return Ok(value);
        }
    }

    if let Some(span) = outer_object_span(trimmed) {
        if let Ok(value) = serde_json::from_str::<Value>(span) {
            return Ok(value);
        }
    }

    Err(LlmError::InvalidResponse(format!(
        "No JSON payload found in {} chars of output",
        trimmed.len()
    )))
}

/// Content of the first markdown code fence in `text`
///
/// The language tag after the opening fence (e.g. `json`) is skipped. An
/// unterminated fence yields everything after the opening line.
pub fn extract_fenced_block(text: &str) -> Option<&str> {
    let start = text.find("```")?;
    let after_fence = &text[start + 3..];

    // Skip the language tag line
    let body_start = match after_fence.find('\n') {
        Some(newline) => newline + 1,
        None => return None,
    };
    let body = &after_fence[body_start..];

    match body.find("```") {
        Some(end) => Some(&body[..end]),
        None => Some(body),
    }
}

/// Whether the text looks like an attempt at structured output
pub fn looks_like_json(text: &str) -> bool {
    let trimmed = text.trim_start();
    trimmed.starts_with('{') || trimmed.starts_with('[') || trimmed.starts_with("```")
}

fn outer_object_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    Some(&text[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_json() {
        let value = parse_json_value(r#"{"questions": ["a", "b"]}"#).unwrap();
        assert_eq!(value["questions"][1], "b");
    }

    #[test]
    fn test_parse_json_with_markdown_wrapper() {
        let response = "```json\n{\"questions\": [\"What is X?\"]}\n```";
        let value = parse_json_value(response).unwrap();
        assert_eq!(value["questions"][0], "What is X?");
    }

    #[test]
    fn test_parse_fenced_block_after_prose() {
        let response = "Sure! Here are the questions:\n\n```\n{\"questions\": [\"Q1\"]}\n```\nHope that helps.";
        let value = parse_json_value(response).unwrap();
        assert_eq!(value["questions"][0], "Q1");
    }

    #[test]
    fn test_parse_object_embedded_in_prose() {
        let response = "The answer is {\"answer\": \"42\"} as requested.";
        let value = parse_json_value(response).unwrap();
        assert_eq!(value["answer"], "42");
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(parse_json_value("This is not JSON").is_err());
        assert!(parse_json_value("").is_err());
        assert!(parse_json_value("```json\nnot json\n```").is_err());
    }

    #[test]
    fn test_extract_fenced_block_without_language() {
        let block = extract_fenced_block("```\n{\"key\": \"value\"}\n```").unwrap();
        assert_eq!(block.trim(), r#"{"key": "value"}"#);
    }

    #[test]
    fn test_extract_unterminated_fence() {
        let block = extract_fenced_block("```json\n{\"key\": 1}").unwrap();
        assert_eq!(block.trim(), r#"{"key": 1}"#);
    }

    #[test]
    fn test_no_fence() {
        assert!(extract_fenced_block("plain text").is_none());
    }

    #[test]
    fn test_looks_like_json() {
        assert!(looks_like_json("  {\"a\": 1}"));
        assert!(looks_like_json("```json"));
        assert!(!looks_like_json("The answer is yes."));
    }
}
