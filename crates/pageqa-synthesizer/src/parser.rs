//! Answer extraction from model output

use crate::error::SynthesizerError;
use pageqa_llm::{looks_like_json, parse_json_value};
use serde_json::Value;

/// Extract the answer text from an LLM response
///
/// Accepts `{"answer": "..."}` (bare, fenced or wrapped in prose) and plain
/// prose that does not look like JSON.
pub fn parse_answer(response: &str) -> Result<String, SynthesizerError> {
    let trimmed = response.trim();
    if trimmed.is_empty() {
        return Err(SynthesizerError::EmptyAnswer);
    }

    let structured = looks_like_json(trimmed);
    match parse_json_value(trimmed) {
        Ok(value) => match value.get("answer") {
            Some(Value::String(answer)) => non_empty(answer),
            Some(other) if structured => Err(SynthesizerError::MalformedResponse(format!(
                "answer field is not a string: {}",
                other
            ))),
            None if structured => Err(SynthesizerError::MalformedResponse(
                "missing answer field".to_string(),
            )),
            _ => non_empty(trimmed),
        },
        Err(e) if structured => Err(SynthesizerError::MalformedResponse(e.to_string())),
        Err(_) => non_empty(trimmed),
    }
}

fn non_empty(answer: &str) -> Result<String, SynthesizerError> {
    let answer = answer.trim();
    if answer.is_empty() {
        return Err(SynthesizerError::EmptyAnswer);
    }
    Ok(answer.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_json() {
        assert_eq!(parse_answer(r#"{"answer": "X is a thing."}"#).unwrap(), "X is a thing.");
    }

    #[test]
    fn test_fenced_json() {
        let response = "```json\n{\"answer\": \"Y works by magic.\"}\n```";
        assert_eq!(parse_answer(response).unwrap(), "Y works by magic.");
    }

    #[test]
    fn test_json_inside_prose() {
        let response = "Sure! {\"answer\": \"Forty-two.\"} Hope that helps.";
        assert_eq!(parse_answer(response).unwrap(), "Forty-two.");
    }

    #[test]
    fn test_plain_prose() {
        let response = "  X is a thing described on page one.  ";
        assert_eq!(parse_answer(response).unwrap(), "X is a thing described on page one.");
    }

    #[test]
    fn test_empty_responses() {
        assert!(matches!(parse_answer("   "), Err(SynthesizerError::EmptyAnswer)));
        assert!(matches!(parse_answer(r#"{"answer": "  "}"#), Err(SynthesizerError::EmptyAnswer)));
    }

    #[test]
    fn test_json_without_string_answer() {
        assert!(matches!(
            parse_answer(r#"{"answer": 42}"#),
            Err(SynthesizerError::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_answer(r#"{"reply": "hi"}"#),
            Err(SynthesizerError::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_answer("{\"answer\": \"unterminated"),
            Err(SynthesizerError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_prose_with_braces_is_kept() {
        let response = "The set {a, b} has two members.";
        assert_eq!(parse_answer(response).unwrap(), response);
    }
}
