//! Parse LLM output into question strings

use pageqa_llm::parse_json_value;
use serde_json::Value;
use tracing::{debug, warn};

/// Parse the `questions` array of an LLM response
///
/// Malformed output never fails: unparsable text, a missing `questions` key
/// or a non-list value all yield an empty list. Non-string entries and blank
/// strings are skipped, and at most `max` questions are kept.
pub fn parse_questions(response: &str, max: usize) -> Vec<String> {
    if max == 0 {
        return Vec::new();
    }

    let json = match parse_json_value(response) {
        Ok(json) => json,
        Err(e) => {
            warn!("Question response is not JSON: {}", e);
            return Vec::new();
        }
    };

    let Some(entries) = json.get("questions").and_then(Value::as_array) else {
        warn!("Question response has no 'questions' list");
        return Vec::new();
    };

    let mut questions = Vec::new();
    for (idx, entry) in entries.iter().enumerate() {
        match entry.as_str().map(str::trim) {
            Some(text) if !text.is_empty() => questions.push(text.to_string()),
            Some(_) => debug!("Skipping blank question {}", idx),
            None => debug!("Skipping non-string question {}: {}", idx, entry),
        }
        if questions.len() == max {
            break;
        }
    }

    questions
}
