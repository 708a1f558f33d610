//! LLM prompt for question generation

/// Builds the question-generation prompt for one page
pub struct QuestionPromptBuilder<'a> {
    page_text: &'a str,
    max_questions: usize,
}

impl<'a> QuestionPromptBuilder<'a> {
    /// Create a new prompt builder
    pub fn new(page_text: &'a str, max_questions: usize) -> Self {
        Self {
            page_text,
            max_questions,
        }
    }

    /// Build the complete prompt
    pub fn build(&self) -> String {
        let mut prompt = String::with_capacity(self.page_text.len() + 1024);

        prompt.push_str(QUESTION_INSTRUCTIONS);
        prompt.push_str(&format!(
            "\n\nWrite at most {} questions.\n\n",
            self.max_questions
        ));

        prompt.push_str("Page text:\n");
        prompt.push_str("---\n");
        prompt.push_str(self.page_text.trim());
        prompt.push_str("\n---\n\n");

        prompt.push_str(OUTPUT_FORMAT_REMINDER);
        prompt
    }
}

const QUESTION_INSTRUCTIONS: &str = r#"You are building a question/answer dataset from a document.
Read the page below and write questions a reader could answer from this page alone.

Rules:
- Each question must be answerable from the page text
- Ask about facts, definitions, procedures and relationships, not page layout
- One idea per question
- Do not number the questions
- Do not repeat a question in different words"#;

const OUTPUT_FORMAT_REMINDER: &str = r#"Output format (JSON object only, no additional text):
{
  "questions": ["first question?", "second question?"]
}"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_includes_text() {
        let prompt = QuestionPromptBuilder::new("  Photosynthesis converts light.  ", 5).build();
        assert!(prompt.contains("---\nPhotosynthesis converts light.\n---"));
    }

    #[test]
    fn test_prompt_includes_limit() {
        let prompt = QuestionPromptBuilder::new("text", 3).build();
        assert!(prompt.contains("at most 3 questions"));
    }

    #[test]
    fn test_prompt_requests_questions_key() {
        let prompt = QuestionPromptBuilder::new("text", 5).build();
        assert!(prompt.contains(r#""questions""#));
        assert!(prompt.contains("JSON object only"));
    }
}
