//! Prompt assembly for grounded answers

use pageqa_domain::RetrievedChunk;

/// Builds the answer prompt from a question and its retrieved chunks
pub struct AnswerPromptBuilder<'a> {
    question: &'a str,
    context: &'a [RetrievedChunk],
}

impl<'a> AnswerPromptBuilder<'a> {
    /// Start a prompt for `question`
    pub fn new(question: &'a str) -> Self {
        Self { question, context: &[] }
    }

    /// Attach the grounding chunks, in retrieval order
    pub fn with_context(mut self, context: &'a [RetrievedChunk]) -> Self {
        self.context = context;
        self
    }

    /// Render the prompt
    pub fn build(&self) -> String {
        let mut prompt = String::from(
            "Answer the question using only the numbered context passages below. \
             If the context does not contain the answer, say so plainly.\n\n",
        );

        prompt.push_str("Context:\n");
        if self.context.is_empty() {
            prompt.push_str("(no context was found)\n");
        }
        for (i, retrieved) in self.context.iter().enumerate() {
            prompt.push_str(&format!(
                "[{}] ({}, page {})\n{}\n\n",
                i + 1,
                retrieved.chunk.source,
                retrieved.chunk.page,
                retrieved.chunk.text.trim()
            ));
        }

        prompt.push_str(&format!("\nQuestion: {}\n\n", self.question.trim()));
        prompt.push_str("Respond with JSON of the form {\"answer\": \"...\"}.\n");
        prompt
    }
}
