//! Product advisor state and prompt.

/// Shown whenever the advisor cannot answer
pub const FALLBACK_ANSWER: &str =
    "Sorry, I'm having a little trouble right now. Please browse the product list below!";

/// System prompt for the hosted model
pub const SYSTEM_INSTRUCTION: &str = "You are a sexual-health product advisor at THE SHIELD POINT. \
Answer in a friendly, discreet and professional way. Focus on explaining the strengths of each \
product that fits what the customer is looking for.";

/// The user turn sent to the model
#[must_use]
pub fn build_prompt(question: &str, catalog_json: &str) -> String {
    format!(
        "User asks: {question}. Based on our products: {catalog_json}, suggest the best option \
         and explain why. Keep it discreet, professional, and helpful."
    )
}

/// Latest exchange with the advisor
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AdvisorState {
    /// A request is in flight
    pub loading: bool,
    /// The question being (or last) answered
    pub question: Option<String>,
    /// Latest answer, possibly the fallback
    pub answer: Option<String>,
}

impl AdvisorState {
    /// Start a request for `question`
    ///
    /// Returns the trimmed question, or `None` when it is blank or another
    /// request is still loading.
    pub fn begin(&mut self, question: &str) -> Option<String> {
        let question = question.trim();
        if question.is_empty() || self.loading {
            return None;
        }
        self.loading = true;
        self.question = Some(question.to_string());
        Some(question.to_string())
    }

    /// Store the answer and clear `loading`
    pub fn finish(&mut self, answer: String) {
        self.loading = false;
        self.answer = Some(answer);
    }
}
