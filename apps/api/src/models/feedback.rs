use serde::{Deserialize, Serialize};

/// Structured ATS analysis returned by the AI collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiFeedback {
    /// 0..=100.
    pub score: u8,
    pub suggestions: Vec<String>,
    pub summary: String,
}

pub const ANALYSIS_FAILED_SUGGESTION: &str = "Failed to analyze resume due to a server-side error. \
     Please check your connection and try again.";
pub const ANALYSIS_FAILED_SUMMARY: &str = "Analysis could not be completed.";
pub const SUMMARY_FAILED_TEXT: &str = "Failed to generate summary. Please try again.";

impl AiFeedback {
    /// Deterministic stand-in used whenever the collaborator fails.
    pub fn placeholder() -> Self {
        Self {
            score: 0,
            suggestions: vec![ANALYSIS_FAILED_SUGGESTION.to_string()],
            summary: ANALYSIS_FAILED_SUMMARY.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_is_deterministic() {
        let a = AiFeedback::placeholder();
        assert_eq!(a, AiFeedback::placeholder());
        assert_eq!(a.score, 0);
        assert_eq!(a.suggestions.len(), 1);
        assert_eq!(a.summary, ANALYSIS_FAILED_SUMMARY);
    }
}
