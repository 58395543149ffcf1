#[cfg(test)]
#[path = "query_outcome_test.rs"]
mod tests;

pub const NO_ANSWER_TEXT: &str = "No answer found";
pub const NOT_FOUND_TEXT: &str = "No answer found. Your query has been logged.";
pub const FAILED_TEXT: &str = "Sorry, something went wrong. Please try again.";
pub const NETWORK_TEXT: &str =
    "Unable to reach Sahayak. Please check your connection and try again.";

/// Every way a submitted query can end. Each one has a display string, so a
/// pending exchange can always be resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueryOutcome {
    Answered(String),
    NotFound,
    Unavailable(String),
    Failed,
    Network,
}

impl QueryOutcome {
    pub fn answered(answer: Option<String>) -> QueryOutcome {
        match answer {
            Some(text) if !text.trim().is_empty() => return QueryOutcome::Answered(text),
            _ => return QueryOutcome::Answered(NO_ANSWER_TEXT.to_string()),
        }
    }

    pub fn display_text(&self) -> String {
        match self {
            QueryOutcome::Answered(text) => return text.to_string(),
            QueryOutcome::NotFound => return NOT_FOUND_TEXT.to_string(),
            QueryOutcome::Unavailable(message) => return message.to_string(),
            QueryOutcome::Failed => return FAILED_TEXT.to_string(),
            QueryOutcome::Network => return NETWORK_TEXT.to_string(),
        }
    }

    pub fn is_error(&self) -> bool {
        return !matches!(self, QueryOutcome::Answered(_));
    }
}
