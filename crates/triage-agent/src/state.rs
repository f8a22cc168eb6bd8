use serde::{Deserialize, Serialize};

/// State threaded through the triage pipeline.
///
/// Neither pipeline step adds or removes fields; the classification result
/// is logged, not stored here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriageState {
    pub user_query: String,
}

impl TriageState {
    pub fn new(user_query: impl Into<String>) -> Self {
        Self {
            user_query: user_query.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_single_field_object() {
        let state = TriageState::new("Hello, how are you?");
        assert_eq!(
            serde_json::to_value(&state).unwrap(),
            serde_json::json!({"user_query": "Hello, how are you?"})
        );
    }

    #[test]
    fn test_missing_query_is_rejected() {
        assert!(serde_json::from_str::<TriageState>("{}").is_err());
    }
}
