//! Structured output: ask the model for a JSON-schema-constrained answer and
//! decode it into a typed value.

use serde::de::DeserializeOwned;
use tracing::warn;

use triage_core::config::ModelConfig;
use triage_core::error::{Result, TriageError};
use triage_core::traits::LlmClient;
use triage_core::types::{ChatMessage, ResponseSchema};

/// Send `messages` with `schema` as the response format and decode the reply.
pub async fn invoke_structured<T: DeserializeOwned>(
    llm: &dyn LlmClient,
    config: &ModelConfig,
    messages: Vec<ChatMessage>,
    schema: &ResponseSchema,
) -> Result<T> {
    let response = llm.chat(config, messages, Some(schema)).await?;
    parse_structured(&response.content).map_err(|e| {
        warn!(schema = %schema.name, error = %e, "Structured output did not match schema");
        e
    })
}

/// Decode model output into `T`. A surrounding markdown code fence is
/// tolerated; anything else that does not deserialize is an error.
pub fn parse_structured<T: DeserializeOwned>(content: &str) -> Result<T> {
    let cleaned = strip_code_fences(content);
    serde_json::from_str(&cleaned).map_err(|e| {
        TriageError::LlmParse(format!("{} in output: {}", e, preview(&cleaned, 200)))
    })
}

fn strip_code_fences(text: &str) -> String {
    let trimmed = text.trim();

    // Try ```json ... ``` first
    if let Some(rest) = trimmed.strip_prefix("```json") {
        if let Some(end) = rest.find("```") {
            return rest[..end].trim().to_string();
        }
    }

    // Try ``` ... ```
    if let Some(rest) = trimmed.strip_prefix("```") {
        // Skip optional language tag on same line
        let content_start = rest.find('\n').map_or(0, |p| p + 1);
        let rest = &rest[content_start..];
        if let Some(end) = rest.find("```") {
            return rest[..end].trim().to_string();
        }
    }

    trimmed.to_string()
}

fn preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{}...", cut)
}
