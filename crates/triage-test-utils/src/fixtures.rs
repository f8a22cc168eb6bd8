use std::io::Write;

use tempfile::NamedTempFile;

use triage_core::config::ModelConfig;

/// Default model config with a placeholder key, enough to pass credential checks.
pub fn model_config() -> ModelConfig {
    ModelConfig::default().with_api_key("gsk_test_key")
}

/// A well-formed triage answer as the model would return it.
pub fn triage_json(intent: &str, sentiment: &str, pii_detected: bool) -> String {
    serde_json::json!({
        "intent": intent,
        "sentiment": sentiment,
        "pii_detected": pii_detected,
    })
    .to_string()
}

/// Write `content` to a temporary `.toml` file that lives as long as the handle.
pub fn write_config(content: &str) -> NamedTempFile {
    let mut tmp = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("create temp file");
    tmp.write_all(content.as_bytes()).expect("write toml");
    tmp
}
