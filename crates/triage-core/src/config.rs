use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TriageError};

/// Query used when neither the config file nor the command line supplies one.
pub const SAMPLE_QUERY: &str = "Hello, how are you?";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub run: RunConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default = "default_model_id")]
    pub model_id: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default)]
    pub extra_headers: HashMap<String, String>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model_id: default_model_id(),
            api_key: None,
            base_url: None,
            max_tokens: None,
            temperature: default_temperature(),
            extra_headers: HashMap::new(),
        }
    }
}

impl ModelConfig {
    /// Set the API key.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// The API key, if one is set and usable.
    ///
    /// Blank values and `${VAR}` references left unexpanded by
    /// [`AppConfig::load`] count as missing.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty() && !is_env_placeholder(k))
    }
}

/// True for a whole-value `${VAR}` reference.
fn is_env_placeholder(value: &str) -> bool {
    value
        .strip_prefix("${")
        .and_then(|rest| rest.strip_suffix('}'))
        .is_some_and(|name| !name.contains('}'))
}

fn default_provider() -> String { "groq".to_string() }
fn default_model_id() -> String { "openai/gpt-oss-20b".to_string() }
fn default_temperature() -> f32 { 0.6 }

/// Settings for a single pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default = "default_user_query")]
    pub user_query: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            user_query: default_user_query(),
        }
    }
}

fn default_user_query() -> String { SAMPLE_QUERY.to_string() }

impl AppConfig {
    /// Load config from a TOML file, with env var expansion.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|_| TriageError::ConfigNotFound(path.display().to_string()))?;

        // Expand ${ENV_VAR} references
        let expanded = expand_env_vars(&content);

        toml::from_str(&expanded).map_err(|e| TriageError::Config(e.to_string()))
    }
}

/// Expand `${ENV_VAR}` patterns in a string.
fn expand_env_vars(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '$' && chars.peek() == Some(&'{') {
            chars.next(); // consume '{'
            let mut var_name = String::new();
            for c in chars.by_ref() {
                if c == '}' {
                    break;
                }
                var_name.push(c);
            }
            match std::env::var(&var_name) {
                Ok(val) => result.push_str(&val),
                // Keep original if env var not set
                Err(_) => result.push_str(&format!("${{{}}}", var_name)),
            }
        } else {
            result.push(c);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_env_vars() {
        std::env::set_var("TEST_TRIAGE_VAR", "hello");
        let result = expand_env_vars("key = \"${TEST_TRIAGE_VAR}\"");
        assert_eq!(result, "key = \"hello\"");
        std::env::remove_var("TEST_TRIAGE_VAR");
    }

    #[test]
    fn test_expand_env_vars_missing() {
        let result = expand_env_vars("key = \"${NONEXISTENT_TRIAGE_VAR}\"");
        assert_eq!(result, "key = \"${NONEXISTENT_TRIAGE_VAR}\"");
    }

    #[test]
    fn test_defaults_from_empty_toml() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.model.provider, "groq");
        assert_eq!(config.model.model_id, "openai/gpt-oss-20b");
        assert_eq!(config.model.temperature, 0.6);
        assert!(config.model.api_key.is_none());
        assert!(config.model.max_tokens.is_none());
        assert_eq!(config.run.user_query, SAMPLE_QUERY);
    }

    #[test]
    fn test_model_section_overrides() {
        let toml_str = r#"
[model]
provider = "openrouter"
model_id = "meta-llama/llama-3.3-70b"
temperature = 0.2
max_tokens = 512

[model.extra_headers]
X-Title = "triage-dev"
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.model.provider, "openrouter");
        assert_eq!(config.model.temperature, 0.2);
        assert_eq!(config.model.max_tokens, Some(512));
        assert_eq!(
            config.model.extra_headers.get("X-Title").map(String::as_str),
            Some("triage-dev")
        );
    }

    #[test]
    fn test_blank_api_key_is_treated_as_missing() {
        let config = ModelConfig::default().with_api_key("   ");
        assert_eq!(config.api_key(), None);

        let config = ModelConfig::default().with_api_key("gsk_abc");
        assert_eq!(config.api_key(), Some("gsk_abc"));
    }

    #[test]
    fn test_unexpanded_env_reference_is_treated_as_missing() {
        let toml_str = r#"
[model]
api_key = "${NONEXISTENT_TRIAGE_KEY_VAR}"
"#;
        let config: AppConfig = toml::from_str(&expand_env_vars(toml_str)).unwrap();
        assert_eq!(
            config.model.api_key.as_deref(),
            Some("${NONEXISTENT_TRIAGE_KEY_VAR}")
        );
        assert_eq!(config.model.api_key(), None);

        // A key that merely contains `$` is still a key
        let config = ModelConfig::default().with_api_key("gsk_${abc}xyz");
        assert_eq!(config.api_key(), Some("gsk_${abc}xyz"));
    }
}
