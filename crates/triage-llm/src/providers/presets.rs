use std::collections::HashMap;

use triage_core::config::ModelConfig;
use triage_core::error::{Result, TriageError};

/// A named provider preset for OpenAI-compatible APIs.
pub struct ProviderPreset {
    pub default_base_url: &'static str,
    pub needs_api_key: bool,
    /// Environment variable conventionally holding this provider's key.
    pub api_key_env: Option<&'static str>,
    pub extra_headers: &'static [(&'static str, &'static str)],
}

/// Look up a provider preset by name.
pub fn get_preset(provider: &str) -> Option<ProviderPreset> {
    match provider {
        "groq" => Some(ProviderPreset {
            default_base_url: "https://api.groq.com/openai/v1/chat/completions",
            needs_api_key: true,
            api_key_env: Some("GROQ_API_KEY"),
            extra_headers: &[],
        }),
        "openai" => Some(ProviderPreset {
            default_base_url: "https://api.openai.com/v1/chat/completions",
            needs_api_key: true,
            api_key_env: Some("OPENAI_API_KEY"),
            extra_headers: &[],
        }),
        "openrouter" => Some(ProviderPreset {
            default_base_url: "https://openrouter.ai/api/v1/chat/completions",
            needs_api_key: true,
            api_key_env: Some("OPENROUTER_API_KEY"),
            extra_headers: &[("X-Title", "triage")],
        }),
        "together" => Some(ProviderPreset {
            default_base_url: "https://api.together.xyz/v1/chat/completions",
            needs_api_key: true,
            api_key_env: Some("TOGETHER_API_KEY"),
            extra_headers: &[],
        }),
        "ollama" => Some(ProviderPreset {
            default_base_url: "http://localhost:11434/v1/chat/completions",
            needs_api_key: false,
            api_key_env: None,
            extra_headers: &[],
        }),
        _ => None,
    }
}

/// Build extra headers from a preset + user config overrides.
pub fn build_extra_headers(
    preset: Option<&ProviderPreset>,
    user_headers: &HashMap<String, String>,
) -> Vec<(String, String)> {
    let mut headers: Vec<(String, String)> = preset
        .map(|p| p.extra_headers)
        .unwrap_or_default()
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    for (k, v) in user_headers {
        // User overrides take precedence
        if let Some(pos) = headers.iter().position(|(hk, _)| hk == k) {
            headers[pos].1 = v.clone();
        } else {
            headers.push((k.clone(), v.clone()));
        }
    }

    headers
}

/// Resolve the chat-completions URL: explicit `base_url` wins over the preset.
pub fn resolve_base_url(config: &ModelConfig) -> Result<String> {
    if let Some(url) = &config.base_url {
        return Ok(url.clone());
    }
    get_preset(&config.provider)
        .map(|p| p.default_base_url.to_string())
        .ok_or_else(|| TriageError::UnsupportedProvider(config.provider.clone()))
}

/// Fail with an authentication error when the provider needs a key and the
/// config carries none. Never touches the network.
pub fn require_credentials(config: &ModelConfig) -> Result<()> {
    let Some(preset) = get_preset(&config.provider) else {
        // Custom endpoints decide for themselves
        return Ok(());
    };
    if preset.needs_api_key && config.api_key().is_none() {
        let hint = preset
            .api_key_env
            .map(|var| format!(" (set {})", var))
            .unwrap_or_default();
        return Err(TriageError::Authentication(format!(
            "no API key configured for provider '{}'{}",
            config.provider, hint
        )));
    }
    Ok(())
}

/// Fill a missing API key from the preset's environment variable.
///
/// Returns `true` if a key was taken from the environment.
pub fn apply_env_credentials(config: &mut ModelConfig) -> bool {
    apply_credentials_from(config, |var| std::env::var(var).ok())
}

/// Same as [`apply_env_credentials`] with an injectable lookup.
pub fn apply_credentials_from(
    config: &mut ModelConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> bool {
    if config.api_key().is_some() {
        return false;
    }
    let Some(var) = get_preset(&config.provider).and_then(|p| p.api_key_env) else {
        return false;
    };
    match lookup(var).filter(|v| !v.trim().is_empty()) {
        Some(key) => {
            config.api_key = Some(key);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_listed_preset_resolves() {
        for name in ["groq", "openai", "openrouter", "together", "ollama"] {
            assert!(get_preset(name).is_some(), "missing preset {}", name);
        }
        assert!(get_preset("unknown").is_none());
    }

    #[test]
    fn test_groq_is_default_provider_preset() {
        let preset = get_preset(&ModelConfig::default().provider).unwrap();
        assert_eq!(
            preset.default_base_url,
            "https://api.groq.com/openai/v1/chat/completions"
        );
        assert_eq!(preset.api_key_env, Some("GROQ_API_KEY"));
        assert!(preset.needs_api_key);
    }

    #[test]
    fn test_user_headers_override_preset() {
        let preset = get_preset("openrouter");
        let mut user = HashMap::new();
        user.insert("X-Title".to_string(), "custom".to_string());
        user.insert("X-Extra".to_string(), "1".to_string());

        let headers = build_extra_headers(preset.as_ref(), &user);
        assert_eq!(headers.len(), 2);
        assert!(headers.contains(&("X-Title".to_string(), "custom".to_string())));
        assert!(headers.contains(&("X-Extra".to_string(), "1".to_string())));
    }

    #[test]
    fn test_resolve_base_url() {
        let config = ModelConfig::default();
        assert_eq!(
            resolve_base_url(&config).unwrap(),
            "https://api.groq.com/openai/v1/chat/completions"
        );

        let config = config.with_base_url("http://127.0.0.1:9/chat");
        assert_eq!(resolve_base_url(&config).unwrap(), "http://127.0.0.1:9/chat");

        let config = ModelConfig {
            provider: "mystery".into(),
            ..ModelConfig::default()
        };
        assert!(matches!(
            resolve_base_url(&config),
            Err(TriageError::UnsupportedProvider(_))
        ));
    }

    #[test]
    fn test_missing_key_is_authentication_error() {
        let err = require_credentials(&ModelConfig::default()).unwrap_err();
        assert!(matches!(err, TriageError::Authentication(_)));
        assert!(err.to_string().contains("GROQ_API_KEY"));
    }

    #[test]
    fn test_keyless_provider_needs_no_credentials() {
        let config = ModelConfig {
            provider: "ollama".into(),
            ..ModelConfig::default()
        };
        assert!(require_credentials(&config).is_ok());
    }

    #[test]
    fn test_apply_credentials_from_lookup() {
        let mut config = ModelConfig::default();
        let applied = apply_credentials_from(&mut config, |var| {
            (var == "GROQ_API_KEY").then(|| "gsk_from_env".to_string())
        });
        assert!(applied);
        assert_eq!(config.api_key(), Some("gsk_from_env"));
    }

    #[test]
    fn test_apply_credentials_keeps_explicit_key() {
        let mut config = ModelConfig::default().with_api_key("explicit");
        let applied = apply_credentials_from(&mut config, |_| Some("env".to_string()));
        assert!(!applied);
        assert_eq!(config.api_key(), Some("explicit"));
    }

    #[test]
    fn test_unexpanded_reference_fails_and_is_backfilled() {
        let mut config = ModelConfig::default().with_api_key("${GROQ_API_KEY}");
        assert!(matches!(
            require_credentials(&config),
            Err(TriageError::Authentication(_))
        ));

        let applied = apply_credentials_from(&mut config, |_| Some("gsk_real".to_string()));
        assert!(applied);
        assert_eq!(config.api_key(), Some("gsk_real"));
    }

    #[test]
    fn test_apply_credentials_ignores_blank_env() {
        let mut config = ModelConfig::default();
        assert!(!apply_credentials_from(&mut config, |_| Some("  ".to_string())));
        assert!(config.api_key.is_none());
    }
}
