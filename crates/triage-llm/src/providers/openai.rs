use futures::future::BoxFuture;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use triage_core::config::ModelConfig;
use triage_core::error::{Result, TriageError};
use triage_core::traits::LlmClient;
use triage_core::types::*;

use super::presets::{build_extra_headers, get_preset, resolve_base_url};

/// OpenAI-compatible client. Works with Groq, OpenAI, OpenRouter, Ollama, vLLM, etc.
pub struct OpenAiClient {
    http: Client,
}

impl OpenAiClient {
    pub fn new() -> Self {
        Self {
            http: Client::new(),
        }
    }
}

impl Default for OpenAiClient {
    fn default() -> Self {
        Self::new()
    }
}

// Request types
#[derive(Serialize)]
pub(crate) struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<OaiMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    temperature: f32,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<OaiResponseFormat<'a>>,
}

#[derive(Serialize)]
pub(crate) struct OaiMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
pub(crate) struct OaiResponseFormat<'a> {
    r#type: &'static str,
    json_schema: &'a ResponseSchema,
}

// Response types
#[derive(Deserialize, Debug)]
struct ChatCompletion {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<OaiUsage>,
}

#[derive(Deserialize, Debug)]
struct Choice {
    message: ChoiceMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    refusal: Option<String>,
}

#[derive(Deserialize, Debug)]
struct OaiUsage {
    #[serde(default)]
    prompt_tokens: u64,
    #[serde(default)]
    completion_tokens: u64,
}

pub(crate) fn build_request<'a>(
    config: &'a ModelConfig,
    messages: &'a [ChatMessage],
    schema: Option<&'a ResponseSchema>,
) -> ChatRequest<'a> {
    ChatRequest {
        model: &config.model_id,
        messages: messages
            .iter()
            .map(|m| OaiMessage {
                role: m.role.as_str(),
                content: &m.content,
            })
            .collect(),
        max_tokens: config.max_tokens,
        temperature: config.temperature,
        stream: false,
        response_format: schema.map(|s| OaiResponseFormat {
            r#type: "json_schema",
            json_schema: s,
        }),
    }
}

pub(crate) fn parse_response(body: &str) -> Result<ChatResponse> {
    let completion: ChatCompletion = serde_json::from_str(body)
        .map_err(|e| TriageError::LlmParse(format!("invalid completion body: {}", e)))?;

    let choice = completion
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| TriageError::LlmParse("completion has no choices".into()))?;

    if let Some(refusal) = choice.message.refusal {
        return Err(TriageError::LlmParse(format!("model refused: {}", refusal)));
    }

    let content = choice.message.content.ok_or_else(|| {
        TriageError::LlmParse(format!(
            "completion has no content (finish_reason: {})",
            choice.finish_reason.as_deref().unwrap_or("unknown")
        ))
    })?;

    Ok(ChatResponse {
        content,
        model: completion.model,
        usage: completion.usage.map(|u| Usage {
            input_tokens: u.prompt_tokens,
            output_tokens: u.completion_tokens,
        }),
    })
}

impl LlmClient for OpenAiClient {
    fn chat(
        &self,
        config: &ModelConfig,
        messages: Vec<ChatMessage>,
        schema: Option<&ResponseSchema>,
    ) -> BoxFuture<'_, Result<ChatResponse>> {
        let config = config.clone();
        let schema = schema.cloned();

        Box::pin(async move {
            let base_url = resolve_base_url(&config)?;
            let body = build_request(&config, &messages, schema.as_ref());

            debug!(
                url = %base_url,
                model = %config.model_id,
                messages = messages.len(),
                structured = schema.is_some(),
                "Sending chat completion request"
            );

            let mut req = self.http.post(&base_url).json(&body);

            if let Some(api_key) = config.api_key() {
                req = req.header("Authorization", format!("Bearer {}", api_key));
            }

            // Apply extra headers from the preset, then the user's overrides
            let preset = get_preset(&config.provider);
            for (k, v) in build_extra_headers(preset.as_ref(), &config.extra_headers) {
                req = req.header(k.as_str(), v.as_str());
            }

            let response = req
                .send()
                .await
                .map_err(|e| TriageError::LlmRequest(e.to_string()))?;

            let status = response.status();
            let text = response
                .text()
                .await
                .map_err(|e| TriageError::LlmRequest(e.to_string()))?;

            if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
                return Err(TriageError::Authentication(format!("HTTP {}: {}", status, text)));
            }
            if !status.is_success() {
                return Err(TriageError::LlmRequest(format!("HTTP {}: {}", status, text)));
            }

            let parsed = parse_response(&text)?;
            if let Some(usage) = parsed.usage {
                debug!(
                    input_tokens = usage.input_tokens,
                    output_tokens = usage.output_tokens,
                    "Chat completion finished"
                );
            }
            Ok(parsed)
        })
    }
}
