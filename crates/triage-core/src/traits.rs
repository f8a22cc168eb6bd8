use futures::future::BoxFuture;

use crate::config::ModelConfig;
use crate::error::Result;
use crate::types::*;

/// LLM client — single-shot chat completion.
pub trait LlmClient: Send + Sync + 'static {
    /// Send a chat request and wait for the complete response.
    ///
    /// When `schema` is set the provider is asked to constrain its output to
    /// that JSON schema; decoding the content is left to the caller.
    fn chat(
        &self,
        config: &ModelConfig,
        messages: Vec<ChatMessage>,
        schema: Option<&ResponseSchema>,
    ) -> BoxFuture<'_, Result<ChatResponse>>;
}
