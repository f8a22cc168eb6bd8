use std::collections::VecDeque;
use std::sync::Mutex;

use futures::future::BoxFuture;

use triage_core::config::ModelConfig;
use triage_core::error::{Result, TriageError};
use triage_core::traits::LlmClient;
use triage_core::types::{ChatMessage, ChatResponse, ResponseSchema};

/// One call observed by [`MockLlmClient`].
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub config: ModelConfig,
    pub messages: Vec<ChatMessage>,
    pub schema: Option<ResponseSchema>,
}

/// LLM client that replays queued responses in order and records every call.
///
/// A call with nothing queued fails with `LlmRequest`.
#[derive(Default)]
pub struct MockLlmClient {
    responses: Mutex<VecDeque<Result<ChatResponse>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockLlmClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response with `content` as the message text.
    pub fn with_response(self, content: impl Into<String>) -> Self {
        self.push(Ok(ChatResponse::text(content)));
        self
    }

    /// Queue a failure.
    pub fn with_error(self, error: TriageError) -> Self {
        self.push(Err(error));
        self
    }

    fn push(&self, response: Result<ChatResponse>) {
        self.responses
            .lock()
            .expect("mock response queue poisoned")
            .push_back(response);
    }

    /// All calls seen so far, oldest first.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .expect("mock request log poisoned")
            .clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().expect("mock request log poisoned").len()
    }
}

impl LlmClient for MockLlmClient {
    fn chat(
        &self,
        config: &ModelConfig,
        messages: Vec<ChatMessage>,
        schema: Option<&ResponseSchema>,
    ) -> BoxFuture<'_, Result<ChatResponse>> {
        self.requests
            .lock()
            .expect("mock request log poisoned")
            .push(RecordedRequest {
                config: config.clone(),
                messages,
                schema: schema.cloned(),
            });

        let next = self
            .responses
            .lock()
            .expect("mock response queue poisoned")
            .pop_front()
            .unwrap_or_else(|| {
                Err(TriageError::LlmRequest(
                    "MockLlmClient: no response queued".into(),
                ))
            });

        Box::pin(async move { next })
    }
}
