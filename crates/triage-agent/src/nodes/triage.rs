use std::sync::Arc;

use futures::future::BoxFuture;
use tracing::{info, warn};

use triage_core::config::ModelConfig;
use triage_core::error::Result;
use triage_core::traits::LlmClient;
use triage_core::types::{ChatMessage, ResponseSchema};
use triage_llm::{create_client, invoke_structured, require_credentials};

use crate::graph::Node;
use crate::schema::TriageResult;
use crate::state::TriageState;

/// System instruction for the classification call.
pub const TRIAGE_SYSTEM_PROMPT: &str = "Analyze the following user query and conversation history. Identify the user's primary intent, sentiment, and whether any PII is present.";

/// The two-turn conversation sent for one classification: system, then user.
pub fn build_messages(user_query: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(TRIAGE_SYSTEM_PROMPT),
        ChatMessage::user(user_query),
    ]
}

/// Classifier step: asks the model for intent, sentiment, and PII presence.
///
/// The result is logged and dropped; the state comes back unchanged.
pub struct TriageNode {
    config: ModelConfig,
    llm: Arc<dyn LlmClient>,
    schema: ResponseSchema,
}

impl TriageNode {
    /// Create the node with an explicit client.
    ///
    /// Fails with an authentication error if the provider needs an API key
    /// and `config` has none.
    pub fn new(config: ModelConfig, llm: Arc<dyn LlmClient>) -> Result<Self> {
        require_credentials(&config)?;
        Ok(Self {
            config,
            llm,
            schema: TriageResult::response_schema(),
        })
    }

    /// Create the node with the client matching `config.provider`.
    pub fn from_config(config: ModelConfig) -> Result<Self> {
        let llm: Arc<dyn LlmClient> = Arc::from(create_client(&config)?);
        Self::new(config, llm)
    }

    /// Run one classification call for `user_query`.
    pub async fn classify(&self, user_query: &str) -> Result<TriageResult> {
        if user_query.trim().is_empty() {
            warn!("Classifying an empty query; the result will not be meaningful");
        }
        invoke_structured(
            self.llm.as_ref(),
            &self.config,
            build_messages(user_query),
            &self.schema,
        )
        .await
    }
}

impl Node<TriageState> for TriageNode {
    fn run(&self, state: TriageState) -> BoxFuture<'_, Result<TriageState>> {
        Box::pin(async move {
            info!("Triage node triggered");

            let result = self.classify(&state.user_query).await?;
            info!(response = ?result, "LLM response");
            info!(
                intent = %result.intent,
                sentiment = %result.sentiment,
                pii_detected = result.pii_detected,
                "Triage classification"
            );

            // TODO: write `result` back into TriageState once a downstream step reads it.
            Ok(state)
        })
    }
}
