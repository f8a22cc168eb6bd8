pub mod providers;
pub mod structured;

use triage_core::config::ModelConfig;
use triage_core::error::{Result, TriageError};
use triage_core::traits::LlmClient;

pub use providers::openai::OpenAiClient;
pub use providers::presets::{apply_env_credentials, require_credentials};
pub use structured::{invoke_structured, parse_structured};

/// Create an LLM client based on the provider name.
///
/// Every supported provider speaks the OpenAI chat-completions protocol. A
/// provider without a preset is accepted only when an explicit `base_url`
/// is configured.
pub fn create_client(config: &ModelConfig) -> Result<Box<dyn LlmClient>> {
    if providers::presets::get_preset(&config.provider).is_none() && config.base_url.is_none() {
        return Err(TriageError::UnsupportedProvider(config.provider.clone()));
    }
    Ok(Box::new(OpenAiClient::new()))
}
