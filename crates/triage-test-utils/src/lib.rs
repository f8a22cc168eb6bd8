//! Test helpers shared across the workspace: a scripted LLM client, config
//! fixtures, and an in-memory log sink.

pub mod fixtures;
pub mod logs;
pub mod mock_llm;

pub use logs::LogBuffer;
pub use mock_llm::{MockLlmClient, RecordedRequest};
