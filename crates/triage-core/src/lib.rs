pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use config::{AppConfig, ModelConfig};
pub use error::{Result, TriageError};
pub use types::*;
