pub mod passthrough;
pub mod triage;

pub use passthrough::PassthroughNode;
pub use triage::TriageNode;
