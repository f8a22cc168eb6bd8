pub mod graph;
pub mod nodes;
pub mod pipeline;
pub mod schema;
pub mod state;

pub use graph::{CompiledGraph, ExecutionResult, GraphBuilder, Node, NodeResult, END, START};
pub use nodes::{PassthroughNode, TriageNode};
pub use pipeline::build_triage_graph;
pub use schema::{Intent, Sentiment, TriageResult};
pub use state::TriageState;
