use triage_core::error::Result;

use crate::graph::{CompiledGraph, GraphBuilder, END, START};
use crate::nodes::{PassthroughNode, TriageNode};
use crate::state::TriageState;

/// Name of the placeholder step.
pub const TEST_NODE: &str = "test_node";
/// Name of the classifier step.
pub const TRIAGE_NODE: &str = "triage_node";

/// Wire `START -> test_node -> triage_node -> END`.
pub fn build_triage_graph(triage: TriageNode) -> Result<CompiledGraph<TriageState>> {
    GraphBuilder::new()
        .add_node(TEST_NODE, PassthroughNode)
        .add_node(TRIAGE_NODE, triage)
        .add_edge(START, TEST_NODE)
        .add_edge(TEST_NODE, TRIAGE_NODE)
        .add_edge(TRIAGE_NODE, END)
        .compile()
}
