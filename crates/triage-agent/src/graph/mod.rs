//! Step graph — fixed-order sequential execution.
//!
//! A graph is a set of named `Node`s joined by `Edge`s between the `START`
//! marker, node names, and the `END` marker. `GraphBuilder::compile` checks
//! that the edges form one unbranched path from `START` to `END` covering
//! every node, and freezes that path into a `CompiledGraph`.
//!
//! `CompiledGraph::invoke` moves a single state value through each node in
//! path order. The first node error ends the run.

pub mod builder;
pub mod edge;
pub mod executor;
pub mod node;

pub use builder::GraphBuilder;
pub use edge::{Edge, Endpoint, END, START};
pub use executor::{CompiledGraph, ExecutionResult, NodeResult};
pub use node::Node;
