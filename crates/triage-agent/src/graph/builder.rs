use std::collections::{HashMap, HashSet};

use tracing::debug;

use triage_core::error::{Result, TriageError};

use super::edge::{Edge, Endpoint, END, START};
use super::executor::CompiledGraph;
use super::node::Node;

/// Collects nodes and edges; `compile` validates them into a runnable path.
pub struct GraphBuilder<S> {
    nodes: Vec<(String, Box<dyn Node<S>>)>,
    edges: Vec<Edge>,
}

impl<S: Send + 'static> Default for GraphBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Send + 'static> GraphBuilder<S> {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// Register a node under `name`.
    pub fn add_node(mut self, name: impl Into<String>, node: impl Node<S>) -> Self {
        let node: Box<dyn Node<S>> = Box::new(node);
        self.nodes.push((name.into(), node));
        self
    }

    /// Register a transition. Use [`START`] and [`END`] for the entry and exit.
    pub fn add_edge(mut self, from: impl AsRef<str>, to: impl AsRef<str>) -> Self {
        self.edges.push(Edge::new(from.as_ref(), to.as_ref()));
        self
    }

    /// Validate the graph and freeze its execution order.
    ///
    /// The edges must form exactly one path `START -> ... -> END` that visits
    /// every registered node once.
    pub fn compile(self) -> Result<CompiledGraph<S>> {
        if self.nodes.is_empty() {
            return Err(TriageError::Graph("graph has no nodes".into()));
        }

        let mut by_name: HashMap<String, Box<dyn Node<S>>> = HashMap::new();
        for (name, node) in self.nodes {
            if name.is_empty() || name == START || name == END {
                return Err(TriageError::Graph(format!(
                    "'{}' is not a valid node name",
                    name
                )));
            }
            if by_name.contains_key(&name) {
                return Err(TriageError::Graph(format!("duplicate node '{}'", name)));
            }
            by_name.insert(name, node);
        }

        let mut next: HashMap<Endpoint, Endpoint> = HashMap::new();
        for edge in self.edges {
            match &edge.from {
                Endpoint::End => {
                    return Err(TriageError::Graph(format!(
                        "edge {} -> {} leaves END",
                        edge.from, edge.to
                    )));
                }
                Endpoint::Node(name) if !by_name.contains_key(name) => {
                    return Err(TriageError::NodeNotFound(name.clone()));
                }
                _ => {}
            }
            match &edge.to {
                Endpoint::Start => {
                    return Err(TriageError::Graph(format!(
                        "edge {} -> {} enters START",
                        edge.from, edge.to
                    )));
                }
                Endpoint::Node(name) if !by_name.contains_key(name) => {
                    return Err(TriageError::NodeNotFound(name.clone()));
                }
                _ => {}
            }
            if let Some(existing) = next.get(&edge.from) {
                return Err(TriageError::Graph(format!(
                    "'{}' has more than one outgoing edge ({} and {})",
                    edge.from, existing, edge.to
                )));
            }
            next.insert(edge.from, edge.to);
        }

        // Walk the single path from START.
        let mut order: Vec<String> = Vec::with_capacity(by_name.len());
        let mut seen: HashSet<String> = HashSet::new();
        let mut current = Endpoint::Start;
        loop {
            let target = next.get(&current).ok_or_else(|| {
                TriageError::Graph(format!(
                    "'{}' has no outgoing edge; path never reaches END",
                    current
                ))
            })?;
            match target {
                Endpoint::End => break,
                Endpoint::Node(name) => {
                    if !seen.insert(name.clone()) {
                        return Err(TriageError::Graph(format!(
                            "cycle detected at node '{}'",
                            name
                        )));
                    }
                    order.push(name.clone());
                    current = target.clone();
                }
                Endpoint::Start => {
                    return Err(TriageError::Graph("path loops back to START".into()));
                }
            }
        }

        let mut unreachable: Vec<&str> = by_name
            .keys()
            .filter(|name| !seen.contains(*name))
            .map(String::as_str)
            .collect();
        if !unreachable.is_empty() {
            unreachable.sort_unstable();
            return Err(TriageError::Graph(format!(
                "nodes unreachable from START: {}",
                unreachable.join(", ")
            )));
        }

        debug!(steps = ?order, "Graph compiled");

        let steps = order
            .into_iter()
            .map(|name| {
                let node = by_name
                    .remove(&name)
                    .ok_or_else(|| TriageError::NodeNotFound(name.clone()))?;
                Ok((name, node))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(CompiledGraph::new(steps))
    }
}
