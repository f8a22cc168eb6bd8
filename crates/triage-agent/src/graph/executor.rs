use std::time::Instant;

use tracing::{debug, error, info, info_span, Instrument};
use uuid::Uuid;

use triage_core::error::Result;

use super::node::Node;

/// Timing record for one executed node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeResult {
    /// Which node was executed.
    pub node_id: String,
    /// Execution time in milliseconds.
    pub elapsed_ms: u64,
}

/// Result of executing an entire graph.
#[derive(Debug, Clone)]
pub struct ExecutionResult<S> {
    /// State returned by the last node.
    pub state: S,
    /// Per-node results in execution order.
    pub node_results: Vec<NodeResult>,
    /// Total execution time in milliseconds.
    pub total_elapsed_ms: u64,
}

/// A validated graph, reduced to its execution order.
///
/// Built by [`super::GraphBuilder::compile`].
pub struct CompiledGraph<S> {
    steps: Vec<(String, Box<dyn Node<S>>)>,
}

impl<S: Send + 'static> CompiledGraph<S> {
    pub(crate) fn new(steps: Vec<(String, Box<dyn Node<S>>)>) -> Self {
        Self { steps }
    }

    /// Node names in execution order.
    pub fn steps(&self) -> Vec<&str> {
        self.steps.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Run every node in order and return the final state.
    pub async fn invoke(&self, state: S) -> Result<S> {
        self.execute(state).await.map(|r| r.state)
    }

    /// Run every node in order, also reporting per-node timings.
    ///
    /// A node error is returned as-is and no further nodes run.
    pub async fn execute(&self, state: S) -> Result<ExecutionResult<S>> {
        let run_id = Uuid::new_v4();
        let span = info_span!("graph_run", %run_id);
        self.run_steps(state).instrument(span).await
    }

    async fn run_steps(&self, initial_state: S) -> Result<ExecutionResult<S>> {
        let start = Instant::now();
        let mut state = initial_state;
        let mut node_results = Vec::with_capacity(self.steps.len());

        for (node_id, node) in &self.steps {
            debug!(node_id = %node_id, "Executing graph node");

            let node_start = Instant::now();
            state = match node.run(state).await {
                Ok(next) => next,
                Err(e) => {
                    error!(node_id = %node_id, error = %e, "Graph node failed");
                    return Err(e);
                }
            };
            let elapsed_ms = millis_since(node_start);

            debug!(node_id = %node_id, elapsed_ms, "Node execution complete");
            node_results.push(NodeResult {
                node_id: node_id.clone(),
                elapsed_ms,
            });
        }

        let total_elapsed_ms = millis_since(start);
        info!(
            steps = node_results.len(),
            total_elapsed_ms,
            "Graph run complete"
        );

        Ok(ExecutionResult {
            state,
            node_results,
            total_elapsed_ms,
        })
    }
}

/// Whole milliseconds since `start`, saturating at `u64::MAX`.
fn millis_since(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use futures::future::BoxFuture;
    use triage_core::error::TriageError;

    use super::*;
    use crate::graph::{GraphBuilder, END, START};

    /// Appends its tag to the state and to a shared call log.
    struct Tagger {
        tag: &'static str,
        calls: Arc<Mutex<Vec<&'static str>>>,
    }

    impl Node<Vec<String>> for Tagger {
        fn run(&self, mut state: Vec<String>) -> BoxFuture<'_, Result<Vec<String>>> {
            Box::pin(async move {
                self.calls.lock().unwrap().push(self.tag);
                state.push(self.tag.to_string());
                Ok(state)
            })
        }
    }

    struct Failing;

    impl Node<Vec<String>> for Failing {
        fn run(&self, _state: Vec<String>) -> BoxFuture<'_, Result<Vec<String>>> {
            Box::pin(async { Err(TriageError::LlmRequest("boom".into())) })
        }
    }

    fn tagger(tag: &'static str, calls: &Arc<Mutex<Vec<&'static str>>>) -> Tagger {
        Tagger {
            tag,
            calls: Arc::clone(calls),
        }
    }

    #[test]
    fn test_millis_since_recent_instant() {
        let start = Instant::now();
        assert!(millis_since(start) < 60_000);
    }

    #[tokio::test]
    async fn test_threads_state_through_nodes_in_order() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let graph = GraphBuilder::new()
            .add_node("a", tagger("a", &calls))
            .add_node("b", tagger("b", &calls))
            .add_node("c", tagger("c", &calls))
            .add_edge(START, "a")
            .add_edge("a", "b")
            .add_edge("b", "c")
            .add_edge("c", END)
            .compile()
            .unwrap();

        let result = graph.execute(vec!["init".to_string()]).await.unwrap();
        assert_eq!(result.state, vec!["init", "a", "b", "c"]);
        assert_eq!(*calls.lock().unwrap(), vec!["a", "b", "c"]);

        let ids: Vec<&str> = result.node_results.iter().map(|r| r.node_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_invoke_runs_each_node_once_per_call() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let graph = GraphBuilder::new()
            .add_node("only", tagger("only", &calls))
            .add_edge(START, "only")
            .add_edge("only", END)
            .compile()
            .unwrap();

        graph.invoke(Vec::new()).await.unwrap();
        graph.invoke(Vec::new()).await.unwrap();
        assert_eq!(*calls.lock().unwrap(), vec!["only", "only"]);
    }

    #[tokio::test]
    async fn test_error_stops_the_run() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let graph = GraphBuilder::new()
            .add_node("a", tagger("a", &calls))
            .add_node("fail", Failing)
            .add_node("c", tagger("c", &calls))
            .add_edge(START, "a")
            .add_edge("a", "fail")
            .add_edge("fail", "c")
            .add_edge("c", END)
            .compile()
            .unwrap();

        let err = graph.invoke(Vec::new()).await.unwrap_err();
        assert!(matches!(err, TriageError::LlmRequest(msg) if msg == "boom"));
        assert_eq!(*calls.lock().unwrap(), vec!["a"]);
    }
}
