use futures::future::BoxFuture;
use tracing::info;

use triage_core::error::Result;

use crate::graph::Node;

/// Placeholder step: logs that it ran and hands the state on untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughNode;

impl<S: Send + 'static> Node<S> for PassthroughNode {
    fn run(&self, state: S) -> BoxFuture<'_, Result<S>> {
        Box::pin(async move {
            info!("Test node triggered");
            Ok(state)
        })
    }
}
