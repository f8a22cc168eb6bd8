use futures::future::BoxFuture;

use triage_core::error::Result;

/// A single step in the graph: consumes the state and returns the next one.
pub trait Node<S>: Send + Sync + 'static {
    fn run(&self, state: S) -> BoxFuture<'_, Result<S>>;
}
