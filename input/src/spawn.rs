//! Local task spawning.
//!
//! Event handlers are synchronous; the decode that follows a selection is
//! not. Components hand the remaining work to a [`LocalSpawner`], which in
//! the browser is `wasm_bindgen_futures::spawn_local`.

use std::future::Future;
use std::pin::Pin;

/// A unit of work spawned by a component. Runs on the event-loop thread.
pub type LocalTask = Pin<Box<dyn Future<Output = ()>>>;

/// Trait for running tasks on the current thread, enabling mock
/// implementations that let tests drive completion order by hand.
pub trait LocalSpawner {
    fn spawn_local(&self, task: LocalTask);
}
