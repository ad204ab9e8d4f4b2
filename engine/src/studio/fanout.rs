//! Fan-Out Executor
//!
//! Runs the selected non-seed tools concurrently against the shared context.
//! All invocations start together and the group settles only when every one
//! of them has settled; outcomes land by index in a fixed vector, so no task
//! can block, cancel, or overwrite a sibling. Failure handling is carried in
//! the outcome itself; this layer never returns an error.

use crate::catalog::{Catalog, GenerationError, ToolId, ToolPayload};
use futures::future;

/// The settled result of one fan-out task. Created once, never mutated.
#[derive(Debug)]
pub struct TaskOutcome {
    /// The tool that ran
    pub tool: ToolId,

    /// Its payload, or the reason it failed
    pub result: Result<ToolPayload, GenerationError>,
}

/// Invoke every tool concurrently and wait for the whole group to settle.
///
/// Outcomes are returned in `tools` order, one per entry.
pub async fn run(catalog: &Catalog, tools: &[ToolId], context: &str) -> Vec<TaskOutcome> {
    let tasks = tools.iter().map(|&tool| async move {
        let result = catalog.invoke(tool, context).await;
        TaskOutcome { tool, result }
    });

    future::join_all(tasks).await
}
