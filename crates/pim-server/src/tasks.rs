//! Detached background tasks
//!
//! Fire-and-forget execution: a spawned unit of work carries its own error
//! boundary, returns nothing to the spawner, and is never awaited. Failures
//! are observable only through their side effects (progress messages, logs).

use std::future::Future;

/// Spawn a unit of work that nobody waits on.
///
/// The future's error, if any, is logged and dropped at the task boundary.
/// Callers must not depend on the task's outcome; anything that needs to
/// reach an observer has to be published by the task itself before it
/// returns an error.
pub fn spawn_detached<F>(name: &'static str, fut: F)
where
    F: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    tokio::spawn(async move {
        if let Err(e) = fut.await {
            tracing::error!(task = name, error = ?e, "detached task failed");
        }
    });
}
