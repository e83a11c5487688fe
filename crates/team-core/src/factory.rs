//! The `WorkerFactory` capability — external policy for creating workers.

use crate::worker::WorkerHandle;

/// Produces a fresh worker on demand, or declines.
///
/// Returning `None` signals a policy-based refusal (e.g. a resource
/// limit has been reached). `Team` treats this as a transient condition
/// that drives backlog growth, never as a fatal error.
pub trait WorkerFactory: Send + Sync {
    /// Attempt to create a new worker. `None` means "not right now".
    fn create(&self) -> Option<WorkerHandle>;
}

impl<F> WorkerFactory for F
where
    F: Fn() -> Option<WorkerHandle> + Send + Sync,
{
    fn create(&self) -> Option<WorkerHandle> {
        self()
    }
}
