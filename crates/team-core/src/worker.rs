//! The `Worker` capability.
//!
//! A worker is an execution context that runs submitted 0-arg callables
//! one at a time, in its own context. `Team` is itself a `Worker` — that
//! is what makes pools of pools possible.

/// A unit of work: a 0-arg callable, run once, never retried.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// A shared, type-erased worker handle.
///
/// Workers created for a pool are exclusively owned by that pool in the
/// sense that they are never handed out to callers — but a worker must
/// be able to re-enter the coordinator to hand itself back once its own
/// task completes, so the handle is reference-counted rather than
/// uniquely owned.
pub type WorkerHandle = std::sync::Arc<dyn Worker>;

/// Accepts submitted work and can be told to retire.
///
/// **Contract:**
/// - `submit` must not run `task` synchronously in the caller's context;
///   it schedules `task` to run later, on this worker's own context.
/// - `retire` requests termination after any already-submitted items
///   finish. It is idempotent: calling it twice has no additional effect.
///
/// A worker used as a *coordinator* (see `Team::new`) must additionally
/// guarantee that successive submitted items execute strictly one at a
/// time, in submission order, with happens-before between consecutive
/// items. That guarantee is not expressible as a distinct trait in a
/// useful way, so a coordinator is simply a `Worker` whose
/// implementation happens to serialize; callers pick an implementation
/// (e.g. `team::LockWorker`) that upholds it.
pub trait Worker: Send + Sync {
    /// Schedule `task` to run on this worker's own execution context.
    fn submit(&self, task: Task);

    /// Request termination after any already-submitted items finish.
    /// Idempotent.
    fn retire(&self);
}

/// A `Worker` used to serialize coordination, not to run tasks directly.
///
/// Not a distinct trait: a coordinator is exactly a `Worker` whose
/// implementation happens to uphold the serialization guarantee
/// documented above. This alias exists purely so call sites that
/// specifically mean "the serializing one" can say so.
pub type Coordinator = dyn Worker;
