//! Point-in-time statistics snapshot.

/// A snapshot of a `Team`'s current activity.
///
/// Computed for inspection only; the testable property is only that
/// under quiescence the snapshot matches reality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Statistics {
    /// Number of idle workers, eligible for reuse.
    pub idle_count: usize,
    /// Number of workers handed a task and not yet returned.
    pub busy_count: usize,
    /// Number of tasks backlogged because the factory last declined.
    pub pending_count: usize,
}
