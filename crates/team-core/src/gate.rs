//! A one-shot "has this been requested yet" flag.
//!
//! Shared between `Team` (its quit-requested flag) and the thread-backed
//! worker (its own retirement flag) instead of duplicating a
//! bool-plus-check twice.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{Result, TeamError};

/// A flag that starts unset, can be set exactly once (subsequent `set`
/// calls are no-ops), and can be checked from any thread.
#[derive(Debug, Default)]
pub struct OneShotGate(AtomicBool);

impl OneShotGate {
    pub const fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    /// Mark the gate as set. Idempotent.
    pub fn set(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether the gate has been set.
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Fail with `TeamError::ShuttingDown` if the gate is set.
    pub fn check(&self) -> Result<()> {
        if self.is_set() {
            Err(TeamError::ShuttingDown)
        } else {
            Ok(())
        }
    }
}
