//! `LockWorker` — a `Worker` that serializes without owning a thread.
//!
//! Rather than pinning execution to one dedicated thread (see
//! `ThreadWorker`), `LockWorker` lets whichever caller happens to find
//! the queue empty become the temporary "pumping" thread: it drains the
//! queue, item by item, until no work remains, then hands the role to
//! the next submitter. Coordinator execution therefore may migrate
//! across threads, but a mutex-protected FIFO queue and a single
//! `pumping` flag still guarantee strict one-at-a-time, submission-order
//! execution with happens-before between consecutive items. This is the
//! default coordinator for `Team::with_limit` when no loop-backed
//! alternative is supplied.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use team_core::{Task, Worker};

pub struct LockWorker {
    queue: Mutex<VecDeque<Task>>,
    pumping: AtomicBool,
}

impl Default for LockWorker {
    fn default() -> Self {
        Self::new()
    }
}

impl LockWorker {
    pub fn new() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            pumping: AtomicBool::new(false),
        }
    }

    /// Drain the queue on the calling thread until it is empty, unless
    /// another thread is already draining it.
    fn pump(&self) {
        if self.pumping.swap(true, Ordering::AcqRel) {
            // Someone else is already the pumping thread; they will see
            // our item because they re-check the queue before yielding
            // the role.
            return;
        }
        loop {
            let next = self.queue.lock().unwrap().pop_front();
            match next {
                Some(task) => task(),
                None => {
                    self.pumping.store(false, Ordering::Release);
                    // A submitter may have pushed, seen `pumping` still
                    // true, and returned without draining in the window
                    // between our pop_front() and this store. Re-check
                    // before actually yielding the role.
                    if self.queue.lock().unwrap().is_empty() {
                        break;
                    }
                    if self.pumping.swap(true, Ordering::AcqRel) {
                        break;
                    }
                }
            }
        }
    }
}

impl Worker for LockWorker {
    fn submit(&self, task: Task) {
        self.queue.lock().unwrap().push_back(task);
        self.pump();
    }

    fn retire(&self) {
        // A coordinator has no execution context of its own to tear
        // down; retiring it just stops accepting new items. The queue
        // is drained by design before this is ever called (spec-level
        // shutdown ordering retires the coordinator only once it is
        // already fully idle), so there is nothing left to do.
    }
}
