//! `ThreadWorker` — a `Worker` backed by one dedicated OS thread.
//!
//! Each `ThreadWorker` owns a private, unbounded FIFO channel. Items
//! submitted to it run, in submission order, on the single thread it
//! spawned at construction. This is the worker half of the bundled
//! thread-limited pool built by `Team::with_limit`.

use std::thread;

use crossbeam_channel::{bounded, unbounded, Sender};
use team_core::{OneShotGate, Task, Worker};

enum Job {
    Run(Task),
    Retire,
}

pub struct ThreadWorker {
    sender: Sender<Job>,
    quit: OneShotGate,
}

impl ThreadWorker {
    /// Spawn a worker thread named `name`, with an unbounded pending-task
    /// queue. Fails only if the OS refuses to create the thread (e.g.
    /// resource limits) — same failure mode a `WorkerFactory` should
    /// treat as a decline, not a fatal error.
    pub fn spawn(name: impl Into<String>) -> std::io::Result<Self> {
        Self::spawn_with_queue_depth(name, None)
    }

    /// As `spawn`, but `queue_depth` bounds the worker's own
    /// pending-submission channel. `submit` blocks the calling thread
    /// while the bound is full. `None` leaves it unbounded.
    pub fn spawn_with_queue_depth(
        name: impl Into<String>,
        queue_depth: Option<usize>,
    ) -> std::io::Result<Self> {
        let (sender, receiver) = match queue_depth {
            Some(depth) => bounded::<Job>(depth),
            None => unbounded::<Job>(),
        };
        thread::Builder::new().name(name.into()).spawn(move || {
            for job in receiver.iter() {
                match job {
                    Job::Run(task) => task(),
                    Job::Retire => break,
                }
            }
        })?;
        Ok(Self {
            sender,
            quit: OneShotGate::new(),
        })
    }
}

impl Worker for ThreadWorker {
    fn submit(&self, task: Task) {
        // The receiving end only disappears once this worker has
        // retired; a send after that is a stray dispatch to an already
        // gone worker and is silently dropped, matching `retire`'s
        // "after any already-submitted items finish" contract.
        let _ = self.sender.send(Job::Run(task));
    }

    fn retire(&self) {
        if self.quit.is_set() {
            return;
        }
        self.quit.set();
        let _ = self.sender.send(Job::Retire);
    }
}
