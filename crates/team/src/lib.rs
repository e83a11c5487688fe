//! # team — a composite worker-pool coordinator
//!
//! `Team` multiplexes submitted work items across a dynamically sized
//! pool of single-task workers, with growth, shrinkage, backlog, and
//! orderly shutdown controlled by a single serializing coordinator.
//! `Team` is itself a worker (see `Team::handle`), which lets pools be
//! composed into larger hierarchies.
//!
//! ```
//! use std::sync::Arc;
//! use team::{LockWorker, TeamConfig};
//! use team::Team;
//!
//! let team = Team::with_limit(TeamConfig::new().worker_limit(4));
//! team.submit(Box::new(|| println!("hello from a worker"))).unwrap();
//! team.quit();
//! # let _: &Arc<Team> = &team; // silence unused import in doctest
//! # let _: fn() -> LockWorker = LockWorker::new;
//! ```

pub mod config;
pub mod lock_worker;
pub mod log;
pub mod team;
pub mod thread_worker;
pub mod with_limit;

pub use config::TeamConfig;
pub use lock_worker::LockWorker;
pub use team::Team;
pub use team_core::{error, ErrorReporter, Statistics, Task, TeamError, Worker, WorkerFactory, WorkerHandle};
pub use thread_worker::ThreadWorker;
pub use with_limit::CurrentLimitFn;
