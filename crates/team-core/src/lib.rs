//! # team-core — Trait definitions for gv-team
//!
//! This crate defines the capability contracts that the coordinator core
//! in `team` depends on. Each trait models one axis of variability:
//! what a worker can do, how new workers are created, and how a raised
//! task is reported. Concrete implementations live in `team` (or in a
//! caller's own crate); `team-core` itself never spawns a thread.
//!
//! Every component of `team` depends on these traits, never on concrete
//! worker types — swapping a backend (thread-per-worker, reactor-driven,
//! in-process for tests) is a matter of handing `Team::new` a different
//! `Box<dyn Worker>` and `Box<dyn WorkerFactory>`.

pub mod error;
pub mod factory;
pub mod gate;
pub mod reporter;
pub mod stats;
pub mod worker;

pub use error::TeamError;
pub use factory::WorkerFactory;
pub use gate::OneShotGate;
pub use reporter::ErrorReporter;
pub use stats::Statistics;
pub use worker::{Coordinator, Task, Worker, WorkerHandle};
