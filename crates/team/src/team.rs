//! `Team` — a composite `Worker` that multiplexes tasks across a
//! dynamically sized pool of workers.
//!
//! Every mutation of pool state (`idle`, `busy_count`, `pending`,
//! `to_shrink`) happens inside a closure submitted to `coordinator`, so
//! it is only ever touched from one logical execution context even
//! though `submit`/`grow`/`shrink`/`quit` are safe to call from any
//! thread. The `Mutex<State>` below exists to satisfy the borrow
//! checker and `Send`/`Sync`, not because of real contention: the
//! coordinator's serialization guarantee means it is never held by two
//! coordinator items at once.

use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex};

use team_core::{ErrorReporter, OneShotGate, Statistics, Task, Worker, WorkerFactory, WorkerHandle};
use team_core::error::Result;

use crate::{tlog_debug, tlog_warn};

struct State {
    idle: Vec<WorkerHandle>,
    busy_count: usize,
    pending: VecDeque<Task>,
    coordinator_retired: bool,
    to_shrink: usize,
}

impl State {
    fn new() -> Self {
        Self {
            idle: Vec::new(),
            busy_count: 0,
            pending: VecDeque::new(),
            coordinator_retired: false,
            to_shrink: 0,
        }
    }
}

/// A composite worker-pool coordinator.
///
/// `Team` is itself a `Worker` (see the `Worker` impl below), which lets
/// pools be composed into larger hierarchies: a `Team` can serve as
/// another `Team`'s `coordinator` or as one of its workers.
pub struct Team {
    coordinator: WorkerHandle,
    factory: Box<dyn WorkerFactory>,
    error_reporter: Box<dyn ErrorReporter>,
    quit_requested: OneShotGate,
    state: Mutex<State>,
}

impl Team {
    /// Build a new pool around the given collaborators. `coordinator`
    /// must serialize submitted items strictly one at a time, in
    /// submission order (see `Worker`'s doc comment). `factory` creates
    /// workers on demand, or declines. `error_reporter` is invoked
    /// whenever a submitted task panics.
    pub fn new(
        coordinator: WorkerHandle,
        factory: Box<dyn WorkerFactory>,
        error_reporter: Box<dyn ErrorReporter>,
    ) -> Arc<Team> {
        Arc::new(Team {
            coordinator,
            factory,
            error_reporter,
            quit_requested: OneShotGate::new(),
            state: Mutex::new(State::new()),
        })
    }

    /// Perform some work in a worker created by the factory.
    ///
    /// Errors raised by `task` are routed to the error reporter, never
    /// to the caller; `submit` itself only fails if the pool is
    /// shutting down.
    pub fn submit(self: &Arc<Self>, task: Task) -> Result<()> {
        self.quit_requested.check()?;
        let this = Arc::clone(self);
        self.coordinator.submit(Box::new(move || this.dispatch(task)));
        Ok(())
    }

    /// Increase the number of idle workers by up to `n`. Stops silently
    /// the moment the factory declines.
    pub fn grow(self: &Arc<Self>, n: usize) -> Result<()> {
        self.quit_requested.check()?;
        let this = Arc::clone(self);
        self.coordinator.submit(Box::new(move || {
            for _ in 0..n {
                match this.factory.create() {
                    Some(worker) => this.recycle(worker),
                    None => break,
                }
            }
        }));
        Ok(())
    }

    /// Decrease the number of idle workers by `n`, or by every live
    /// worker if `n` is `None`.
    pub fn shrink(self: &Arc<Self>, n: Option<usize>) -> Result<()> {
        self.quit_requested.check()?;
        let this = Arc::clone(self);
        self.coordinator
            .submit(Box::new(move || this.quit_idlers(n)));
        Ok(())
    }

    /// Stop accepting new work and shut down all idle workers. Tasks
    /// already backlogged are still executed — they are owed a run.
    /// Idempotent: calling `quit` more than once is harmless.
    pub fn quit(self: &Arc<Self>) {
        self.quit_requested.set();
        let this = Arc::clone(self);
        // Covers the case where every worker is already idle when this
        // is called — there is otherwise no future idle-return to
        // trigger the retirement check.
        self.coordinator.submit(Box::new(move || this.quit_idlers(None)));
    }

    /// A point-in-time snapshot of idle/busy/pending counts. No
    /// cross-field atomicity is guaranteed against an in-flight
    /// coordinator item; under quiescence it matches reality exactly.
    pub fn statistics(&self) -> Statistics {
        let state = self.state.lock().unwrap();
        Statistics {
            idle_count: state.idle.len(),
            busy_count: state.busy_count,
            pending_count: state.pending.len(),
        }
    }

    // ---- everything below runs only inside a coordinator item ----

    /// Select a worker to dispatch to, either an idle one or a freshly
    /// created one, and hand it the task.
    fn dispatch(self: &Arc<Self>, task: Task) {
        let worker = {
            let mut state = self.state.lock().unwrap();
            state.idle.pop()
        };
        let worker = match worker.or_else(|| self.factory.create()) {
            Some(worker) => worker,
            None => {
                // The factory may decline if we're out of resources to
                // create workers; the task is owed a future execution.
                self.state.lock().unwrap().pending.push_back(task);
                return;
            }
        };
        self.state.lock().unwrap().busy_count += 1;

        let this = Arc::clone(self);
        let worker_for_return = Arc::clone(&worker);
        worker.submit(Box::new(move || {
            if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(task)) {
                this.error_reporter.report(&*payload);
            }
            let this = Arc::clone(&this);
            let worker_for_return = Arc::clone(&worker_for_return);
            this.coordinator
                .submit(Box::new(move || this.on_worker_idle(worker_for_return)));
        }));
    }

    /// A worker has finished its task and is handing itself back.
    fn on_worker_idle(self: &Arc<Self>, worker: WorkerHandle) {
        self.state.lock().unwrap().busy_count -= 1;
        self.recycle(worker);
    }

    /// Park `worker` as idle, or immediately put it back to work if
    /// there is a backlog, shutdown, or shrink debt to attend to.
    fn recycle(self: &Arc<Self>, worker: WorkerHandle) {
        let pending_task = {
            let mut state = self.state.lock().unwrap();
            state.idle.push(Arc::clone(&worker));
            state.pending.pop_front()
        };
        if let Some(task) = pending_task {
            // Backlog drain deliberately does not re-check
            // `quit_requested`: once a task has entered the backlog it
            // is owed an execution. `worker` was just parked, so
            // `dispatch` may pick it back up, or any other idle worker
            // — either is fine.
            self.dispatch(task);
            return;
        }
        if self.quit_requested.is_set() {
            self.quit_idlers(None);
            return;
        }
        let mut state = self.state.lock().unwrap();
        if state.to_shrink > 0 {
            state.to_shrink -= 1;
            state.idle.retain(|w| !Arc::ptr_eq(w, &worker));
            drop(state);
            worker.retire();
        }
    }

    /// Retire up to `n` idle workers (every live worker if `n` is
    /// `None`), turning any shortfall into shrink debt to be paid off by
    /// future idle returns. Then check whether the coordinator itself
    /// can retire.
    fn quit_idlers(self: &Arc<Self>, n: Option<usize>) {
        let mut retired = Vec::new();
        {
            let mut state = self.state.lock().unwrap();
            let n = n.unwrap_or(state.idle.len() + state.busy_count);
            for _ in 0..n {
                match state.idle.pop() {
                    Some(worker) => retired.push(worker),
                    None => state.to_shrink += 1,
                }
            }
        }
        for worker in retired {
            worker.retire();
        }

        let mut state = self.state.lock().unwrap();
        if !state.coordinator_retired
            && state.busy_count == 0
            && state.pending.is_empty()
            && self.quit_requested.is_set()
        {
            state.coordinator_retired = true;
            drop(state);
            tlog_debug!("coordinator retiring, pool fully drained");
            self.coordinator.retire();
        }
    }
}

impl Team {
    /// A `WorkerHandle` for this pool, so it can be composed as a
    /// worker (or coordinator) of another `Team`. Every `Team` method
    /// needs the owning `Arc` to recurse into coordinator context, so
    /// this is the only way a `Team` is exposed through the `Worker`
    /// trait — there is no `impl Worker for Team` directly.
    pub fn handle(self: &Arc<Self>) -> WorkerHandle {
        Arc::new(TeamWorker(Arc::clone(self)))
    }
}

struct TeamWorker(Arc<Team>);

impl Worker for TeamWorker {
    fn submit(&self, task: Task) {
        if self.0.submit(task).is_err() {
            tlog_warn!("dropping task submitted to a team that already quit");
        }
    }

    fn retire(&self) {
        self.0.quit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lock_worker::LockWorker;
    use crate::thread_worker::ThreadWorker;
    use std::sync::mpsc;
    use std::time::Duration;

    struct CountingFactory {
        limit: usize,
        made: std::sync::atomic::AtomicUsize,
    }

    impl WorkerFactory for CountingFactory {
        fn create(&self) -> Option<WorkerHandle> {
            let id = self.made.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            if id >= self.limit {
                self.made.fetch_sub(1, std::sync::atomic::Ordering::SeqCst);
                return None;
            }
            ThreadWorker::spawn(format!("test-{id}"))
                .ok()
                .map(|w| Arc::new(w) as WorkerHandle)
        }
    }

    struct SilentReporter;
    impl ErrorReporter for SilentReporter {
        fn report(&self, _payload: &(dyn std::any::Any + Send)) {}
    }

    fn new_team(limit: usize) -> Arc<Team> {
        Team::new(
            Arc::new(LockWorker::new()),
            Box::new(CountingFactory {
                limit,
                made: std::sync::atomic::AtomicUsize::new(0),
            }),
            Box::new(SilentReporter),
        )
    }

    fn recv_all(rx: &mpsc::Receiver<usize>, n: usize) -> Vec<usize> {
        (0..n)
            .map(|_| rx.recv_timeout(Duration::from_secs(2)).expect("task did not complete"))
            .collect()
    }

    #[test]
    fn bounded_pool_runs_every_task_without_decline() {
        let team = new_team(4);
        let (tx, rx) = mpsc::channel();
        for i in 0..4 {
            let tx = tx.clone();
            team.submit(Box::new(move || tx.send(i).unwrap())).unwrap();
        }
        let mut got = recv_all(&rx, 4);
        got.sort();
        assert_eq!(got, vec![0, 1, 2, 3]);
    }

    #[test]
    fn limit_of_two_backlogs_the_third_submission() {
        let team = new_team(2);
        let (done_tx, done_rx) = mpsc::channel();
        let mut releases = Vec::new();

        for i in 0..2 {
            let (release_tx, release_rx) = mpsc::channel::<()>();
            let done_tx = done_tx.clone();
            team.submit(Box::new(move || {
                release_rx.recv().unwrap();
                done_tx.send(i).unwrap();
            }))
            .unwrap();
            releases.push(release_tx);
        }
        // Both workers are now busy, each blocked on its own release.
        std::thread::sleep(Duration::from_millis(50));
        assert_eq!(team.statistics().busy_count, 2);

        let done_tx3 = done_tx.clone();
        team.submit(Box::new(move || done_tx3.send(2).unwrap())).unwrap();
        std::thread::sleep(Duration::from_millis(50));
        assert_eq!(team.statistics().pending_count, 1);

        for release_tx in releases {
            release_tx.send(()).unwrap();
        }
        let mut got = recv_all(&done_rx, 3);
        got.sort();
        assert_eq!(got, vec![0, 1, 2]);
    }

    #[test]
    fn shrink_while_idle_retires_idle_workers_immediately() {
        let team = new_team(3);
        let (tx, rx) = mpsc::channel();
        for i in 0..3 {
            let tx = tx.clone();
            team.submit(Box::new(move || tx.send(i).unwrap())).unwrap();
        }
        recv_all(&rx, 3);
        std::thread::sleep(Duration::from_millis(50));
        assert_eq!(team.statistics().idle_count, 3);

        team.shrink(Some(2)).unwrap();
        std::thread::sleep(Duration::from_millis(50));
        assert_eq!(team.statistics().idle_count, 1);
    }

    #[test]
    fn shrink_while_busy_accrues_debt_paid_on_idle_return() {
        let team = new_team(2);
        let (started_tx, started_rx) = mpsc::channel();
        let (done_tx, done_rx) = mpsc::channel();
        let mut releases = Vec::new();

        for i in 0..2 {
            let (release_tx, release_rx) = mpsc::channel::<()>();
            let started_tx = started_tx.clone();
            let done_tx = done_tx.clone();
            team.submit(Box::new(move || {
                started_tx.send(()).unwrap();
                release_rx.recv().unwrap();
                done_tx.send(i).unwrap();
            }))
            .unwrap();
            releases.push(release_tx);
        }
        recv_all(&started_rx, 2);
        assert_eq!(team.statistics().busy_count, 2);

        // Both workers are busy; the debt can't be paid off right away.
        team.shrink(Some(2)).unwrap();
        std::thread::sleep(Duration::from_millis(50));
        assert_eq!(team.statistics().idle_count, 0);

        for release_tx in releases {
            release_tx.send(()).unwrap();
        }
        recv_all(&done_rx, 2);
        std::thread::sleep(Duration::from_millis(50));
        // Debt is fully paid: neither worker returned to idle.
        assert_eq!(team.statistics().idle_count, 0);
        assert_eq!(team.statistics().busy_count, 0);
    }

    #[test]
    fn quit_drains_backlog_before_retiring() {
        let team = new_team(1);
        let (release_tx, release_rx) = mpsc::channel::<()>();
        let (done_tx, done_rx) = mpsc::channel();

        let done_tx1 = done_tx.clone();
        team.submit(Box::new(move || {
            release_rx.recv().unwrap();
            done_tx1.send(0).unwrap();
        }))
        .unwrap();
        std::thread::sleep(Duration::from_millis(50));
        assert_eq!(team.statistics().busy_count, 1);

        let done_tx2 = done_tx.clone();
        team.submit(Box::new(move || done_tx2.send(1).unwrap())).unwrap();
        std::thread::sleep(Duration::from_millis(50));
        assert_eq!(team.statistics().pending_count, 1);

        team.quit();
        // Further submissions are refused once quit has been requested.
        assert!(team.submit(Box::new(|| {})).is_err());

        release_tx.send(()).unwrap();
        let mut got = recv_all(&done_rx, 2);
        got.sort();
        assert_eq!(got, vec![0, 1]);
    }

    #[test]
    fn panicking_task_is_reported_not_propagated() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        struct CountingReporter(Arc<AtomicUsize>);
        impl ErrorReporter for CountingReporter {
            fn report(&self, _payload: &(dyn std::any::Any + Send)) {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }

        let reports = Arc::new(AtomicUsize::new(0));
        let team = Team::new(
            Arc::new(LockWorker::new()),
            Box::new(CountingFactory {
                limit: 1,
                made: AtomicUsize::new(0),
            }),
            Box::new(CountingReporter(Arc::clone(&reports))),
        );

        team.submit(Box::new(|| panic!("boom"))).unwrap();

        let (tx, rx) = mpsc::channel();
        team.submit(Box::new(move || tx.send(()).unwrap())).unwrap();
        rx.recv_timeout(Duration::from_secs(2)).unwrap();

        assert_eq!(reports.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn grow_adds_exactly_n_idle_workers() {
        for n in [0usize, 1, 3, 5] {
            let team = new_team(n.max(1) + 2);
            team.grow(n).unwrap();
            std::thread::sleep(Duration::from_millis(30));
            assert_eq!(team.statistics().idle_count, n);
        }
    }

    #[test]
    fn task_may_submit_to_the_team_it_runs_under() {
        let team = new_team(2);
        let (tx, rx) = mpsc::channel();
        let inner_team = Arc::clone(&team);
        team.submit(Box::new(move || {
            let tx = tx.clone();
            inner_team.submit(Box::new(move || tx.send(()).unwrap())).unwrap();
        }))
        .unwrap();
        rx.recv_timeout(Duration::from_secs(2)).unwrap();
    }

    #[test]
    fn handle_composes_a_team_as_a_coordinator() {
        // `inner` serializes the outer team's coordination work instead
        // of a dedicated LockWorker/ThreadWorker — demonstrates pools
        // composing into larger hierarchies.
        let inner = new_team(2);
        let outer = Team::new(
            inner.handle(),
            Box::new(CountingFactory {
                limit: 2,
                made: std::sync::atomic::AtomicUsize::new(0),
            }),
            Box::new(SilentReporter),
        );
        let (tx, rx) = mpsc::channel();
        for i in 0..3 {
            let tx = tx.clone();
            outer.submit(Box::new(move || tx.send(i).unwrap())).unwrap();
        }
        let mut got = recv_all(&rx, 3);
        got.sort();
        assert_eq!(got, vec![0, 1, 2]);
    }
}
