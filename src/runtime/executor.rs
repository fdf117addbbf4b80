use std::sync::OnceLock;
use std::task::Context;

use threadpool::ThreadPool;

use super::notifier::waker_for;
use super::parent::{AmbientGuard, CancelQuery};
use super::task::RuntimeTask;

/// The minimal executor backing this crate: a thread pool plus a
/// poll-then-reschedule loop. It plays the role of the `TaskRuntime`
/// external collaborator from the spec (§6) — every group needs *some*
/// scheduler underneath it, and this crate, like the crate it's modeled on,
/// ships its own rather than depending on tokio/async-std.
#[derive(Clone)]
pub(crate) struct Executor {
    pool: ThreadPool,
}

impl Executor {
    fn new() -> Self {
        let pool = threadpool::Builder::new()
            .num_threads(num_cpus::get())
            .thread_name("task-groups-worker".to_owned())
            .build();
        Self { pool }
    }

    /// Submits `task` to the pool for one poll. If it returns `Pending`,
    /// the waker it was polled with will call `drive` again when woken —
    /// there is no separate background scheduling thread.
    pub(crate) fn drive(pool: ThreadPool, task: RuntimeTask, cancel_query: Option<CancelQuery>) {
        if task.is_completed() {
            return;
        }
        let pool_for_job = pool.clone();
        pool.execute(move || {
            let waker = waker_for(pool_for_job, task.clone(), cancel_query.clone());
            let mut cx = Context::from_waker(&waker);
            let _ambient = AmbientGuard::push(cancel_query);
            let _ = task.poll_once(&mut cx);
        });
    }

    /// Spawns a new task onto this executor's pool.
    pub(crate) fn spawn(&self, task: RuntimeTask, cancel_query: Option<CancelQuery>) {
        Self::drive(self.pool.clone(), task, cancel_query);
    }

    /// Blocks the calling thread until every job currently queued or
    /// running on the pool has finished. Used by tests that need to
    /// observe a detached task's side effects deterministically.
    #[cfg(test)]
    pub(crate) fn join(&self) {
        self.pool.join();
    }
}

/// The process-wide executor instance. A library like this one has no
/// natural "one executor per program" entry point of its own (unlike a
/// binary's `main`), so groups and detached tasks share a single lazily
/// built pool sized to the machine's core count.
pub(crate) fn global() -> &'static Executor {
    static EXECUTOR: OnceLock<Executor> = OnceLock::new();
    EXECUTOR.get_or_init(Executor::new)
}
