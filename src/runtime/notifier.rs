use cooked_waker::{IntoWaker, WakeRef};
use threadpool::ThreadPool;

use super::parent::CancelQuery;
use super::task::RuntimeTask;
use super::executor::Executor;

/// The waker handed to a `RuntimeTask` while it's being polled. Waking it
/// re-submits the same task to the same pool — this is the whole
/// scheduling loop: poll once, and if pending, wait for whoever holds this
/// waker to call it back.
pub(crate) struct Redriver {
    pool: ThreadPool,
    task: RuntimeTask,
    cancel_query: Option<CancelQuery>,
}

impl Redriver {
    pub(crate) fn new(pool: ThreadPool, task: RuntimeTask, cancel_query: Option<CancelQuery>) -> Self {
        Self {
            pool,
            task,
            cancel_query,
        }
    }
}

impl WakeRef for Redriver {
    fn wake_by_ref(&self) {
        Executor::drive(self.pool.clone(), self.task.clone(), self.cancel_query.clone());
    }
}

pub(crate) fn waker_for(pool: ThreadPool, task: RuntimeTask, cancel_query: Option<CancelQuery>) -> std::task::Waker {
    std::sync::Arc::new(Redriver::new(pool, task, cancel_query)).into_waker()
}
