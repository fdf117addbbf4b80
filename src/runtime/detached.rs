use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::executor;
use super::parent::detached_query;
use super::task::RuntimeTask;

/// A handle to a task spawned outside of any scope, with no parent to drain
/// it. This is the vehicle for spec scenario 2 (§8): a detached task that
/// can be cancelled from the outside, and whose cancellation a
/// `with_task_group` called from within it picks up as its own parent
/// cancellation.
///
/// This sits outside the group's own public surface (`spec.md` scopes
/// "task creation/scheduling" out as an external `TaskRuntime` collaborator,
/// §6) but without it there would be no way to exercise or test that
/// collaboration at all.
pub struct DetachedTaskHandle {
    cancel_flag: Arc<AtomicBool>,
    done: Arc<AtomicBool>,
}

impl DetachedTaskHandle {
    /// Requests cancellation. Cooperative: the task only observes this the
    /// next time it (or code it calls) checks
    /// [`crate::is_current_task_cancelled`].
    pub fn cancel(&self) {
        self.cancel_flag.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel_flag.load(Ordering::Acquire)
    }

    pub fn is_finished(&self) -> bool {
        self.done.load(Ordering::Acquire)
    }
}

/// Spawns `future` as an independent, unparented task and returns a handle
/// to observe or cancel it.
pub fn spawn_detached<Fut>(future: Fut) -> DetachedTaskHandle
where
    Fut: Future<Output = ()> + Send + 'static,
{
    let cancel_flag = Arc::new(AtomicBool::new(false));
    let done = Arc::new(AtomicBool::new(false));
    let done_for_task = done.clone();
    let query = detached_query(cancel_flag.clone());

    let wrapped = async move {
        future.await;
        done_for_task.store(true, Ordering::Release);
    };

    executor::global().spawn(RuntimeTask::new(wrapped), Some(query));

    DetachedTaskHandle { cancel_flag, done }
}
