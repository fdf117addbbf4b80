use std::cell::RefCell;
use std::sync::atomic::Ordering;
use std::sync::Arc;

/// A cooperative cancellation check: true once whatever this query is
/// watching has been cancelled. Type-erased so a single ambient slot can
/// hold either a detached task's own flag or a child's combined
/// group-or-parent query without a dedicated enum for each case.
pub(crate) type CancelQuery = Arc<dyn Fn() -> bool + Send + Sync>;

thread_local! {
    /// Stack of cancellation queries for tasks currently being polled on
    /// this worker thread, innermost last. Pushed/popped by the runtime
    /// around each poll of a task it drives (`AmbientGuard`); this is this
    /// crate's stand-in for spec §6's `current_task()` external interface.
    static CURRENT: RefCell<Vec<CancelQuery>> = RefCell::new(Vec::new());
}

/// RAII guard installing `query` as the ambient "current task" signal for
/// as long as it's alive. Restores whatever was ambient before it on drop,
/// so nested groups and nested detached tasks compose correctly.
pub(crate) struct AmbientGuard {
    installed: bool,
}

impl AmbientGuard {
    pub(crate) fn push(query: Option<CancelQuery>) -> Self {
        match query {
            Some(query) => {
                CURRENT.with(|current| current.borrow_mut().push(query));
                AmbientGuard { installed: true }
            }
            None => AmbientGuard { installed: false },
        }
    }
}

impl Drop for AmbientGuard {
    fn drop(&mut self) {
        if self.installed {
            CURRENT.with(|current| {
                current.borrow_mut().pop();
            });
        }
    }
}

fn current_cancel_query() -> Option<CancelQuery> {
    CURRENT.with(|current| current.borrow().last().cloned())
}

/// Mirrors Swift's `Task.isCancelled`: true when the task presently
/// executing on this thread — as tracked by this crate's runtime — has been
/// cancelled, directly or through an enclosing scope. Outside of any
/// tracked task (for instance a bare `futures_lite::future::block_on` at
/// the top level with no surrounding `spawn_detached`), this is always
/// `false`.
pub fn is_current_task_cancelled() -> bool {
    current_cancel_query()
        .map(|query| query())
        .unwrap_or(false)
}

/// The handle a `GroupCore` keeps on the task that created it (spec
/// invariant 5 / §6 `retain`/`release`). Retain/release collapse to
/// `Arc::clone`/`Drop` — there is no separate lifetime-management step.
#[derive(Clone)]
pub(crate) struct ParentHandle(CancelQuery);

impl ParentHandle {
    /// Captures whatever ambient task is currently being polled on this
    /// thread as the parent. Falls back to a query that never reports
    /// cancelled when the scope is entered with nothing ambient (e.g.
    /// directly under `block_on` with no enclosing `spawn_detached`).
    pub(crate) fn capture_current() -> Self {
        Self(current_cancel_query().unwrap_or_else(|| Arc::new(|| false)))
    }

    /// A parent handle with no enclosing task at all. Used by top-level
    /// groups and by tests that don't need parent-cancellation plumbing.
    pub(crate) fn detached() -> Self {
        Self(Arc::new(|| false))
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        (self.0)()
    }
}

/// Builds the [`CancelQuery`] for a detached task's own cancellation flag.
pub(crate) fn detached_query(flag: Arc<std::sync::atomic::AtomicBool>) -> CancelQuery {
    Arc::new(move || flag.load(Ordering::Acquire))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_ambient_task_means_not_cancelled() {
        assert!(!is_current_task_cancelled());
        assert!(!ParentHandle::capture_current().is_cancelled());
    }

    #[test]
    fn ambient_guard_makes_query_visible_while_alive() {
        let flag = Arc::new(std::sync::atomic::AtomicBool::new(true));
        let query = detached_query(flag);
        {
            let _guard = AmbientGuard::push(Some(query));
            assert!(is_current_task_cancelled());
            assert!(ParentHandle::capture_current().is_cancelled());
        }
        assert!(!is_current_task_cancelled());
    }
}
