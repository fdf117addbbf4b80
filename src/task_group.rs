use std::convert::Infallible;
use std::future::Future;
use std::sync::Arc;

use crate::group::{GroupCore, Next, Outcome};
use crate::priority::Priority;
use crate::runtime;
use crate::runtime::parent::ParentHandle;
use crate::runtime::task::RuntimeTask;

/// A scoped handle to a group of child tasks that each return a value of
/// `ValueType`.
///
/// Created by [`crate::with_task_group`], which is the only legitimate way
/// to obtain one: the group it wraps is torn down on that function's return
/// path, never by dropping this handle, so a `TaskGroup` is only meaningful
/// for the lifetime of the scope that produced it.
///
/// `TaskGroup` is cheap to clone (it's an `Arc`-shared handle onto the same
/// underlying group) so that a child closure can be handed its own clone —
/// this is what makes `cancel_all`/`is_cancelled` callable from within a
/// child, per spec §5.
pub struct TaskGroup<ValueType: Send + 'static> {
    core: Arc<GroupCore<ValueType, Infallible>>,
    #[cfg(debug_assertions)]
    created_on: std::thread::ThreadId,
}

impl<ValueType: Send + 'static> Clone for TaskGroup<ValueType> {
    fn clone(&self) -> Self {
        Self {
            core: self.core.clone(),
            #[cfg(debug_assertions)]
            created_on: self.created_on,
        }
    }
}

impl<ValueType: Send + 'static> TaskGroup<ValueType> {
    pub(crate) fn with_parent(parent: ParentHandle) -> Self {
        Self {
            core: Arc::new(GroupCore::new(parent)),
            #[cfg(debug_assertions)]
            created_on: std::thread::current().id(),
        }
    }

    /// Best-effort diagnostic for spec §7.3's `ScopeViolation`: in debug
    /// builds, flags a `next`/`spawn` call made from a thread other than
    /// the one that created the group. Not a hard guarantee — a task
    /// legitimately resumed on a different worker thread after a
    /// suspension point would trip this even though it's still the same
    /// logical parent task, so it's compiled out in release builds rather
    /// than relied upon for correctness.
    #[cfg(debug_assertions)]
    fn debug_check_parent_task(&self) {
        debug_assert_eq!(
            self.created_on,
            std::thread::current().id(),
            "TaskGroup used from a thread other than the one that created it"
        );
    }

    #[cfg(not(debug_assertions))]
    fn debug_check_parent_task(&self) {}

    /// Spawns a new child task into the group.
    ///
    /// Returns `false` (without running `operation`) if the group has
    /// already been cancelled.
    pub fn spawn<F>(&mut self, priority: Priority, operation: F) -> bool
    where
        F: Future<Output = ValueType> + Send + 'static,
    {
        self.debug_check_parent_task();
        let _ = priority;
        if !self.core.try_reserve() {
            return false;
        }
        let core = self.core.clone();
        let cancel_query = self.core.child_cancel_query();
        let wrapped = async move {
            let value = operation.await;
            core.offer(Outcome::Value(value));
        };
        runtime::global().spawn(RuntimeTask::new(wrapped), Some(cancel_query));
        true
    }

    /// Like [`TaskGroup::spawn`], but does nothing (and still returns
    /// `false`) if the group is already cancelled, skipping the reservation
    /// attempt entirely. Equivalent in effect to `spawn`, provided as a
    /// cheap early-out for call sites that would otherwise build an
    /// operation closure just to have it dropped unexecuted.
    pub fn spawn_unless_cancelled<F>(&mut self, priority: Priority, operation: F) -> bool
    where
        F: Future<Output = ValueType> + Send + 'static,
    {
        if self.core.is_cancelled() {
            return false;
        }
        self.spawn(priority, operation)
    }

    /// Waits for and returns the next child result in completion order, or
    /// `None` once the group has nothing outstanding.
    ///
    /// Must only be called from the task that created the group (debug
    /// builds assert this is the parent task where feasible; see spec
    /// §4.4/§7.3 — this is a best-effort diagnostic, not a hard guarantee).
    pub async fn next(&mut self) -> Option<ValueType> {
        self.debug_check_parent_task();
        match (Next { core: &self.core }).await {
            None => None,
            Some(Outcome::Value(value)) => Some(value),
            Some(Outcome::Error(never)) => match never {},
        }
    }

    /// True iff there is no child whose result hasn't yet been delivered.
    pub fn is_empty(&self) -> bool {
        self.core.is_empty()
    }

    /// Cancels every outstanding child task. Idempotent; callable from any
    /// task, including from within a spawned child.
    pub fn cancel_all(&self) {
        self.core.cancel_all();
    }

    /// True once `cancel_all` has been called on this group, or once the
    /// task that created it has itself been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.core.is_cancelled()
    }

    pub(crate) fn core(&self) -> &GroupCore<ValueType, Infallible> {
        &self.core
    }

    /// Adapts this group into a [`crate::TaskGroupSequence`], a
    /// `futures_lite::Stream` of child results, for callers that prefer
    /// `StreamExt` combinators over a `next().await` loop.
    pub fn into_stream(self) -> crate::sequence::TaskGroupSequence<ValueType> {
        crate::sequence::TaskGroupSequence::new(self)
    }
}

#[async_trait::async_trait]
pub(crate) trait Drainable {
    /// Repeatedly calls `next` until the group is empty, discarding every
    /// result. Used by the scope wrapper's teardown path (spec §4.5).
    async fn drain_silently(&mut self);
}

#[async_trait::async_trait]
impl<ValueType: Send + 'static> Drainable for TaskGroup<ValueType> {
    async fn drain_silently(&mut self) {
        while self.next().await.is_some() {}
    }
}
