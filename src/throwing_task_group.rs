use std::future::Future;
use std::sync::Arc;

use crate::group::{GroupCore, Next, Outcome};
use crate::priority::Priority;
use crate::runtime;
use crate::runtime::parent::ParentHandle;
use crate::runtime::task::RuntimeTask;

/// Like [`crate::TaskGroup`], but each child returns a `Result<ValueType,
/// ErrorType>` instead of a bare `ValueType`.
///
/// Created by [`crate::with_throwing_task_group`]. A child's `Err` is
/// delivered through `next()` just like an `Ok` — it does not, by itself,
/// cancel any sibling. Only the scope wrapper decides whether a `next()`
/// observing `Err` should call `cancel_all` (spec §4.5/§8 scenario 4).
pub struct ThrowingTaskGroup<ValueType: Send + 'static, ErrorType: std::error::Error + Send + 'static> {
    core: Arc<GroupCore<ValueType, ErrorType>>,
    #[cfg(debug_assertions)]
    created_on: std::thread::ThreadId,
}

impl<ValueType, ErrorType> Clone for ThrowingTaskGroup<ValueType, ErrorType>
where
    ValueType: Send + 'static,
    ErrorType: std::error::Error + Send + 'static,
{
    fn clone(&self) -> Self {
        Self {
            core: self.core.clone(),
            #[cfg(debug_assertions)]
            created_on: self.created_on,
        }
    }
}

impl<ValueType, ErrorType> ThrowingTaskGroup<ValueType, ErrorType>
where
    ValueType: Send + 'static,
    ErrorType: std::error::Error + Send + 'static,
{
    pub(crate) fn with_parent(parent: ParentHandle) -> Self {
        Self {
            core: Arc::new(GroupCore::new(parent)),
            #[cfg(debug_assertions)]
            created_on: std::thread::current().id(),
        }
    }

    #[cfg(debug_assertions)]
    fn debug_check_parent_task(&self) {
        debug_assert_eq!(
            self.created_on,
            std::thread::current().id(),
            "ThrowingTaskGroup used from a thread other than the one that created it"
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
        F: Future<Output = Result<ValueType, ErrorType>> + Send + 'static,
    {
        self.debug_check_parent_task();
        let _ = priority;
        if !self.core.try_reserve() {
            return false;
        }
        let core = self.core.clone();
        let cancel_query = self.core.child_cancel_query();
        let wrapped = async move {
            let record = match operation.await {
                Ok(value) => Outcome::Value(value),
                Err(error) => Outcome::Error(error),
            };
            core.offer(record);
        };
        runtime::global().spawn(RuntimeTask::new(wrapped), Some(cancel_query));
        true
    }

    /// Like [`ThrowingTaskGroup::spawn`], but does nothing (and still
    /// returns `false`) if the group is already cancelled.
    pub fn spawn_unless_cancelled<F>(&mut self, priority: Priority, operation: F) -> bool
    where
        F: Future<Output = Result<ValueType, ErrorType>> + Send + 'static,
    {
        if self.core.is_cancelled() {
            return false;
        }
        self.spawn(priority, operation)
    }

    /// Waits for and returns the next child result in completion order, or
    /// `None` once the group has nothing outstanding. A child's error is
    /// delivered as `Some(Err(_))`, same as any other result.
    pub async fn next(&mut self) -> Option<Result<ValueType, ErrorType>> {
        self.debug_check_parent_task();
        match (Next { core: &self.core }).await {
            None => None,
            Some(Outcome::Value(value)) => Some(Ok(value)),
            Some(Outcome::Error(error)) => Some(Err(error)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.core.is_empty()
    }

    /// Cancels every outstanding child task. Idempotent; callable from any
    /// task, including from within a spawned child.
    pub fn cancel_all(&self) {
        self.core.cancel_all();
    }

    pub fn is_cancelled(&self) -> bool {
        self.core.is_cancelled()
    }

    pub(crate) fn core(&self) -> &GroupCore<ValueType, ErrorType> {
        &self.core
    }

    /// Adapts this group into a [`crate::ThrowingTaskGroupSequence`].
    pub fn into_stream(self) -> crate::sequence::ThrowingTaskGroupSequence<ValueType, ErrorType> {
        crate::sequence::ThrowingTaskGroupSequence::new(self)
    }
}

#[async_trait::async_trait]
pub(crate) trait DrainableThrowing {
    /// Repeatedly calls `next` until the group is empty, discarding every
    /// result — including any child errors still outstanding. Used by the
    /// scope wrapper's teardown path on both its success and its
    /// cancel-and-rethrow path (spec §4.5).
    async fn drain_silently(&mut self);
}

#[async_trait::async_trait]
impl<ValueType, ErrorType> DrainableThrowing for ThrowingTaskGroup<ValueType, ErrorType>
where
    ValueType: Send + 'static,
    ErrorType: std::error::Error + Send + 'static,
{
    async fn drain_silently(&mut self) {
        while self.next().await.is_some() {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_lite::future::block_on;
    use std::fmt;

    #[derive(Debug, PartialEq, Eq)]
    struct BoomError;

    impl fmt::Display for BoomError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("boom")
        }
    }

    impl std::error::Error for BoomError {}

    #[test]
    fn spawn_after_cancel_returns_false() {
        let mut group = ThrowingTaskGroup::<i32, BoomError>::with_parent(ParentHandle::detached());
        group.cancel_all();
        assert!(!group.spawn(Priority::default(), async { Ok(1) }));
        assert!(group.is_empty());
    }

    #[test]
    fn child_error_is_delivered_without_cancelling_siblings() {
        let mut group = ThrowingTaskGroup::<i32, BoomError>::with_parent(ParentHandle::detached());
        assert!(group.spawn(Priority::default(), async { Err(BoomError) }));
        assert!(group.spawn(Priority::default(), async { Ok(5) }));

        let mut ok_count = 0;
        let mut err_count = 0;
        block_on(async {
            while let Some(result) = group.next().await {
                match result {
                    Ok(_) => ok_count += 1,
                    Err(_) => err_count += 1,
                }
            }
        });
        assert_eq!(ok_count, 1);
        assert_eq!(err_count, 1);
        assert!(!group.is_cancelled());
    }
}
