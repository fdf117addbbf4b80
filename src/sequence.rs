use std::pin::Pin;
use std::task::{Context, Poll};

use futures_lite::Stream;

use crate::task_group::TaskGroup;
use crate::throwing_task_group::ThrowingTaskGroup;

/// An [`AsyncSequence`]-style adapter over a [`TaskGroup`]: a
/// `futures_lite::Stream` of child results in completion order, for callers
/// that want to use `StreamExt` combinators (`map`, `filter_map`, `fold`,
/// ...) instead of a `while let Some(x) = group.next().await` loop.
///
/// Obtained by consuming the group with [`TaskGroup::into_stream`]. Once
/// [`TaskGroupSequence::cancel`] has been called, or the underlying group
/// has reported `None` once, the stream reports `None` on every subsequent
/// poll without touching the group again.
pub struct TaskGroupSequence<ValueType: Send + 'static> {
    group: TaskGroup<ValueType>,
    finished: bool,
}

impl<ValueType: Send + 'static> TaskGroupSequence<ValueType> {
    pub(crate) fn new(group: TaskGroup<ValueType>) -> Self {
        Self {
            group,
            finished: false,
        }
    }

    /// Cancels the underlying group and marks this sequence exhausted, so
    /// no further child result will be yielded even if one is already
    /// queued up.
    pub fn cancel(&mut self) {
        self.group.cancel_all();
        self.finished = true;
    }
}

impl<ValueType: Send + 'static> Stream for TaskGroupSequence<ValueType> {
    type Item = ValueType;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        // Rebuilding `next()` on every poll is sound here only because its
        // single await point (`GroupCore::poll`) is itself a stateless,
        // idempotent critical section with no progress held in the future
        // between polls — all of it lives in the core.
        let this = self.get_mut();
        if this.finished {
            return Poll::Ready(None);
        }
        let future = this.group.next();
        futures_lite::pin!(future);
        match future.poll(cx) {
            Poll::Ready(None) => {
                this.finished = true;
                Poll::Ready(None)
            }
            Poll::Ready(Some(value)) => Poll::Ready(Some(value)),
            Poll::Pending => Poll::Pending,
        }
    }
}

/// The throwing-flavor counterpart of [`TaskGroupSequence`]: a stream of
/// `Result<ValueType, ErrorType>`, obtained via
/// [`ThrowingTaskGroup::into_stream`].
pub struct ThrowingTaskGroupSequence<ValueType, ErrorType>
where
    ValueType: Send + 'static,
    ErrorType: std::error::Error + Send + 'static,
{
    group: ThrowingTaskGroup<ValueType, ErrorType>,
    finished: bool,
}

impl<ValueType, ErrorType> ThrowingTaskGroupSequence<ValueType, ErrorType>
where
    ValueType: Send + 'static,
    ErrorType: std::error::Error + Send + 'static,
{
    pub(crate) fn new(group: ThrowingTaskGroup<ValueType, ErrorType>) -> Self {
        Self {
            group,
            finished: false,
        }
    }

    pub fn cancel(&mut self) {
        self.group.cancel_all();
        self.finished = true;
    }
}

impl<ValueType, ErrorType> Stream for ThrowingTaskGroupSequence<ValueType, ErrorType>
where
    ValueType: Send + 'static,
    ErrorType: std::error::Error + Send + 'static,
{
    type Item = Result<ValueType, ErrorType>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.finished {
            return Poll::Ready(None);
        }
        let future = this.group.next();
        futures_lite::pin!(future);
        match future.poll(cx) {
            Poll::Ready(None) => {
                this.finished = true;
                Poll::Ready(None)
            }
            Poll::Ready(Some(Ok(value))) => Poll::Ready(Some(Ok(value))),
            Poll::Ready(Some(Err(error))) => {
                // Spec: a child error is terminal for the sequence, even
                // though siblings may still be pending — it's surfaced once
                // and no further element follows it.
                this.finished = true;
                Poll::Ready(Some(Err(error)))
            }
            Poll::Pending => Poll::Pending,
        }
    }
}
