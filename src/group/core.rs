use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll, Waker};

use parking_lot::Mutex;

use super::outcome::{Outcome, PollResult};
use super::pending::PendingSet;
use super::ready_queue::ReadyQueue;
use crate::runtime::parent::{CancelQuery, ParentHandle};

struct State<ValueType, ErrorType> {
    pending: PendingSet,
    ready: ReadyQueue<ValueType, ErrorType>,
    waiter: Option<Waker>,
}

/// The pivot entity behind both `TaskGroup` and `ThrowingTaskGroup`: shared
/// status, the pending count, the ready queue, and the (at most one)
/// suspended waiter, all behind a single critical section so that `offer`,
/// `poll` and `cancel_all` can't observe or leave behind a torn state.
pub(crate) struct GroupCore<ValueType, ErrorType> {
    state: Mutex<State<ValueType, ErrorType>>,
    cancel_flag: Arc<AtomicBool>,
    parent: ParentHandle,
}

impl<ValueType, ErrorType> GroupCore<ValueType, ErrorType> {
    pub(crate) fn new(parent: ParentHandle) -> Self {
        Self {
            state: Mutex::new(State {
                pending: PendingSet::default(),
                ready: ReadyQueue::default(),
                waiter: None,
            }),
            cancel_flag: Arc::new(AtomicBool::new(false)),
            parent,
        }
    }

    /// Reserves a delivery slot for a new child. See `PendingSet::try_increment`.
    pub(crate) fn try_reserve(&self) -> bool {
        self.state.lock().pending.try_increment()
    }

    /// Child-side completion (§4.3 Offer): append the record, and if a
    /// consumer is parked waiting for one, wake it.
    pub(crate) fn offer(&self, record: Outcome<ValueType, ErrorType>) {
        let waker = {
            let mut state = self.state.lock();
            state.ready.push(record);
            state.waiter.take()
        };
        if let Some(waker) = waker {
            waker.wake();
        }
    }

    /// Parent-side (§4.3 Poll/Wait): the one critical section backing
    /// `next`. Takes a ready record and decrements pending atomically with
    /// the take (invariant 1 requires pending to drop only at delivery, not
    /// at append), or registers `waker` as the waiter if there's nothing to
    /// deliver yet but more is coming.
    pub(crate) fn poll(&self, waker: &Waker) -> PollResult<ValueType, ErrorType> {
        let mut state = self.state.lock();
        if let Some(record) = state.ready.pop() {
            state.pending.decrement();
            return PollResult::Ready(record);
        }
        if state.pending.count() == 0 {
            return PollResult::Empty;
        }
        state.waiter = Some(waker.clone());
        PollResult::Waiting
    }

    /// Idempotent, callable from any task. Flips status, and wakes a parked
    /// waiter only if there's now something for it to observe (a ready
    /// record, or pending having already reached zero) — never spuriously.
    pub(crate) fn cancel_all(&self) {
        let woken = {
            let mut state = self.state.lock();
            let first_time = state.pending.mark_cancelled();
            if first_time {
                self.cancel_flag.store(true, Ordering::Release);
            }
            if !state.ready.is_empty() || state.pending.count() == 0 {
                state.waiter.take()
            } else {
                None
            }
        };
        if let Some(waker) = woken {
            waker.wake();
        }
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancel_flag.load(Ordering::Acquire) || self.parent.is_cancelled()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.state.lock().pending.count() == 0
    }

    #[cfg(test)]
    pub(crate) fn ready_len(&self) -> usize {
        self.state.lock().ready.len()
    }

    /// The cooperative cancellation signal handed to a spawned child: set
    /// when either this group or the enclosing parent task is cancelled.
    /// See `crate::runtime::parent::is_current_task_cancelled`.
    pub(crate) fn child_cancel_query(&self) -> CancelQuery {
        let flag = self.cancel_flag.clone();
        let parent = self.parent.clone();
        Arc::new(move || flag.load(Ordering::Acquire) || parent.is_cancelled())
    }
}

/// The future returned by `next()`. A thin `Future` wrapper around
/// `GroupCore::poll` — the one suspension point this crate's concurrency
/// model allows (spec §5).
pub(crate) struct Next<'group, ValueType, ErrorType> {
    pub(crate) core: &'group GroupCore<ValueType, ErrorType>,
}

impl<'group, ValueType, ErrorType> Future for Next<'group, ValueType, ErrorType> {
    type Output = Option<Outcome<ValueType, ErrorType>>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match self.core.poll(cx.waker()) {
            PollResult::Empty => Poll::Ready(None),
            PollResult::Ready(record) => Poll::Ready(Some(record)),
            PollResult::Waiting => Poll::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::parent::ParentHandle;
    use futures_lite::future::block_on;

    fn fresh() -> GroupCore<i32, std::convert::Infallible> {
        GroupCore::new(ParentHandle::detached())
    }

    #[test]
    fn empty_group_next_returns_none_without_suspension() {
        let core = fresh();
        let result = block_on(Next { core: &core });
        assert!(result.is_none());
    }

    #[test]
    fn offer_then_poll_delivers_and_decrements_pending() {
        let core = fresh();
        assert!(core.try_reserve());
        core.offer(Outcome::Value(7));
        assert_eq!(core.ready_len(), 1);
        let result = block_on(Next { core: &core });
        match result {
            Some(Outcome::Value(v)) => assert_eq!(v, 7),
            _ => panic!("expected a delivered value"),
        }
        assert!(core.is_empty());
    }

    #[test]
    fn spawn_after_cancel_is_rejected() {
        let core: GroupCore<i32, std::convert::Infallible> = fresh();
        assert!(core.try_reserve());
        core.cancel_all();
        assert!(!core.try_reserve());
        assert!(core.is_cancelled());
    }

    #[test]
    fn cancel_all_does_not_purge_ready_records() {
        let core = fresh();
        assert!(core.try_reserve());
        core.offer(Outcome::Value(42));
        core.cancel_all();
        assert_eq!(core.ready_len(), 1);
        let result = block_on(Next { core: &core });
        assert!(matches!(result, Some(Outcome::Value(42))));
    }
}
