use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};

use parking_lot::Mutex;

type BoxedFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

/// A boxed, `Send`, cheaply-clonable unit of work the executor drives to
/// completion. Shared ownership (rather than a single owning `Box`) is what
/// lets a task's own waker re-submit the same task to the thread pool when
/// it's woken after returning `Pending`.
#[derive(Clone)]
pub(crate) struct RuntimeTask {
    future: Arc<Mutex<BoxedFuture>>,
    complete: Arc<AtomicBool>,
}

impl RuntimeTask {
    pub(crate) fn new<Fut>(future: Fut) -> Self
    where
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self {
            future: Arc::new(Mutex::new(Box::pin(future))),
            complete: Arc::new(AtomicBool::new(false)),
        }
    }

    pub(crate) fn is_completed(&self) -> bool {
        self.complete.load(Ordering::Acquire)
    }

    /// Polls once. Safe to call even after completion (returns `Ready`
    /// immediately without touching the future again).
    pub(crate) fn poll_once(&self, cx: &mut Context<'_>) -> Poll<()> {
        if self.is_completed() {
            return Poll::Ready(());
        }
        let mut future = self.future.lock();
        match future.as_mut().poll(cx) {
            Poll::Ready(()) => {
                self.complete.store(true, Ordering::Release);
                Poll::Ready(())
            }
            Poll::Pending => Poll::Pending,
        }
    }
}
