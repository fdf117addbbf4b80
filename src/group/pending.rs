/// Count of children spawned but not yet delivered through `next`, gated
/// against cancellation.
///
/// This is plain data, not a lock-free structure of its own — `GroupCore`
/// holds the single mutex that makes `try_increment` linearizable with
/// `mark_cancelled` (spec invariant: after `cancel_all` returns, no later
/// `try_increment` can succeed). Splitting the lock out of this type and
/// into `GroupCore` is what lets the same critical section cover the ready
/// queue and the waiter slot too (see `GroupCore::poll`).
#[derive(Default)]
pub(crate) struct PendingSet {
    count: usize,
    cancelled: bool,
}

impl PendingSet {
    /// Reserves a delivery slot for a new child. Fails without reserving
    /// anything once the set has been cancelled.
    pub(crate) fn try_increment(&mut self) -> bool {
        if self.cancelled {
            return false;
        }
        self.count += 1;
        true
    }

    /// Releases a slot. Called exactly once per successful `try_increment`,
    /// at the moment its result is handed to the consumer.
    pub(crate) fn decrement(&mut self) {
        debug_assert!(self.count > 0, "decrement on an empty PendingSet");
        self.count = self.count.saturating_sub(1);
    }

    /// Marks the set cancelled. Idempotent; returns whether this call was
    /// the one that flipped it.
    pub(crate) fn mark_cancelled(&mut self) -> bool {
        let first_time = !self.cancelled;
        self.cancelled = true;
        first_time
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub(crate) fn count(&self) -> usize {
        self.count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increment_and_decrement_track_count() {
        let mut pending = PendingSet::default();
        assert!(pending.try_increment());
        assert!(pending.try_increment());
        assert_eq!(pending.count(), 2);
        pending.decrement();
        assert_eq!(pending.count(), 1);
    }

    #[test]
    fn increment_fails_after_cancellation() {
        let mut pending = PendingSet::default();
        assert!(pending.try_increment());
        assert!(pending.mark_cancelled());
        assert!(!pending.try_increment());
        assert_eq!(pending.count(), 1);
    }

    #[test]
    fn mark_cancelled_is_idempotent() {
        let mut pending = PendingSet::default();
        assert!(pending.mark_cancelled());
        assert!(!pending.mark_cancelled());
        assert!(!pending.mark_cancelled());
    }
}
