/// Task Priority
///
/// A hint used to rank the importance of a spawned child task. The runtime
/// underlying this crate makes no ordering guarantee between sibling
/// children beyond what's documented on [`crate::with_task_group`] — this
/// exists for API parity with structured-concurrency runtimes that do use
/// it for scheduling, and so that a child can explicitly request a priority
/// other than the default rather than silently inheriting one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Priority {
    BACKGROUND = 0,
    LOW,
    UTILITY,
    #[default]
    MEDIUM,
    HIGH,
    USERINITIATED,
}
