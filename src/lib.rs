//! A structured concurrency construct that provides a way to spawn and run
//! an arbitrary number of child tasks, await the result of each one, or
//! cancel every running child task at once. It is influenced by the Swift
//! language's [`TaskGroup`](https://developer.apple.com/documentation/swift/taskgroup)
//! and Go's [`errgroup`](https://pkg.go.dev/golang.org/x/sync/errgroup).
//!
//! # Usage
//!
//! * [`with_task_group`] for a dynamic number of child tasks that each
//!   return a value.
//! * [`with_throwing_task_group`] for child tasks that each return a
//!   `Result<ValueType, ErrorType>`.
//!
//! # Spawning Child Tasks
//!
//! Child tasks are spawned by calling `spawn` or `spawn_unless_cancelled` on
//! the group handle passed into the scope closure.
//!
//! To avoid spawning a new child into an already-cancelled group, use
//! `spawn_unless_cancelled` rather than plain `spawn`, which spawns
//! unconditionally and relies on the group's internal state to reject it.
//!
//! # Child Task Execution Order
//!
//! Child tasks spawned into a group execute concurrently and may complete,
//! and so be observed through `next`, in any order.
//!
//! # Cancellation
//!
//! Calling `cancel_all` on a group immediately marks it (and, from then on,
//! every descendant that checks [`is_current_task_cancelled`]) cancelled.
//! Cancellation is cooperative: a running child notices only the next time
//! it checks.
//!
//! # Waiting
//!
//! [`with_task_group`] and [`with_throwing_task_group`] both drain any
//! child that the closure didn't already consume via `next` before
//! returning, so no child ever outlives its scope.
//!
//! # Stream
//!
//! Both [`TaskGroup`] and [`ThrowingTaskGroup`] can be adapted with
//! `into_stream` into a [`TaskGroupSequence`]/[`ThrowingTaskGroupSequence`],
//! each implementing `futures_lite::Stream` so that `StreamExt` methods
//! such as `next`, `map`, `filter_map` and `fold` are available.
//!
//! ```rust
//! use task_groups::{with_task_group, GetType, Priority};
//!
//! # futures_lite::future::block_on(async move {
//! let final_result = with_task_group(i64::TYPE, |mut group| async move {
//!     for i in 0..=10 {
//!         group.spawn(Priority::default(), async move {
//!             // simulate asynchronous work
//!             i
//!         });
//!     }
//!
//!     let mut total = 0;
//!     while let Some(x) = group.next().await {
//!         total += x;
//!     }
//!     total
//! })
//! .await;
//!
//! assert_eq!(final_result, 55);
//! # });
//! ```
//!
//! # Note
//!
//! * Import `StreamExt` from `futures_lite::StreamExt` (or `futures::stream::StreamExt`)
//!   to use combinators on the sequence adapters.
//!
//! # Warning
//!
//! * This crate relies on atomics and a lock around each group's internal
//!   state; it does not assume a lock-free runtime.
//! * Avoid using a group's handle outside of the scope that created it.
//! * Avoid calling long, blocking, non-asynchronous functions from within a
//!   spawned child — this crate's own executor is a fixed-size thread pool,
//!   and a blocked worker is a worker unavailable to every other task.
//! * Don't hand a future spawned by `tokio`, `async-std`, or `smol` to
//!   `spawn` — this crate drives every child on its own executor.

mod group;
mod priority;
mod runtime;
mod scope;
mod sequence;
mod task_group;
mod throwing_task_group;

pub mod meta_types;

pub use meta_types::GetType;
pub use priority::Priority;
pub use runtime::detached::{spawn_detached, DetachedTaskHandle};
pub use runtime::parent::is_current_task_cancelled;
pub use scope::{with_task_group, with_throwing_task_group};
pub use sequence::{TaskGroupSequence, ThrowingTaskGroupSequence};
pub use sleeper::sleep;
pub use task_group::TaskGroup;
pub use throwing_task_group::ThrowingTaskGroup;
pub use yield_now::yield_now;

pub mod sleeper;
pub mod yield_now;
