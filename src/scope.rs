use std::future::Future;
use std::marker::PhantomData;

use crate::runtime::parent::ParentHandle;
use crate::task_group::{Drainable, TaskGroup};
use crate::throwing_task_group::{DrainableThrowing, ThrowingTaskGroup};

/// Starts a scoped closure that takes a mutable [`TaskGroup`] instance as an
/// argument, which can spawn any number of child tasks returning
/// `ResultType`.
///
/// Before this function returns, every child still outstanding is drained
/// (its result discarded) so that no task spawned inside `body` can outlive
/// the scope — the central structured-concurrency guarantee of this crate
/// (spec §4.5).
///
/// # Parameters
///
/// * `of_type`: the type each child task returns; passed as a value rather
///   than a type parameter so it can be inferred at the call site the same
///   way the rest of this crate's constructors are.
/// * `body`: an async closure that takes the group and runs to completion,
///   spawning and awaiting children as it likes.
///
/// # Returns
///
/// Whatever `body` returns.
///
/// # Example
///
/// ```rust
/// use task_groups::{with_task_group, GetType, Priority};
///
/// # futures_lite::future::block_on(async move {
/// let total = with_task_group(i64::TYPE, |mut group| async move {
///     for i in 0..=10 {
///         group.spawn(Priority::default(), async move { i });
///     }
///
///     let mut total = 0;
///     while let Some(value) = group.next().await {
///         total += value;
///     }
///     total
/// })
/// .await;
///
/// assert_eq!(total, 55);
/// # });
/// ```
pub async fn with_task_group<Closure, Fut, ResultType, ReturnType>(
    of_type: PhantomData<ResultType>,
    body: Closure,
) -> ReturnType
where
    Closure: FnOnce(TaskGroup<ResultType>) -> Fut + Send + 'static,
    Fut: Future<Output = ReturnType> + Send + 'static,
    ResultType: Send + 'static,
{
    let _ = of_type;
    let mut group = TaskGroup::<ResultType>::with_parent(ParentHandle::capture_current());
    let result = body(group.clone()).await;
    group.drain_silently().await;
    result
}

/// Like [`with_task_group`], but children return `Result<ResultType,
/// ErrorType>`, and `body` itself returns a `Result<ReturnType, ErrorType>`
/// sharing the same error type, mirroring Swift's `withThrowingTaskGroup`
/// where the body and its children raise through one unified channel.
///
/// * If `body` returns `Ok`, every outstanding child (including one that
///   already ended in `Err`) is drained silently before returning `Ok` to
///   the caller.
/// * If `body` returns `Err`, the group is cancelled first (so every
///   outstanding child observes cancellation as soon as it next checks),
///   then drained — suppressing every child outcome, error or not — and
///   finally `body`'s own error is re-raised to the caller.
///
/// Either way, by the time this function returns no child spawned inside
/// `body` is still runnable against this group (spec §4.5/§8 scenario 3).
///
/// # Parameters
///
/// * `of_type`: the type each child task returns on success.
/// * `error_type`: the error type a child, or `body` itself, can return.
/// * `body`: an async closure that takes the group and runs to completion.
///
/// # Example
///
/// ```rust
/// use std::fmt;
/// use task_groups::{with_throwing_task_group, GetType, Priority};
///
/// #[derive(Debug)]
/// struct Odd(i64);
///
/// impl fmt::Display for Odd {
///     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
///         write!(f, "{} is odd", self.0)
///     }
/// }
///
/// impl std::error::Error for Odd {}
///
/// # futures_lite::future::block_on(async move {
/// let outcome = with_throwing_task_group(i64::TYPE, Odd::TYPE, |mut group| async move {
///     for i in 0..=10 {
///         group.spawn(Priority::default(), async move {
///             if i % 2 == 1 {
///                 return Err(Odd(i));
///             }
///             Ok(i)
///         });
///     }
///
///     let mut sum = 0;
///     let mut odd_count = 0;
///     while let Some(result) = group.next().await {
///         match result {
///             Ok(value) => sum += value,
///             Err(_) => odd_count += 1,
///         }
///     }
///     Ok((sum, odd_count))
/// })
/// .await;
///
/// assert_eq!(outcome.unwrap(), (30, 5));
/// # });
/// ```
pub async fn with_throwing_task_group<Closure, Fut, ResultType, ErrorType, ReturnType>(
    of_type: PhantomData<ResultType>,
    error_type: PhantomData<ErrorType>,
    body: Closure,
) -> Result<ReturnType, ErrorType>
where
    ErrorType: std::error::Error + Send + 'static,
    Closure: FnOnce(ThrowingTaskGroup<ResultType, ErrorType>) -> Fut + Send + 'static,
    Fut: Future<Output = Result<ReturnType, ErrorType>> + Send + 'static,
    ResultType: Send + 'static,
{
    let _ = (of_type, error_type);
    let mut group =
        ThrowingTaskGroup::<ResultType, ErrorType>::with_parent(ParentHandle::capture_current());
    let outcome = body(group.clone()).await;
    if outcome.is_err() {
        group.cancel_all();
    }
    group.drain_silently().await;
    outcome
}
