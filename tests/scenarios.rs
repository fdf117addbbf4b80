use std::fmt;
use std::time::Duration;

use futures_lite::future::block_on;
use futures_lite::StreamExt;

use task_groups::{
    is_current_task_cancelled, sleep, spawn_detached, with_task_group, with_throwing_task_group,
    GetType, Priority,
};

#[derive(Debug, PartialEq, Eq)]
struct BodyError;

impl fmt::Display for BodyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("body error")
    }
}

impl std::error::Error for BodyError {}

/// Scenario 1: two quick children, completion-order delivery — the multiset
/// of observations is `{1, 2}` regardless of which one is delivered first.
#[test]
fn two_quick_children_deliver_as_a_multiset() {
    let seen = block_on(with_task_group(i32::TYPE, |mut group| async move {
        group.spawn(Priority::default(), async { 1 });
        group.spawn(Priority::default(), async { 2 });

        let mut seen = Vec::new();
        while let Some(value) = group.next().await {
            seen.push(value);
        }
        seen
    }));

    let mut seen = seen;
    seen.sort_unstable();
    assert_eq!(seen, vec![1, 2]);
}

/// Scenario 2: cancelling a detached parent is observed both by a child
/// spawned under it and, afterward, by the detached handle itself.
#[test]
fn parent_cancel_propagates_to_group_and_child() {
    let parent_saw_cancelled_after_scope =
        std::sync::Arc::new(std::sync::atomic::AtomicBool::new(false));
    let group_saw_cancelled = std::sync::Arc::new(std::sync::atomic::AtomicBool::new(false));

    let parent_flag = parent_saw_cancelled_after_scope.clone();
    let group_flag = group_saw_cancelled.clone();

    let handle = spawn_detached(async move {
        with_task_group(i32::TYPE, move |mut group| async move {
            group.spawn(Priority::default(), async move {
                while !is_current_task_cancelled() {
                    sleep(Duration::from_millis(5)).await;
                }
                1
            });
            group.next().await;
            group_flag.store(group.is_cancelled(), std::sync::atomic::Ordering::SeqCst);
        })
        .await;
        parent_flag.store(
            is_current_task_cancelled(),
            std::sync::atomic::Ordering::SeqCst,
        );
    });

    handle.cancel();

    block_on(async {
        while !handle.is_finished() {
            sleep(Duration::from_millis(5)).await;
        }
    });

    assert!(handle.is_cancelled());
    assert!(parent_saw_cancelled_after_scope.load(std::sync::atomic::Ordering::SeqCst));
    assert!(group_saw_cancelled.load(std::sync::atomic::Ordering::SeqCst));
}

/// Scenario 3: when the body rethrows, the scope cancels every outstanding
/// child, drains their (suppressed) outcomes, and re-raises the body's own
/// error; `is_empty` holds once the scope has returned.
#[test]
fn throwing_body_cancels_and_drains_then_rethrows() {
    let completed = std::sync::Arc::new(std::sync::atomic::AtomicUsize::new(0));
    let completed_for_body = completed.clone();

    let result = block_on(with_throwing_task_group(
        i32::TYPE,
        BodyError::TYPE,
        move |mut group| async move {
            for value in [10, 20, 30] {
                let completed = completed_for_body.clone();
                group.spawn(Priority::default(), async move {
                    completed.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                    Ok(value)
                });
            }
            Err(BodyError)
        },
    ));

    assert_eq!(result, Err(BodyError));
    assert_eq!(completed.load(std::sync::atomic::Ordering::SeqCst), 3);
}

/// Scenario 4: throwing-flavor children surface their errors per-`next`
/// without affecting their siblings.
#[test]
fn throwing_children_surface_errors_individually() {
    let result = block_on(with_throwing_task_group(
        i32::TYPE,
        BodyError::TYPE,
        |mut group| async move {
            group.spawn(Priority::default(), async { Ok(7) });
            group.spawn(Priority::default(), async { Err(BodyError) });
            group.spawn(Priority::default(), async { Ok(9) });

            let mut oks = Vec::new();
            let mut errs = 0;
            while let Some(outcome) = group.next().await {
                match outcome {
                    Ok(value) => oks.push(value),
                    Err(_) => errs += 1,
                }
            }
            oks.sort_unstable();
            Ok::<_, BodyError>((oks, errs))
        },
    ));

    assert_eq!(result, Ok((vec![7, 9], 1)));
}

/// Scenario 5: spawning after `cancel_all` is rejected, and `is_empty`
/// reflects only children that were pending beforehand.
#[test]
fn spawn_after_cancel_is_rejected_and_is_empty_unaffected() {
    block_on(with_task_group(i32::TYPE, |mut group| async move {
        assert!(group.spawn(Priority::default(), async { 1 }));
        group.cancel_all();
        assert!(!group.spawn(Priority::default(), async { 2 }));

        let delivered = group.next().await;
        assert_eq!(delivered, Some(1));
        assert!(group.is_empty());
    }));
}

/// Scenario 6: iterating a throwing group through the sequence adapter
/// stops at the first error observed, and the enclosing scope still
/// silently drains whatever remains once it exits.
#[test]
fn sequence_adapter_stops_at_first_error_and_scope_drains_the_rest() {
    let remaining_completed = std::sync::Arc::new(std::sync::atomic::AtomicUsize::new(0));
    let remaining_for_body = remaining_completed.clone();

    let result = block_on(with_throwing_task_group(
        i32::TYPE,
        BodyError::TYPE,
        move |mut group| async move {
            group.spawn(Priority::default(), async { Err(BodyError) });
            for _ in 0..2 {
                let remaining = remaining_for_body.clone();
                group.spawn(Priority::default(), async move {
                    remaining.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                    Ok(1)
                });
            }

            let mut stream = group.into_stream();
            let first = stream.next().await;
            // The property under test is that the *first* error ends
            // iteration even though siblings may still be pending or
            // already complete: a second poll must report exhausted, not
            // one of the `Ok(1)` results from the remaining children.
            let second = stream.next().await;
            Ok::<_, BodyError>((first, second))
        },
    ));

    assert_eq!(result, Ok((Some(Err(BodyError)), None)));
    assert!(remaining_completed.load(std::sync::atomic::Ordering::SeqCst) <= 2);
}
