//! Bounded waits on offloaded work.
//!
//! A remote call is spawned as its own Tokio task and the caller waits on the
//! `JoinHandle` under `tokio::time::timeout`. When the bound expires the
//! handle is dropped: Tokio detaches the task rather than aborting it, so the
//! remote call may still finish, but its result has nowhere to go and is
//! discarded. Cancellation is advisory only.

use std::future::Future;
use std::time::Duration;
use tokio::task::JoinError;
use tracing::warn;

/// What happened to an offloaded task.
#[derive(Debug)]
pub enum Bounded<T> {
    /// Finished within the bound.
    Completed(T),
    /// The bound expired; the task was detached.
    TimedOut,
    /// The task panicked.
    Failed(JoinError),
}

/// Spawn `work` and wait at most `bound` for it.
pub async fn run_bounded<F>(bound: Duration, work: F) -> Bounded<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    let handle = tokio::spawn(work);
    match tokio::time::timeout(bound, handle).await {
        Ok(Ok(value)) => Bounded::Completed(value),
        Ok(Err(e)) => Bounded::Failed(e),
        Err(_) => {
            warn!("Offloaded task exceeded {:?}; abandoning it", bound);
            Bounded::TimedOut
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn completes_within_bound() {
        let out = run_bounded(Duration::from_secs(5), async {
            tokio::time::sleep(Duration::from_secs(1)).await;
            7
        })
        .await;
        assert!(matches!(out, Bounded::Completed(7)));
    }

    #[tokio::test(start_paused = true)]
    async fn times_out_without_cancelling() {
        let finished = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&finished);

        let out = run_bounded(Duration::from_secs(30), async move {
            tokio::time::sleep(Duration::from_secs(45)).await;
            flag.store(true, Ordering::SeqCst);
        })
        .await;
        assert!(matches!(out, Bounded::TimedOut));
        assert!(!finished.load(Ordering::SeqCst));

        // The detached task keeps running to completion.
        tokio::time::sleep(Duration::from_secs(20)).await;
        assert!(finished.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn panic_is_reported() {
        let out = run_bounded(Duration::from_secs(5), async {
            panic!("stage blew up");
        })
        .await;
        match out {
            Bounded::Failed(e) => assert!(e.is_panic()),
            other => panic!("expected Failed, got {other:?}"),
        }
    }
}
