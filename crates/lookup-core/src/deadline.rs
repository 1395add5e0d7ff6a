//! Deadlines and derived sub-budgets.
//!
//! A [`Deadline`] is an absolute instant paired with a cancellation token.
//! Stage budgets are carved out of a parent with [`Deadline::child`]: the
//! child expires no later than its parent and is cancelled whenever the
//! parent is, so dropping a request cancels every call made on its behalf.

use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::{CancellationToken, DropGuard};

use crate::DeadlineError;

#[derive(Debug, Clone)]
pub struct Deadline {
    at: Instant,
    token: CancellationToken,
}

impl Deadline {
    /// Root deadline `budget` from now.
    pub fn after(budget: Duration) -> Self {
        Self {
            at: Instant::now() + budget,
            token: CancellationToken::new(),
        }
    }

    /// Sub-deadline of at most `budget`, clamped to what remains of `self`.
    pub fn child(&self, budget: Duration) -> Self {
        let at = (Instant::now() + budget).min(self.at);
        Self {
            at,
            token: self.token.child_token(),
        }
    }

    pub fn instant(&self) -> Instant {
        self.at
    }

    /// Time left before expiry, zero once expired.
    pub fn remaining(&self) -> Duration {
        self.at.saturating_duration_since(Instant::now())
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.at
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Cancels this deadline (and all children) when the guard is dropped.
    pub fn guard(&self) -> DropGuard {
        self.token.clone().drop_guard()
    }

    /// Drive `fut` until it completes, the deadline passes, or the deadline
    /// is cancelled. On expiry or cancellation `fut` is dropped; a deadline
    /// that is already spent never polls `fut` at all.
    pub async fn run<F>(&self, fut: F) -> Result<F::Output, DeadlineError>
    where
        F: Future,
    {
        if self.token.is_cancelled() {
            return Err(DeadlineError::Cancelled);
        }
        if self.is_expired() {
            return Err(DeadlineError::Expired);
        }

        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(DeadlineError::Cancelled),
            _ = tokio::time::sleep_until(self.at) => Err(DeadlineError::Expired),
            out = fut => Ok(out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[tokio::test(start_paused = true)]
    async fn test_completes_within_budget() {
        let deadline = Deadline::after(Duration::from_millis(100));
        let out = deadline
            .run(async {
                tokio::time::sleep(Duration::from_millis(10)).await;
                42
            })
            .await;
        assert_eq!(out, Ok(42));
    }

    #[tokio::test(start_paused = true)]
    async fn test_expires() {
        let deadline = Deadline::after(Duration::from_millis(50));
        let out = deadline
            .run(tokio::time::sleep(Duration::from_secs(5)))
            .await;
        assert_eq!(out, Err(DeadlineError::Expired));
        assert!(deadline.is_expired());
        assert_eq!(deadline.remaining(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_child_never_exceeds_parent() {
        let parent = Deadline::after(Duration::from_millis(100));
        let child = parent.child(Duration::from_secs(10));
        assert_eq!(child.instant(), parent.instant());

        let tighter = parent.child(Duration::from_millis(10));
        assert!(tighter.instant() < parent.instant());
    }

    #[tokio::test(start_paused = true)]
    async fn test_child_of_nearly_spent_parent() {
        let parent = Deadline::after(Duration::from_millis(100));
        tokio::time::advance(Duration::from_millis(95)).await;
        let child = parent.child(Duration::from_millis(50));
        assert_eq!(child.remaining(), Duration::from_millis(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_parent_cancel_propagates() {
        let parent = Deadline::after(Duration::from_secs(10));
        let child = parent.child(Duration::from_secs(1));
        let grandchild = child.child(Duration::from_millis(500));

        let canceller = parent.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            canceller.cancel();
        });

        let out = grandchild.run(std::future::pending::<()>()).await;
        assert_eq!(out, Err(DeadlineError::Cancelled));
        assert!(child.is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_child_cancel_leaves_parent() {
        let parent = Deadline::after(Duration::from_secs(1));
        let child = parent.child(Duration::from_millis(10));
        child.cancel();
        assert!(child.is_cancelled());
        assert!(!parent.is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_guard_cancels_on_drop() {
        let deadline = Deadline::after(Duration::from_secs(1));
        let stage = deadline.child(Duration::from_millis(500));
        {
            let _guard = deadline.guard();
        }
        assert!(stage.is_cancelled());
        assert_eq!(stage.run(async { 1 }).await, Err(DeadlineError::Cancelled));
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_future_is_dropped() {
        struct SetOnDrop(Arc<AtomicBool>);
        impl Drop for SetOnDrop {
            fn drop(&mut self) {
                self.0.store(true, Ordering::SeqCst);
            }
        }

        let dropped = Arc::new(AtomicBool::new(false));
        let marker = SetOnDrop(dropped.clone());
        let deadline = Deadline::after(Duration::from_millis(10));
        let out = deadline
            .run(async move {
                let _marker = marker;
                std::future::pending::<()>().await;
            })
            .await;

        assert_eq!(out, Err(DeadlineError::Expired));
        assert!(dropped.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn test_spent_deadline_never_polls() {
        let polled = Arc::new(AtomicBool::new(false));
        let flag = polled.clone();
        let deadline = Deadline::after(Duration::ZERO);
        let out = deadline
            .run(async move {
                flag.store(true, Ordering::SeqCst);
            })
            .await;
        assert_eq!(out, Err(DeadlineError::Expired));
        assert!(!polled.load(Ordering::SeqCst));
    }
}
