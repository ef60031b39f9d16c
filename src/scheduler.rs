//! Timer scheduling and lifecycle management.
//!
//! All recurring work in the dashboard runs through `Scheduler`, which hands
//! back opaque `TimerHandle`s. The `TimerRegistry` owns every live handle
//! plus the single traffic-light timer, and cancels everything exactly once
//! at teardown.

use std::ops::RangeInclusive;
use std::time::Duration;

use rand::Rng;
use tokio::task::AbortHandle;
use tracing::debug;

/// Opaque handle to a scheduled callback. Cancelling an already-finished or
/// already-cancelled timer is a no-op.
#[derive(Debug)]
pub struct TimerHandle {
    inner: AbortHandle,
}

impl TimerHandle {
    /// Cancel the timer.
    pub fn cancel(&self) {
        self.inner.abort();
    }

    /// Whether the underlying task has stopped (fired its last callback or
    /// been cancelled).
    pub fn is_finished(&self) -> bool {
        self.inner.is_finished()
    }
}

/// Spawns delayed and repeating callbacks on the tokio runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct Scheduler;

impl Scheduler {
    /// Create a scheduler.
    pub fn new() -> Self {
        Self
    }

    /// Run `f` once after `delay`.
    pub fn after<F>(&self, delay: Duration, f: F) -> TimerHandle
    where
        F: FnOnce() + Send + 'static,
    {
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            f();
        });
        TimerHandle {
            inner: task.abort_handle(),
        }
    }

    /// Run `f` every `period` until the handle is cancelled.
    pub fn every<F>(&self, period: Duration, mut f: F) -> TimerHandle
    where
        F: FnMut() + Send + 'static,
    {
        let task = tokio::spawn(async move {
            loop {
                tokio::time::sleep(period).await;
                f();
            }
        });
        TimerHandle {
            inner: task.abort_handle(),
        }
    }

    /// Run `f` repeatedly with the period re-drawn uniformly from
    /// `period_ms` (milliseconds) before every firing, until cancelled.
    pub fn every_jittered<F>(&self, period_ms: RangeInclusive<u64>, mut f: F) -> TimerHandle
    where
        F: FnMut() + Send + 'static,
    {
        let task = tokio::spawn(async move {
            loop {
                let period = rand::rng().random_range(period_ms.clone());
                tokio::time::sleep(Duration::from_millis(period)).await;
                f();
            }
        });
        TimerHandle {
            inner: task.abort_handle(),
        }
    }
}

/// Owns every live recurring timer, plus the single traffic-light timer.
///
/// Each registered handle is cancelled exactly once: either when replaced
/// (traffic) or by `teardown`.
#[derive(Debug, Default)]
pub struct TimerRegistry {
    intervals: Vec<TimerHandle>,
    traffic: Option<TimerHandle>,
}

impl TimerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a recurring timer for teardown.
    pub fn register(&mut self, handle: TimerHandle) {
        self.intervals.push(handle);
    }

    /// Install the traffic-light timer, cancelling any previous one so at
    /// most one cycle is ever live.
    pub fn set_traffic(&mut self, handle: TimerHandle) {
        if let Some(previous) = self.traffic.replace(handle) {
            previous.cancel();
        }
    }

    /// Number of handles currently held.
    pub fn pending(&self) -> usize {
        self.intervals.len() + usize::from(self.traffic.is_some())
    }

    /// Cancel every held handle and clear the registry. Safe to call any
    /// number of times.
    pub fn teardown(&mut self) {
        let cancelled = self.pending();
        for handle in self.intervals.drain(..) {
            handle.cancel();
        }
        if let Some(traffic) = self.traffic.take() {
            traffic.cancel();
        }
        if cancelled > 0 {
            debug!(cancelled, "timer registry torn down");
        }
    }
}

impl Drop for TimerRegistry {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_after_fires_once() {
        let fired = Arc::new(AtomicUsize::new(0));
        let scheduler = Scheduler::new();
        let counter = Arc::clone(&fired);
        let handle = scheduler.after(Duration::from_millis(10), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(handle.is_finished());
    }

    #[tokio::test]
    async fn test_after_cancel_prevents_firing() {
        let fired = Arc::new(AtomicUsize::new(0));
        let scheduler = Scheduler::new();
        let counter = Arc::clone(&fired);
        let handle = scheduler.after(Duration::from_millis(30), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        handle.cancel();
        tokio::time::sleep(Duration::from_millis(80)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        assert!(handle.is_finished());
    }

    #[tokio::test]
    async fn test_every_repeats_until_cancelled() {
        let fired = Arc::new(AtomicUsize::new(0));
        let scheduler = Scheduler::new();
        let counter = Arc::clone(&fired);
        let handle = scheduler.every(Duration::from_millis(10), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(!handle.is_finished());
        handle.cancel();
        let seen = fired.load(Ordering::SeqCst);
        assert!(seen >= 2, "expected repeated firings, saw {seen}");
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(fired.load(Ordering::SeqCst), seen, "fired after cancel");
    }

    #[tokio::test]
    async fn test_every_jittered_repeats() {
        let fired = Arc::new(AtomicUsize::new(0));
        let scheduler = Scheduler::new();
        let counter = Arc::clone(&fired);
        let handle = scheduler.every_jittered(5..=10, move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        tokio::time::sleep(Duration::from_millis(100)).await;
        handle.cancel();
        assert!(fired.load(Ordering::SeqCst) >= 2);
    }

    #[tokio::test]
    async fn test_teardown_is_idempotent() {
        let scheduler = Scheduler::new();
        let mut registry = TimerRegistry::new();
        registry.register(scheduler.every(Duration::from_millis(10), || {}));
        registry.register(scheduler.every(Duration::from_millis(10), || {}));
        registry.set_traffic(scheduler.after(Duration::from_millis(10), || {}));
        assert_eq!(registry.pending(), 3);

        registry.teardown();
        assert_eq!(registry.pending(), 0);
        registry.teardown();
        assert_eq!(registry.pending(), 0);
    }

    #[tokio::test]
    async fn test_set_traffic_replaces_previous() {
        let fired = Arc::new(AtomicUsize::new(0));
        let scheduler = Scheduler::new();
        let mut registry = TimerRegistry::new();

        let counter = Arc::clone(&fired);
        registry.set_traffic(scheduler.after(Duration::from_millis(30), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        // Replacing must cancel the first timer before it fires
        registry.set_traffic(scheduler.after(Duration::from_millis(200), || {}));
        assert_eq!(registry.pending(), 1);

        tokio::time::sleep(Duration::from_millis(80)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }
}
