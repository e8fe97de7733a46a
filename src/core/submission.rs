//! Ordering of overlapping submissions.
//!
//! Every submission takes an id from a monotonic counter. Outcomes are
//! published into a single slot, and only the newest submission may fill it,
//! so a slow response can never replace the outcome of a later submission.

use std::fmt::Display;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubmissionId(u64);

impl Display for SubmissionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

struct Published<T> {
    id: SubmissionId,
    outcome: Arc<T>,
}

pub struct SubmissionTracker<T> {
    latest: AtomicU64,
    slot: RwLock<Option<Published<T>>>,
}

impl<T> Default for SubmissionTracker<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SubmissionTracker<T> {
    pub fn new() -> Self {
        Self {
            latest: AtomicU64::new(0),
            slot: RwLock::new(None),
        }
    }

    /// Starts a new submission, superseding all earlier ones.
    pub fn begin(&self) -> SubmissionId {
        SubmissionId(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_latest(&self, id: SubmissionId) -> bool {
        self.latest.load(Ordering::SeqCst) == id.0
    }

    /// Stores `outcome` if `id` is still the newest submission. Returns
    /// whether the outcome was kept.
    pub fn publish(&self, id: SubmissionId, outcome: T) -> bool {
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);

        let superseded = !self.is_latest(id)
            || slot
                .as_ref()
                .is_some_and(|published| published.id >= id);
        if superseded {
            debug!(submission = %id, "Discarding stale submission outcome");
            return false;
        }

        *slot = Some(Published {
            id,
            outcome: Arc::new(outcome),
        });
        true
    }

    /// The most recently published outcome, if any.
    pub fn current(&self) -> Option<(SubmissionId, Arc<T>)> {
        let slot = self.slot.read().unwrap_or_else(PoisonError::into_inner);
        slot.as_ref()
            .map(|published| (published.id, Arc::clone(&published.outcome)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_monotonic() {
        let tracker = SubmissionTracker::<()>::new();
        let first = tracker.begin();
        let second = tracker.begin();
        assert!(second > first);
        assert!(tracker.is_latest(second));
        assert!(!tracker.is_latest(first));
        assert_eq!(first.to_string(), "#1");
    }

    #[test]
    fn test_latest_submission_is_published() {
        let tracker = SubmissionTracker::new();
        assert!(tracker.current().is_none());

        let id = tracker.begin();
        assert!(tracker.publish(id, "done"));
        let (published_id, outcome) = tracker.current().unwrap();
        assert_eq!(published_id, id);
        assert_eq!(*outcome, "done");
    }

    #[test]
    fn test_stale_outcome_is_discarded() {
        let tracker = SubmissionTracker::new();
        let slow = tracker.begin();
        let fast = tracker.begin();

        assert!(tracker.publish(fast, "newer"));
        // The older request finishes last and must not win
        assert!(!tracker.publish(slow, "older"));

        let (id, outcome) = tracker.current().unwrap();
        assert_eq!(id, fast);
        assert_eq!(*outcome, "newer");
    }

    #[test]
    fn test_outcome_of_superseded_submission_is_discarded() {
        let tracker = SubmissionTracker::new();
        let first = tracker.begin();
        let _second = tracker.begin();

        // Nothing published yet, but a newer submission is in flight
        assert!(!tracker.publish(first, 1));
        assert!(tracker.current().is_none());
    }

    #[test]
    fn test_same_submission_cannot_publish_twice() {
        let tracker = SubmissionTracker::new();
        let id = tracker.begin();
        assert!(tracker.publish(id, 1));
        assert!(!tracker.publish(id, 2));
        assert_eq!(*tracker.current().unwrap().1, 1);
    }

    #[tokio::test]
    async fn test_out_of_order_completion_across_tasks() {
        let tracker = Arc::new(SubmissionTracker::new());
        let slow_id = tracker.begin();
        let fast_id = tracker.begin();

        let slow = {
            let tracker = Arc::clone(&tracker);
            tokio::spawn(async move {
                tokio::time::sleep(std::time::Duration::from_millis(50)).await;
                tracker.publish(slow_id, "slow")
            })
        };
        let fast = {
            let tracker = Arc::clone(&tracker);
            tokio::spawn(async move { tracker.publish(fast_id, "fast") })
        };

        assert!(fast.await.unwrap());
        assert!(!slow.await.unwrap());
        assert_eq!(*tracker.current().unwrap().1, "fast");
    }
}
