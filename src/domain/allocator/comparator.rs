use crate::domain::task::MaintenanceRequest;
use chrono::{Duration, NaiveTime};
use std::cmp::Ordering;

/// Wraps a `MaintenanceRequest` for ordering in the work-heap (§4.3).
///
/// Drain order, highest priority first:
/// 1. higher `priority`,
/// 2. larger `requested_duration`,
/// 3. narrower `preferred_range` (more constrained requests go first),
/// 4. earlier `preferred_starts_at`.
#[derive(Debug, Clone)]
pub struct WorkItem(pub MaintenanceRequest);

impl WorkItem {
    fn sort_key(&self) -> (i64, Duration, std::cmp::Reverse<Duration>, std::cmp::Reverse<NaiveTime>) {
        let preferred_range = self.0.preferred_range();
        let preferred_starts_at = self.0.effective_window().start;
        (self.0.priority, self.0.requested_duration, std::cmp::Reverse(preferred_range), std::cmp::Reverse(preferred_starts_at))
    }
}

impl PartialEq for WorkItem {
    fn eq(&self, other: &Self) -> bool {
        self.sort_key() == other.sort_key()
    }
}

impl Eq for WorkItem {}

impl PartialOrd for WorkItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for WorkItem {
    /// `std::collections::BinaryHeap` is a max-heap, and higher priority
    /// should pop first, so `sort_key` is built so that "should run first"
    /// compares `Greater`. Narrower `preferred_range` and earlier
    /// `preferred_starts_at` both need smaller-is-first, hence `Reverse`.
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}
