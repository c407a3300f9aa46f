pub mod comparator;

use crate::config::{MIN_LEAD_TIME_DAYS, TRAIN_PRIORITY};
use crate::domain::ids::SectionId;
use crate::domain::slot::{Occupant, Slot};
use crate::domain::store::{DisplacedTask, SectionTransaction};
use crate::domain::task::{MaintenanceRequest, PlacementOutcome};
use crate::error::Result;
use chrono::{Duration, NaiveDateTime};
use comparator::WorkItem;
use std::collections::BinaryHeap;

/// An empty, infinitely-bounded interval never used as an actual slot. Real
/// fixed slots narrow it down when forming the free-gap sequence.
fn window_bounds() -> (NaiveDateTime, NaiveDateTime) {
    (NaiveDateTime::MIN, NaiveDateTime::MAX)
}

/// A candidate free interval between two fixed (or horizon-bounding) slots.
#[derive(Debug, Clone, Copy)]
struct Gap {
    starts_at: NaiveDateTime,
    ends_at: NaiveDateTime,
}

impl Gap {
    fn duration(&self) -> Duration {
        self.ends_at - self.starts_at
    }
}

/// Runs the priority-aware placement algorithm (§4.3) for every request
/// targeting one section, against a single `SectionTransaction` held for the
/// whole batch so that preemption and re-placement are serialisable with any
/// concurrent batch on the same section (§5).
///
/// `now` is the reference instant used to decide which existing slots are
/// close enough to be untouchable (`ends_at >= now + 1 day`).
pub async fn run_batch(
    tx: &mut dyn SectionTransaction,
    section_id: &SectionId,
    requests: Vec<MaintenanceRequest>,
    now: NaiveDateTime,
) -> Result<Vec<PlacementOutcome>> {
    let mut heap: BinaryHeap<WorkItem> = requests.into_iter().map(WorkItem).collect();
    let mut outcomes = Vec::new();
    let lead = now + Duration::days(MIN_LEAD_TIME_DAYS);

    while let Some(WorkItem(request)) = heap.pop() {
        match place_one(tx, section_id, &request, lead).await? {
            Some((starts_at, ends_at)) => {
                outcomes.push(PlacementOutcome::Placed { task_id: request.task_id.clone(), starts_at, ends_at });

                let displaced = tx.pop_intersecting_slots(starts_at, ends_at, request.priority).await?;
                for DisplacedTask { request: requeued } in displaced {
                    heap.push(WorkItem(requeued));
                }

                tx.insert_slot(Slot::new(section_id.clone(), starts_at, ends_at, request.priority, Occupant::Task(request.task_id.clone())))
                    .await?;
            }
            None => {
                let err = crate::error::Error::NoFreeSlot {
                    section: section_id.to_string(),
                    requested_date: request.requested_date,
                    requested_duration_minutes: request.requested_duration.num_minutes(),
                };
                log::warn!("{}", err);
                outcomes.push(PlacementOutcome::Unplaced { task_id: request.task_id.clone(), reason: err.to_string() });
            }
        }
    }

    Ok(outcomes)
}

/// Steps 1-6 of §4.3: find the best feasible gap and the start/end within it,
/// without mutating the store. Returns `None` when no feasible gap exists
/// (`NoFreeSlot`).
async fn place_one(
    tx: &dyn SectionTransaction,
    section_id: &SectionId,
    request: &MaintenanceRequest,
    lead: NaiveDateTime,
) -> Result<Option<(NaiveDateTime, NaiveDateTime)>> {
    let fixed = tx.find_fixed_slots(request.priority, lead).await?;
    let mut fixed: Vec<Slot> = fixed;
    fixed.sort_by_key(|s| s.starts_at);

    let gaps = free_gaps(&fixed);

    let feasible: Vec<Gap> = gaps
        .into_iter()
        .filter(|g| {
            let spans_date = g.starts_at.date() <= request.requested_date && request.requested_date <= g.ends_at.date();
            spans_date && g.duration() >= request.requested_duration
        })
        .collect();

    if feasible.is_empty() {
        return Ok(None);
    }

    let (ps, pe) = request.preferred_interval();
    let winner = feasible
        .into_iter()
        .map(|g| {
            let overlap_start = g.starts_at.max(ps);
            let overlap_end = g.ends_at.min(pe);
            let overlap = if overlap_end > overlap_start { overlap_end - overlap_start } else { Duration::zero() };
            (g, overlap)
        })
        .max_by(|(ga, oa), (gb, ob)| oa.cmp(ob).then_with(|| gb.starts_at.cmp(&ga.starts_at)))
        .map(|(g, _)| g)
        .expect("feasible is non-empty");

    let starts_at = if winner.starts_at <= ps && pe <= winner.ends_at {
        ps
    } else if winner.starts_at >= ps {
        winner.starts_at
    } else {
        (winner.ends_at - request.requested_duration).min(ps)
    };
    let ends_at = starts_at + request.requested_duration;

    debug_assert!(ends_at <= winner.ends_at, "placement must stay within the winning gap");

    log::debug!(
        "placing section {} task {} priority {}: gap [{}, {}) -> slot [{}, {})",
        section_id,
        request.task_id,
        request.priority,
        winner.starts_at,
        winner.ends_at,
        starts_at,
        ends_at
    );

    Ok(Some((starts_at, ends_at)))
}

/// Builds the sequence of half-open free intervals between consecutive fixed
/// slots, including the open-ended gaps before the first and after the last.
fn free_gaps(fixed: &[Slot]) -> Vec<Gap> {
    let (window_start, window_end) = window_bounds();
    let mut gaps = Vec::with_capacity(fixed.len() + 1);
    let mut cursor = window_start;

    for slot in fixed {
        if cursor < slot.starts_at {
            gaps.push(Gap { starts_at: cursor, ends_at: slot.starts_at });
        }
        cursor = cursor.max(slot.ends_at);
    }

    if cursor < window_end {
        gaps.push(Gap { starts_at: cursor, ends_at: window_end });
    }

    gaps
}

/// Validates that a placement does not intersect any slot of priority
/// `>= min_priority` still present on the section — used by tests asserting
/// invariant 4 against a transaction's own view.
pub async fn no_higher_priority_overlap(tx: &dyn SectionTransaction, min_priority: i64, starts_at: NaiveDateTime, ends_at: NaiveDateTime) -> Result<bool> {
    let fixed = tx.find_fixed_slots(min_priority, NaiveDateTime::MIN).await?;
    Ok(!fixed.iter().any(|s| s.intersects(starts_at, ends_at)))
}

pub fn is_train_priority(priority: i64) -> bool {
    priority == TRAIN_PRIORITY
}
