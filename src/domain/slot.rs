use crate::domain::ids::{SectionId, TaskId, TrainId};
use chrono::NaiveDateTime;

/// The exclusive occupant of a `Slot`.
///
/// A two-variant tagged type rather than a pair of `Option` fields, so that
/// "both set" and "neither set" are unrepresentable (data model invariant 2).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Occupant {
    Task(TaskId),
    Train(TrainId),
}

/// A half-open interval `[starts_at, ends_at)` on a specific section, tagged
/// with the priority of whatever placed it and its exclusive occupant.
///
/// Equality at endpoints is not an intersection: two slots `[a, b)` and
/// `[b, c)` are adjacent, not overlapping.
#[derive(Debug, Clone)]
pub struct Slot {
    pub section_id: SectionId,
    pub starts_at: NaiveDateTime,
    pub ends_at: NaiveDateTime,
    pub priority: i64,
    pub occupant: Occupant,
}

impl Slot {
    pub fn new(section_id: SectionId, starts_at: NaiveDateTime, ends_at: NaiveDateTime, priority: i64, occupant: Occupant) -> Self {
        debug_assert!(starts_at < ends_at, "a slot's interval must be non-empty");
        Slot { section_id, starts_at, ends_at, priority, occupant }
    }

    /// Whether this slot's *interior* intersects `[other_start, other_end)`.
    /// Touching at an endpoint does not count as an intersection.
    pub fn intersects(&self, other_start: NaiveDateTime, other_end: NaiveDateTime) -> bool {
        self.starts_at < other_end && other_start < self.ends_at
    }

    pub fn task_id(&self) -> Option<TaskId> {
        match &self.occupant {
            Occupant::Task(id) => Some(id.clone()),
            Occupant::Train(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ids::{SectionId, TaskId};
    use chrono::NaiveDate;

    fn dt(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 8, 1).unwrap().and_hms_opt(hour, minute, 0).unwrap()
    }

    fn slot(start: (u32, u32), end: (u32, u32)) -> Slot {
        Slot::new(SectionId::new("S"), dt(start.0, start.1), dt(end.0, end.1), 1, Occupant::Task(TaskId::new("T")))
    }

    #[test]
    fn adjacent_slots_do_not_intersect() {
        let s = slot((2, 0), (4, 0));
        assert!(!s.intersects(dt(4, 0), dt(5, 0)), "touching at the shared endpoint is not an intersection");
    }

    #[test]
    fn overlapping_slots_intersect() {
        let s = slot((2, 0), (4, 0));
        assert!(s.intersects(dt(3, 0), dt(5, 0)));
        assert!(s.intersects(dt(1, 0), dt(3, 0)));
    }

    #[test]
    fn a_slot_contains_its_own_interval() {
        let s = slot((2, 0), (4, 0));
        assert!(s.intersects(dt(2, 0), dt(4, 0)));
    }
}
