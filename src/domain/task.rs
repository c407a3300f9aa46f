use crate::domain::ids::{SectionId, TaskId};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// A time-of-day window the requester prefers, which may wrap past midnight
/// (`end <= start`). `None` means "no preference", scored against as the
/// entire day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreferredWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl PreferredWindow {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        PreferredWindow { start, end }
    }

    /// The entire-day window used when a request supplies only a duration.
    pub fn entire_day() -> Self {
        PreferredWindow { start: NaiveTime::from_hms_opt(0, 0, 0).unwrap(), end: NaiveTime::from_hms_opt(0, 0, 0).unwrap() }
    }

    /// The wall-clock duration of `[start, end)`, adding 24h when the window
    /// wraps past midnight (`end <= start`).
    pub fn range(&self) -> Duration {
        let start = self.start.signed_duration_since(NaiveTime::from_hms_opt(0, 0, 0).unwrap());
        let mut end = self.end.signed_duration_since(NaiveTime::from_hms_opt(0, 0, 0).unwrap());
        if end <= start {
            end += Duration::hours(24);
        }
        end - start
    }

    /// Lifts this time-of-day window onto the day axis of `date`, returning
    /// `[PS, PE)`. `PE` is advanced by 24h when the window wraps.
    pub fn on_date(&self, date: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
        let ps = date.and_time(self.start);
        let mut pe = date.and_time(self.end);
        if pe <= ps {
            pe += Duration::hours(24);
        }
        (ps, pe)
    }
}

/// The queued form of a maintenance work request: not yet placed, carrying
/// everything the allocator needs plus the metadata that survives onto the
/// output file.
#[derive(Debug, Clone)]
pub struct MaintenanceRequest {
    pub task_id: TaskId,
    pub section_id: SectionId,
    pub department: String,
    pub division_engineer: String,
    pub nature_of_work: String,
    pub block_label: String,
    pub location: String,
    pub preferred_window: Option<PreferredWindow>,
    pub requested_date: NaiveDate,
    pub requested_duration: Duration,
    pub priority: i64,
}

impl MaintenanceRequest {
    /// The preferred window to score gaps against, defaulting to the entire
    /// day when the request carries no explicit preference.
    pub fn effective_window(&self) -> PreferredWindow {
        self.preferred_window.unwrap_or_else(PreferredWindow::entire_day)
    }

    pub fn preferred_range(&self) -> Duration {
        match self.preferred_window {
            Some(w) => w.range(),
            None => Duration::hours(24),
        }
    }

    /// Preferred interval lifted onto `self.requested_date`'s day axis.
    pub fn preferred_interval(&self) -> (NaiveDateTime, NaiveDateTime) {
        match self.preferred_window {
            Some(w) => w.on_date(self.requested_date),
            None => {
                let start = self.requested_date.and_time(NaiveTime::from_hms_opt(0, 0, 0).unwrap());
                (start, start + Duration::hours(24))
            }
        }
    }
}

/// The outcome of trying to place one `MaintenanceRequest` during a batch.
#[derive(Debug, Clone)]
pub enum PlacementOutcome {
    Placed { task_id: TaskId, starts_at: NaiveDateTime, ends_at: NaiveDateTime },
    Unplaced { task_id: TaskId, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn range_is_plain_difference_when_not_wrapping() {
        let w = PreferredWindow::new(t(2, 0), t(4, 0));
        assert_eq!(w.range(), Duration::hours(2));
    }

    #[test]
    fn range_adds_a_day_when_wrapping_past_midnight() {
        let w = PreferredWindow::new(t(23, 30), t(1, 0));
        assert_eq!(w.range(), Duration::minutes(90));
    }

    #[test]
    fn on_date_advances_the_end_past_midnight() {
        let w = PreferredWindow::new(t(23, 30), t(1, 0));
        let date = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();
        let (ps, pe) = w.on_date(date);
        assert_eq!(ps, date.and_time(t(23, 30)));
        assert_eq!(pe, date.succ_opt().unwrap().and_time(t(1, 0)));
    }
}
