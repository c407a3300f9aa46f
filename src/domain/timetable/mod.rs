pub mod interpolation;
pub mod seeder;

use chrono::NaiveTime;

/// Arrival/departure for one station stop, before the seeder's time
/// completion and gap interpolation have run. Either field may be absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct StationTime {
    pub arrival: Option<NaiveTime>,
    pub departure: Option<NaiveTime>,
}

/// One periodic working: a train number, the weekday mask it runs on, and
/// its ordered station stops. `on_days[0]` is Monday (§6).
#[derive(Debug, Clone)]
pub struct RawSchedule {
    pub number: String,
    pub on_days: [bool; 7],
    pub stations: Vec<(String, StationTime)>,
}

/// A schedule whose every stop has a resolved arrival and departure time,
/// ready for slot emission (§4.2 step 3).
#[derive(Debug, Clone)]
pub struct ResolvedSchedule {
    pub number: String,
    pub on_days: [bool; 7],
    pub stations: Vec<(String, NaiveTime, NaiveTime)>,
}
