use crate::domain::timetable::seeder::parse_on_days;
use crate::domain::timetable::{RawSchedule, StationTime};
use crate::error::{Error, Result};
use chrono::NaiveTime;
use serde::Deserialize;
use serde_json::Map;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
struct RawStationTime {
    arrival: Option<String>,
    departure: Option<String>,
}

fn parse_time(raw: &Option<String>, context: &str) -> Result<Option<NaiveTime>> {
    match raw {
        None => Ok(None),
        Some(s) => NaiveTime::parse_from_str(s, "%H:%M:%S")
            .map(Some)
            .map_err(|e| Error::TopologyMismatch(format!("unparseable time '{}' for {}: {}", s, context, e))),
    }
}

/// Loads the timetable (§6): a JSON object keyed by `"<number>, <on_days>"`
/// whose value is an *ordered* mapping of `node_name -> {arrival, departure}`.
/// Station order is load-bearing (it is the train's stop sequence), which is
/// why `serde_json`'s `preserve_order` feature is relied on here.
pub fn load_timetable(path: impl AsRef<Path>) -> Result<Vec<RawSchedule>> {
    let text = fs::read_to_string(path)?;
    let raw: Map<String, serde_json::Value> = serde_json::from_str(&text)?;

    let mut schedules = Vec::with_capacity(raw.len());
    for (key, value) in raw {
        let (number, on_days_raw) = key
            .split_once(',')
            .map(|(n, d)| (n.trim().to_string(), d.trim().to_string()))
            .ok_or_else(|| Error::TopologyMismatch(format!("timetable key '{}' is not '<number>, <on_days>'", key)))?;
        let on_days = parse_on_days(&on_days_raw)?;

        let stations_raw: Map<String, serde_json::Value> = serde_json::from_value(value)?;
        let mut stations = Vec::with_capacity(stations_raw.len());
        for (node_name, station_value) in stations_raw {
            let raw_station: RawStationTime = serde_json::from_value(station_value)?;
            let arrival = parse_time(&raw_station.arrival, &node_name)?;
            let departure = parse_time(&raw_station.departure, &node_name)?;
            stations.push((node_name, StationTime { arrival, departure }));
        }

        schedules.push(RawSchedule { number, on_days, stations });
    }

    Ok(schedules)
}
