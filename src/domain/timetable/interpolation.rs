use super::{RawSchedule, ResolvedSchedule, StationTime};
use chrono::NaiveTime;

const SECS_PER_DAY: i64 = 24 * 60 * 60;

fn to_secs(t: NaiveTime) -> i64 {
    t.signed_duration_since(NaiveTime::from_hms_opt(0, 0, 0).unwrap()).num_seconds()
}

fn from_secs(secs: i64) -> NaiveTime {
    let normalized = secs.rem_euclid(SECS_PER_DAY);
    NaiveTime::from_hms_opt(0, 0, 0).unwrap() + chrono::Duration::seconds(normalized)
}

/// §4.2 step 1: per-station time completion. Where only one of
/// arrival/departure is present, the missing one is set equal to it.
fn complete_single_station_times(stations: &mut [(String, StationTime)]) {
    for (_, st) in stations.iter_mut() {
        match (st.arrival, st.departure) {
            (Some(a), None) => st.departure = Some(a),
            (None, Some(d)) => st.arrival = Some(d),
            _ => {}
        }
    }
}

/// §4.2 step 2: gap interpolation. Fills runs of stations left with no time
/// at all after step 1 by linear interpolation between the nearest known
/// anchors, wrapping across midnight when the right anchor's clock is
/// earlier than the left's.
fn interpolate_unknown_runs(stations: &mut [(String, StationTime)]) {
    let n = stations.len();
    let mut i = 0;
    while i < n {
        let known = stations[i].1.arrival.is_some() || stations[i].1.departure.is_some();
        if known {
            i += 1;
            continue;
        }

        // `i` starts a run of fully-unknown stations; find its bounds.
        let run_start = i;
        let mut run_end = i;
        while run_end < n && stations[run_end].1.arrival.is_none() && stations[run_end].1.departure.is_none() {
            run_end += 1;
        }
        let k = run_end - run_start;

        let left_anchor = if run_start == 0 { None } else { stations[run_start - 1].1.departure };
        let right_anchor = if run_end == n { None } else { stations[run_end].1.arrival };

        if let (Some(left), Some(right)) = (left_anchor, right_anchor) {
            let left_secs = to_secs(left);
            let mut right_secs = to_secs(right);
            if right_secs < left_secs {
                right_secs += SECS_PER_DAY;
            }

            for (step, station_idx) in (run_start..run_end).enumerate() {
                let fraction = (step + 1) as f64 / (k + 1) as f64;
                let interpolated = left_secs + ((right_secs - left_secs) as f64 * fraction).round() as i64;
                let time = from_secs(interpolated);
                stations[station_idx].1.arrival = Some(time);
                stations[station_idx].1.departure = Some(time);
            }
        } else {
            log::warn!(
                "timetable gap at stations {}..{} has no bounding anchor on at least one side; leaving unresolved",
                run_start,
                run_end
            );
        }

        i = run_end;
    }
}

/// Resolves a `RawSchedule` into a `ResolvedSchedule` by running time
/// completion (step 1) followed by gap interpolation (step 2).
pub fn resolve(mut raw: RawSchedule) -> ResolvedSchedule {
    complete_single_station_times(&mut raw.stations);
    interpolate_unknown_runs(&mut raw.stations);

    let stations = raw
        .stations
        .into_iter()
        .map(|(name, st)| {
            let arrival = st.arrival.unwrap_or_else(|| {
                log::error!("station '{}' on train {} has no resolvable arrival time; defaulting to midnight", name, raw.number);
                NaiveTime::from_hms_opt(0, 0, 0).unwrap()
            });
            let departure = st.departure.unwrap_or(arrival);
            (name, arrival, departure)
        })
        .collect();

    ResolvedSchedule { number: raw.number, on_days: raw.on_days, stations }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn known(h: u32, m: u32) -> StationTime {
        let t = NaiveTime::from_hms_opt(h, m, 0).unwrap();
        StationTime { arrival: Some(t), departure: Some(t) }
    }

    fn unknown() -> StationTime {
        StationTime::default()
    }

    #[test]
    fn single_station_completion_copies_the_present_field() {
        let mut stations = vec![("A".to_string(), StationTime { arrival: Some(NaiveTime::from_hms_opt(2, 0, 0).unwrap()), departure: None })];
        complete_single_station_times(&mut stations);
        assert_eq!(stations[0].1.departure, stations[0].1.arrival);
    }

    #[test]
    fn interpolates_evenly_spaced_unknown_run() {
        let mut stations = vec![("A".to_string(), known(2, 0)), ("B".to_string(), unknown()), ("C".to_string(), known(4, 0))];
        interpolate_unknown_runs(&mut stations);
        let resolved = stations[1].1.arrival.unwrap();
        assert_eq!(resolved, NaiveTime::from_hms_opt(3, 0, 0).unwrap());
    }

    #[test]
    fn interpolation_wraps_across_midnight() {
        let mut stations = vec![("A".to_string(), known(23, 0)), ("B".to_string(), unknown()), ("C".to_string(), known(1, 0))];
        interpolate_unknown_runs(&mut stations);
        let resolved = stations[1].1.arrival.unwrap();
        assert_eq!(resolved, NaiveTime::from_hms_opt(0, 0, 0).unwrap());
    }

    #[test]
    fn resolve_fills_both_steps() {
        let raw = RawSchedule {
            number: "12601".to_string(),
            on_days: [true; 7],
            stations: vec![
                ("A".to_string(), StationTime { arrival: None, departure: Some(NaiveTime::from_hms_opt(2, 0, 0).unwrap()) }),
                ("B".to_string(), unknown()),
                ("C".to_string(), StationTime { arrival: Some(NaiveTime::from_hms_opt(4, 0, 0).unwrap()), departure: None }),
            ],
        };
        let resolved = resolve(raw);
        assert_eq!(resolved.stations.len(), 3);
        assert_eq!(resolved.stations[1].1, NaiveTime::from_hms_opt(3, 0, 0).unwrap());
    }
}
