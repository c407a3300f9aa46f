use super::ResolvedSchedule;
use crate::config::TRAIN_PRIORITY;
use crate::domain::section::Line;
use crate::domain::slot::{Occupant, Slot};
use crate::domain::store::RecordStore;
use crate::error::{Error, Result};
use chrono::{Datelike, Duration, NaiveDate};

/// Expands a set of resolved periodic schedules into fixed train slots over a
/// horizon of `horizon_days` starting at `start_date` (§4.2 step 3).
///
/// Idempotent: a slot already present with the same `[starts_at, ends_at)`
/// on a section is left alone rather than re-inserted, so seeding the same
/// horizon twice produces no duplicates (§8 "idempotence of seeding").
pub async fn seed_trains<S: RecordStore>(store: &S, schedules: &[ResolvedSchedule], horizon_days: i64, start_date: NaiveDate) -> Result<()> {
    for schedule in schedules {
        let train = store
            .get_train_by_number(&schedule.number)
            .await?
            .ok_or_else(|| Error::TopologyMismatch(format!("train {} has a timetable entry but is not in the roster", schedule.number)))?;

        for pair in schedule.stations.windows(2) {
            let (from_name, _, from_dep) = &pair[0];
            let (to_name, to_arr, _) = &pair[1];

            let section = store
                .find_section_by_line_and_names(Line::Up, from_name, to_name)
                .await?
                .ok_or_else(|| Error::TopologyMismatch(format!("no UP section {} -> {} for train {}", from_name, to_name, schedule.number)))?;

            let mut tx = store.begin(&section.id).await?;
            let mut inserted = 0;

            for offset in 0..horizon_days {
                let date = start_date + Duration::days(offset);
                let weekday_idx = date.weekday().num_days_from_monday() as usize;
                if !schedule.on_days[weekday_idx] {
                    continue;
                }

                let starts_at = date.and_time(*from_dep);
                let mut ends_at = date.and_time(*to_arr);
                if ends_at < starts_at {
                    ends_at += Duration::days(1);
                }

                let already_seeded = tx
                    .find_fixed_slots(TRAIN_PRIORITY, starts_at)
                    .await?
                    .iter()
                    .any(|s| s.starts_at == starts_at && s.ends_at == ends_at);
                if already_seeded {
                    continue;
                }

                tx.insert_slot(Slot::new(section.id.clone(), starts_at, ends_at, TRAIN_PRIORITY, Occupant::Train(train.id.clone()))).await?;
                inserted += 1;
            }

            log::info!("seeded {} slot(s) for train {} on section {} ({} -> {})", inserted, schedule.number, section.id, from_name, to_name);
            tx.commit().await?;
        }
    }

    Ok(())
}

/// Parses a 7-character `0`/`1` weekday mask (§6), index 0 = Monday.
pub fn parse_on_days(raw: &str) -> Result<[bool; 7]> {
    if raw.len() != 7 {
        return Err(Error::TopologyMismatch(format!("on_days mask '{}' must be exactly 7 characters", raw)));
    }
    let mut mask = [false; 7];
    for (i, ch) in raw.chars().enumerate() {
        mask[i] = match ch {
            '1' => true,
            '0' => false,
            other => return Err(Error::TopologyMismatch(format!("on_days mask '{}' has invalid character '{}'", raw, other))),
        };
    }
    Ok(mask)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_full_week_mask() {
        assert_eq!(parse_on_days("1111111").unwrap(), [true; 7]);
    }

    #[test]
    fn parses_weekdays_only() {
        assert_eq!(parse_on_days("1111100").unwrap(), [true, true, true, true, true, false, false]);
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(parse_on_days("111").is_err());
    }

    #[test]
    fn rejects_bad_characters() {
        assert!(parse_on_days("111111x").is_err());
    }
}
