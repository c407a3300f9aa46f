use crate::domain::store::RecordStore;
use crate::domain::task::PlacementOutcome;
use crate::error::{Error, Result};
use crate::ingest::requests::RejectedRow;
use csv::Writer;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
struct PlacedRow {
    requested_date: String,
    block_or_section_label: String,
    line: String,
    preferred_start_time: String,
    preferred_end_time: String,
    block_duration_minutes: i64,
    priority: i64,
    department: String,
    den: String,
    nature_of_work: String,
    location: String,
    permitted_time_from: String,
    permitted_time_to: String,
    permitted_duration_minutes: i64,
}

#[derive(Debug, Serialize)]
struct ErrorRow {
    identifier: String,
    reason: String,
}

/// Writes the output file (§6): the input schema mirrored, with
/// `permitted_time_from`/`permitted_time_to`/`permitted_duration_minutes`
/// filled from each placed slot. Unplaced outcomes are not written here;
/// they go to the error sidecar via `write_errors`.
pub async fn write_placed<S: RecordStore>(store: &S, outcomes: &[PlacementOutcome], path: impl AsRef<Path>) -> Result<()> {
    let mut writer = Writer::from_path(path)?;

    for outcome in outcomes {
        if let PlacementOutcome::Placed { task_id, starts_at, ends_at } = outcome {
            let request = store.get_task(task_id).await?.ok_or_else(|| Error::StoreError(format!("placed task {} has no task record", task_id)))?;
            let section =
                store.get_section(&request.section_id).await?.ok_or_else(|| Error::StoreError(format!("task {} references unknown section", task_id)))?;

            let (preferred_start_time, preferred_end_time) = match request.preferred_window {
                Some(w) => (w.start.format("%H:%M").to_string(), w.end.format("%H:%M").to_string()),
                None => (String::new(), String::new()),
            };

            writer.serialize(PlacedRow {
                requested_date: request.requested_date.format("%Y-%m-%d").to_string(),
                block_or_section_label: request.block_label.clone(),
                line: section.line.to_string(),
                preferred_start_time,
                preferred_end_time,
                block_duration_minutes: request.requested_duration.num_minutes(),
                priority: request.priority,
                department: request.department.clone(),
                den: request.division_engineer.clone(),
                nature_of_work: request.nature_of_work.clone(),
                location: request.location.clone(),
                permitted_time_from: starts_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                permitted_time_to: ends_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                permitted_duration_minutes: (*ends_at - *starts_at).num_minutes(),
            })?;
        }
    }

    writer.flush()?;
    Ok(())
}

/// Writes the error sidecar (§6, §7): rows rejected at ingest plus requests
/// the allocator could not place, each with an identifier and a reason.
pub fn write_errors(rejected_ingest: &[RejectedRow], unplaced: &[PlacementOutcome], path: impl AsRef<Path>) -> Result<()> {
    let mut writer = Writer::from_path(path)?;

    for row in rejected_ingest {
        writer.serialize(ErrorRow { identifier: format!("row {}", row.row_index), reason: row.reason.clone() })?;
    }

    for outcome in unplaced {
        if let PlacementOutcome::Unplaced { task_id, reason } = outcome {
            writer.serialize(ErrorRow { identifier: format!("task {}", task_id), reason: reason.clone() })?;
        }
    }

    writer.flush()?;
    Ok(())
}
