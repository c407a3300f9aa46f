use crate::domain::section::Line;
use crate::domain::store::{PartialTask, RecordStore};
use crate::domain::task::PreferredWindow;
use crate::error::{Error, Result};
use chrono::{Duration, NaiveDate, NaiveTime};
use csv::Reader;
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Deserialize)]
struct RequestRow {
    requested_date: String,
    block_or_section_label: String,
    line: String,
    preferred_start_time: Option<String>,
    preferred_end_time: Option<String>,
    block_duration_minutes: Option<i64>,
    priority: Option<i64>,
    department: String,
    den: String,
    nature_of_work: String,
    location: String,
}

/// A row that resolved to a concrete section and is ready for
/// `RecordStore::insert_task` (§6).
#[derive(Debug)]
pub struct AcceptedRequest {
    pub row_index: usize,
    pub partial: PartialTask,
}

/// A row rejected at ingest, carrying its 0-based row index and reason
/// (§7 `InvalidRequest`). The row is skipped; the batch continues.
#[derive(Debug)]
pub struct RejectedRow {
    pub row_index: usize,
    pub reason: String,
}

/// Parses the maintenance-request file (§6) into accepted and rejected rows.
/// Section resolution happens here because the target section (not just its
/// name) is needed by `insert_task`.
pub async fn ingest<S: RecordStore>(store: &S, path: impl AsRef<Path>) -> Result<(Vec<AcceptedRequest>, Vec<RejectedRow>)> {
    let mut reader = Reader::from_path(path)?;
    let mut accepted = Vec::new();
    let mut rejected = Vec::new();

    for (row_index, record) in reader.deserialize::<RequestRow>().enumerate() {
        match record {
            Ok(row) => match resolve_row(store, &row).await {
                Ok(partial) => accepted.push(AcceptedRequest { row_index, partial }),
                Err(reason) => {
                    let err = Error::InvalidRequest { row: row_index, reason };
                    rejected.push(RejectedRow { row_index, reason: err.to_string() });
                }
            },
            Err(e) => {
                let err = Error::InvalidRequest { row: row_index, reason: format!("malformed row: {}", e) };
                rejected.push(RejectedRow { row_index, reason: err.to_string() });
            }
        }
    }

    Ok((accepted, rejected))
}

async fn resolve_row<S: RecordStore>(store: &S, row: &RequestRow) -> std::result::Result<PartialTask, String> {
    let requested_date =
        NaiveDate::parse_from_str(&row.requested_date, "%Y-%m-%d").map_err(|e| format!("unparseable requested_date: {}", e))?;

    let line = Line::from_str(&row.line)?;

    // A bare "NAME" label (no "START-END") denotes a yard: the original
    // ingest heuristic represents its far end as "NAME_YD" (§9 design note).
    let (from_name, to_name) = match row.block_or_section_label.split_once('-') {
        Some((a, b)) => (a.trim().to_string(), b.trim().to_string()),
        None => {
            let name = row.block_or_section_label.trim().to_string();
            (name.clone(), format!("{}_YD", name))
        }
    };

    let section = store
        .find_section_by_line_and_names(line, &from_name, &to_name)
        .await
        .map_err(|e| format!("store error resolving section: {}", e))?
        .ok_or_else(|| format!("no section {} -> {} on line {}", from_name, to_name, line))?;

    let preferred_window = match (&row.preferred_start_time, &row.preferred_end_time) {
        (Some(s), Some(e)) => {
            let start = NaiveTime::parse_from_str(s, "%H:%M").map_err(|e| format!("unparseable preferred_start_time: {}", e))?;
            let end = NaiveTime::parse_from_str(e, "%H:%M").map_err(|e| format!("unparseable preferred_end_time: {}", e))?;
            Some(PreferredWindow::new(start, end))
        }
        (None, None) => None,
        _ => return Err("preferred_start_time and preferred_end_time must be given together".to_string()),
    };

    let requested_duration = match (row.block_duration_minutes, preferred_window) {
        (Some(minutes), Some(window)) => {
            let duration = Duration::minutes(minutes);
            if duration > window.range() {
                return Err(format!("block_duration_minutes {} exceeds preferred window range", minutes));
            }
            duration
        }
        (Some(minutes), None) => Duration::minutes(minutes),
        (None, Some(window)) => window.range(),
        (None, None) => return Err("either block_duration_minutes or a preferred window is required".to_string()),
    };

    if requested_duration <= Duration::zero() {
        return Err("requested_duration must be positive".to_string());
    }

    let priority = row.priority.unwrap_or(1);
    if priority < 1 {
        return Err(format!("priority must be >= 1, got {}", priority));
    }

    Ok(PartialTask {
        section_id: section.id,
        department: row.department.clone(),
        division_engineer: row.den.clone(),
        nature_of_work: row.nature_of_work.clone(),
        block_label: row.block_or_section_label.clone(),
        location: row.location.clone(),
        preferred_window,
        requested_date,
        requested_duration,
        priority,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_label_splits_into_a_yard_pair() {
        let (from, to) = match "MAS".split_once('-') {
            Some((a, b)) => (a.to_string(), b.to_string()),
            None => ("MAS".to_string(), "MAS_YD".to_string()),
        };
        assert_eq!(from, "MAS");
        assert_eq!(to, "MAS_YD");
    }
}
