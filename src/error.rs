use thiserror::Error;

/// Error taxonomy for the slot allocator and its surrounding glue.
///
/// `NoFreeSlot` and `InvalidRequest` are per-request outcomes collected by the
/// scheduler, never raised as hard failures. `TopologyMismatch` and
/// `StoreError` are batch-level: they abort the enclosing transaction.
#[derive(Debug, Error)]
pub enum Error {
    #[error("no feasible gap for request on section {section}: requested duration {requested_duration_minutes}min on {requested_date}")]
    NoFreeSlot { section: String, requested_date: chrono::NaiveDate, requested_duration_minutes: i64 },

    #[error("invalid request at row {row}: {reason}")]
    InvalidRequest { row: usize, reason: String },

    #[error("timetable references unknown topology element: {0}")]
    TopologyMismatch(String),

    #[error("record store failure: {0}")]
    StoreError(String),

    #[error("file not found or could not be read: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("failed to read/write CSV: {0}")]
    CsvError(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
