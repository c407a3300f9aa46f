//! Tunables that are constants in the original system rather than user input.

use clap::Parser;
use std::path::PathBuf;

/// Sentinel priority assigned to every slot seeded from a timetable. Strictly
/// greater than any admissible maintenance-task priority, so a train pass can
/// never be preempted by a maintenance request.
pub const TRAIN_PRIORITY: i64 = i64::MAX;

/// Default horizon, in days, over which the train seeder expands a periodic
/// timetable into concrete fixed slots.
pub const TRAIN_SLOT_FILL_LENGTH: i64 = 380;

/// Fixed slots must end at least this far in the future to be treated as an
/// obstruction by the allocator (see §4.3 step 1 of the allocator spec).
pub const MIN_LEAD_TIME_DAYS: i64 = 1;

/// Command-line surface (§6): pure glue wiring the topology bootstrap, train
/// seeder, ingest adapter, and request scheduler together. No algorithmic
/// content lives here.
#[derive(Debug, Parser)]
#[command(name = "section_slot_allocator", about = "Schedules maintenance work onto a railway's section-level slot timeline")]
pub struct Cli {
    /// Node catalogue JSON (ordered array of node names).
    #[arg(long)]
    pub topology: PathBuf,

    /// Train roster JSON (`[{name, number}]`).
    #[arg(long)]
    pub trains: PathBuf,

    /// Timetable JSON (`"<number>, <on_days>" -> ordered station map`).
    #[arg(long)]
    pub timetable: PathBuf,

    /// Maintenance-request CSV.
    #[arg(long)]
    pub requests: PathBuf,

    /// Placed-output CSV.
    #[arg(long)]
    pub out: PathBuf,

    /// Unplaced/rejected sidecar CSV.
    #[arg(long = "errors-out")]
    pub errors_out: PathBuf,

    /// Overrides `TRAIN_SLOT_FILL_LENGTH` for this run.
    #[arg(long = "horizon-days", default_value_t = TRAIN_SLOT_FILL_LENGTH)]
    pub horizon_days: i64,
}
