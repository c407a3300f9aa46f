use anyhow::{Context, Result};
use clap::Parser;
use section_slot_allocator::api::{roster, timetable, topology};
use section_slot_allocator::config::{Cli, TRAIN_SLOT_FILL_LENGTH};
use section_slot_allocator::domain::scheduler::RequestScheduler;
use section_slot_allocator::domain::store::memory::InMemoryStore;
use section_slot_allocator::domain::store::RecordStore;
use section_slot_allocator::domain::timetable::{interpolation, seeder};
use section_slot_allocator::domain::topology as topology_bootstrap;
use section_slot_allocator::ingest::{output, requests};
use section_slot_allocator::logger;
use std::sync::Arc;

/// Pure glue (§6): loads the four input files, drives topology bootstrap,
/// train seeding, and ingest, then runs the scheduler and writes both output
/// files. No algorithmic content lives here.
#[tokio::main]
async fn main() -> Result<()> {
    logger::init();

    let cli = Cli::parse();
    let store = Arc::new(InMemoryStore::new());

    let node_names = topology::load_topology(&cli.topology).context("loading topology catalogue")?;
    topology_bootstrap::bootstrap(store.as_ref(), &node_names).await.context("bootstrapping topology")?;

    let roster_entries = roster::load_roster(&cli.trains).context("loading train roster")?;
    for entry in &roster_entries {
        store.insert_train(&entry.name, &entry.number).await.context("registering train")?;
    }

    let raw_schedules = timetable::load_timetable(&cli.timetable).context("loading timetable")?;
    let resolved_schedules: Vec<_> = raw_schedules.into_iter().map(interpolation::resolve).collect();

    let horizon_days = if cli.horizon_days > 0 { cli.horizon_days } else { TRAIN_SLOT_FILL_LENGTH };
    let start_date = chrono::Local::now().date_naive();
    seeder::seed_trains(store.as_ref(), &resolved_schedules, horizon_days, start_date).await.context("seeding train slots")?;

    let (accepted, rejected) = requests::ingest(store.as_ref(), &cli.requests).await.context("ingesting maintenance requests")?;

    let mut maintenance_requests = Vec::with_capacity(accepted.len());
    for accepted_request in accepted {
        let task_id = store.insert_task(accepted_request.partial).await.context("inserting task record")?;
        let request = store.get_task(&task_id).await.context("reading back inserted task")?.expect("task was just inserted");
        maintenance_requests.push(request);
    }

    let now = chrono::Local::now().naive_local();
    let scheduler = RequestScheduler::new(store.clone());
    let report = scheduler.schedule(maintenance_requests, now).await.context("scheduling maintenance requests")?;

    output::write_placed(store.as_ref(), &report.placed, &cli.out).await.context("writing placed output")?;
    output::write_errors(&rejected, &report.unplaced, &cli.errors_out).context("writing error sidecar")?;

    log::info!(
        "run complete: {} requested, {} placed, {} unplaced, {} rejected at ingest",
        report.requested.len(),
        report.placed.len(),
        report.unplaced.len(),
        rejected.len(),
    );

    Ok(())
}
