use crate::domain::allocator;
use crate::domain::ids::{SectionId, TaskId};
use crate::domain::store::RecordStore;
use crate::domain::task::{MaintenanceRequest, PlacementOutcome};
use crate::error::Result;
use chrono::NaiveDateTime;
use std::collections::HashMap;
use std::sync::Arc;

/// Result of one call to `RequestScheduler::schedule` (§4.4, §7): three
/// disjoint task-id lists plus the placement detail needed to write the
/// output file.
#[derive(Debug, Default)]
pub struct ScheduleReport {
    pub requested: Vec<TaskId>,
    pub placed: Vec<PlacementOutcome>,
    pub unplaced: Vec<PlacementOutcome>,
}

impl ScheduleReport {
    fn extend(&mut self, outcomes: Vec<PlacementOutcome>) {
        for outcome in outcomes {
            match &outcome {
                PlacementOutcome::Placed { task_id, .. } => self.requested.push(task_id.clone()),
                PlacementOutcome::Unplaced { task_id, .. } => self.requested.push(task_id.clone()),
            }
            match outcome {
                PlacementOutcome::Placed { .. } => self.placed.push(outcome),
                PlacementOutcome::Unplaced { .. } => self.unplaced.push(outcome),
            }
        }
    }
}

/// Batches a set of requests by `section_id` and drives the allocator (§4.3)
/// with a fresh work-heap per section. Never reorders requests across
/// sections; different sections' batches are independent and run as
/// concurrent `tokio` tasks (§5).
pub struct RequestScheduler<S: RecordStore + 'static> {
    store: Arc<S>,
}

impl<S: RecordStore + 'static> RequestScheduler<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn schedule(&self, requests: Vec<MaintenanceRequest>, now: NaiveDateTime) -> Result<ScheduleReport> {
        let mut by_section: HashMap<SectionId, Vec<MaintenanceRequest>> = HashMap::new();
        for request in requests {
            by_section.entry(request.section_id.clone()).or_default().push(request);
        }

        let mut tasks = Vec::with_capacity(by_section.len());
        for (section_id, section_requests) in by_section {
            let store = self.store.clone();
            tasks.push(tokio::spawn(async move { run_section_batch(store, section_id, section_requests, now).await }));
        }

        let mut report = ScheduleReport::default();
        for task in tasks {
            let outcomes = task.await.map_err(|e| crate::error::Error::StoreError(format!("scheduling task panicked: {}", e)))??;
            report.extend(outcomes);
        }

        Ok(report)
    }
}

async fn run_section_batch<S: RecordStore + 'static>(
    store: Arc<S>,
    section_id: SectionId,
    requests: Vec<MaintenanceRequest>,
    now: NaiveDateTime,
) -> Result<Vec<PlacementOutcome>> {
    let mut tx = store.begin(&section_id).await?;
    match allocator::run_batch(&mut *tx, &section_id, requests, now).await {
        Ok(outcomes) => {
            tx.commit().await?;
            Ok(outcomes)
        }
        Err(e) => {
            log::error!("batch on section {} failed, rolling back: {}", section_id, e);
            tx.rollback().await?;
            Err(e)
        }
    }
}
