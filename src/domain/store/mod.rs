pub mod memory;

use crate::domain::ids::{NodeId, SectionId, TaskId, TrainId};
use crate::domain::node::{Node, NodePosition};
use crate::domain::section::{Line, Section};
use crate::domain::slot::Slot;
use crate::domain::task::MaintenanceRequest;
use crate::domain::train::Train;
use crate::error::Result;
use async_trait::async_trait;
use chrono::NaiveDateTime;

/// Everything the store needs to create a task record (§4.5 `insert_task`).
/// Distinct from `MaintenanceRequest` in that it has no `task_id` yet.
#[derive(Debug, Clone)]
pub struct PartialTask {
    pub section_id: SectionId,
    pub department: String,
    pub division_engineer: String,
    pub nature_of_work: String,
    pub block_label: String,
    pub location: String,
    pub preferred_window: Option<crate::domain::task::PreferredWindow>,
    pub requested_date: chrono::NaiveDate,
    pub requested_duration: chrono::Duration,
    pub priority: i64,
}

/// A deleted task-owned slot, returned by `pop_intersecting_slots`, carrying
/// enough of the original request metadata to be reconstituted and pushed
/// back onto the work-heap (§4.3 step 7).
#[derive(Debug, Clone)]
pub struct DisplacedTask {
    pub request: MaintenanceRequest,
}

/// Grounds a scheduling batch's writes against one section so that
/// `pop_intersecting_slots` and the subsequent `insert_slot` (§4.3 steps 7-8)
/// are serialisable with any concurrent placement on the same section.
///
/// Holding a `SectionTransaction` is equivalent to holding the per-section
/// exclusive lock the concurrency model (§5) requires for one batch.
#[async_trait]
pub trait SectionTransaction: Send {
    async fn find_fixed_slots(&self, min_priority: i64, after: NaiveDateTime) -> Result<Vec<Slot>>;

    async fn pop_intersecting_slots(&mut self, starts_at: NaiveDateTime, ends_at: NaiveDateTime, min_priority: i64) -> Result<Vec<DisplacedTask>>;

    async fn insert_slot(&mut self, slot: Slot) -> Result<Slot>;

    async fn commit(self: Box<Self>) -> Result<()>;

    async fn rollback(self: Box<Self>) -> Result<()>;
}

/// The record store interface the allocator core consumes (§4.5). An
/// external collaborator; the in-memory `memory::InMemoryStore` is the
/// reference implementation used by tests and the CLI.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn begin(&self, section_id: &SectionId) -> Result<Box<dyn SectionTransaction>>;

    async fn insert_task(&self, partial: PartialTask) -> Result<TaskId>;

    async fn find_section_by_line_and_names(&self, line: Line, start_name: &str, end_name: &str) -> Result<Option<Section>>;

    async fn insert_node(&self, name: &str, position: NodePosition) -> Result<NodeId>;

    async fn insert_section(&self, from_node: NodeId, to_node: NodeId, from_name: &str, to_name: &str, line: Line) -> Result<SectionId>;

    async fn insert_train(&self, name: &str, number: &str) -> Result<TrainId>;

    async fn get_node_by_name_position(&self, name: &str, position: NodePosition) -> Result<Option<Node>>;

    async fn get_train_by_number(&self, number: &str) -> Result<Option<Train>>;

    async fn all_sections(&self) -> Result<Vec<Section>>;

    async fn get_section(&self, section_id: &SectionId) -> Result<Option<Section>>;

    async fn get_task(&self, task_id: &TaskId) -> Result<Option<MaintenanceRequest>>;
}
