use super::{DisplacedTask, PartialTask, RecordStore, SectionTransaction};
use crate::domain::ids::{NodeId, SectionId, TaskId, TrainId};
use crate::domain::node::{Node, NodePosition};
use crate::domain::section::{Line, Section};
use crate::domain::slot::Slot;
use crate::domain::task::MaintenanceRequest;
use crate::domain::train::Train;
use crate::error::{Error, Result};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use uuid::Uuid;

#[derive(Debug, Clone)]
struct TaskRecord {
    request: MaintenanceRequest,
}

/// Per-section timeline, ordered by `starts_at`. Two slots can never share a
/// `starts_at` because intervals are non-empty and non-overlapping (data
/// model invariant 1), so `BTreeMap` gives us the ordering §4.3 step 1 needs
/// for free.
type Timeline = BTreeMap<NaiveDateTime, Slot>;

/// In-memory reference implementation of `RecordStore` (§1a, §4.5).
///
/// Mirrors the shape of the upstream `ReservationStore`: plain maps guarded
/// by locks, with one `Mutex` per section's timeline so that concurrent
/// batches on different sections never contend, while a batch on the same
/// section is fully serialised for its duration (§5).
#[derive(Debug, Default)]
pub struct InMemoryStore {
    nodes: RwLock<HashMap<NodeId, Node>>,
    node_index: RwLock<HashMap<(String, u8), NodeId>>,

    sections: RwLock<HashMap<SectionId, Section>>,
    section_index: RwLock<HashMap<(String, String, String), SectionId>>,

    trains: RwLock<HashMap<TrainId, Train>>,
    train_index: RwLock<HashMap<String, TrainId>>,

    tasks: Arc<RwLock<HashMap<TaskId, TaskRecord>>>,

    timelines: RwLock<HashMap<SectionId, Arc<Mutex<Timeline>>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn timeline_for(&self, section_id: &SectionId) -> Arc<Mutex<Timeline>> {
        if let Some(t) = self.timelines.read().await.get(section_id) {
            return t.clone();
        }
        let mut guard = self.timelines.write().await;
        guard.entry(section_id.clone()).or_insert_with(|| Arc::new(Mutex::new(BTreeMap::new()))).clone()
    }
}

#[async_trait]
impl RecordStore for InMemoryStore {
    async fn begin(&self, section_id: &SectionId) -> Result<Box<dyn SectionTransaction>> {
        let timeline = self.timeline_for(section_id).await;
        let guard = timeline.lock_owned().await;
        let snapshot = guard.clone();
        Ok(Box::new(InMemoryTransaction { section_id: section_id.clone(), guard, snapshot, tasks: self.tasks.clone() }))
    }

    async fn insert_task(&self, partial: PartialTask) -> Result<TaskId> {
        let task_id = TaskId::new(Uuid::new_v4().to_string());
        let request = MaintenanceRequest {
            task_id: task_id.clone(),
            section_id: partial.section_id,
            department: partial.department,
            division_engineer: partial.division_engineer,
            nature_of_work: partial.nature_of_work,
            block_label: partial.block_label,
            location: partial.location,
            preferred_window: partial.preferred_window,
            requested_date: partial.requested_date,
            requested_duration: partial.requested_duration,
            priority: partial.priority,
        };
        self.tasks.write().await.insert(task_id.clone(), TaskRecord { request });
        Ok(task_id)
    }

    async fn find_section_by_line_and_names(&self, line: Line, start_name: &str, end_name: &str) -> Result<Option<Section>> {
        let key = (line.to_string(), start_name.to_string(), end_name.to_string());
        let index = self.section_index.read().await;
        match index.get(&key) {
            Some(id) => Ok(self.sections.read().await.get(id).cloned()),
            None => Ok(None),
        }
    }

    async fn insert_node(&self, name: &str, position: NodePosition) -> Result<NodeId> {
        let key = (name.to_string(), position as u8);
        if self.node_index.read().await.contains_key(&key) {
            return Err(Error::StoreError(format!("duplicate node (name, position): ({}, {:?})", name, position)));
        }
        let node_id = NodeId::new(format!("{}#{}", name, position as u8));
        let node = Node::new(node_id.clone(), name, position);
        self.nodes.write().await.insert(node_id.clone(), node);
        self.node_index.write().await.insert(key, node_id.clone());
        Ok(node_id)
    }

    async fn insert_section(&self, from_node: NodeId, to_node: NodeId, from_name: &str, to_name: &str, line: Line) -> Result<SectionId> {
        let key = (line.to_string(), from_name.to_string(), to_name.to_string());
        if self.section_index.read().await.contains_key(&key) {
            return Err(Error::StoreError(format!("duplicate section (from, to, line): ({}, {}, {})", from_name, to_name, line)));
        }
        let section_id = SectionId::new(format!("{}->{}:{}", from_node, to_node, line));
        let section = Section::new(section_id.clone(), from_node, to_node, from_name, to_name, line);
        self.sections.write().await.insert(section_id.clone(), section);
        self.section_index.write().await.insert(key, section_id.clone());
        Ok(section_id)
    }

    async fn insert_train(&self, name: &str, number: &str) -> Result<TrainId> {
        if let Some(id) = self.train_index.read().await.get(number) {
            return Ok(id.clone());
        }
        let train_id = TrainId::new(number.to_string());
        let train = Train::new(train_id.clone(), name, number);
        self.trains.write().await.insert(train_id.clone(), train);
        self.train_index.write().await.insert(number.to_string(), train_id.clone());
        Ok(train_id)
    }

    async fn get_node_by_name_position(&self, name: &str, position: NodePosition) -> Result<Option<Node>> {
        let key = (name.to_string(), position as u8);
        match self.node_index.read().await.get(&key) {
            Some(id) => Ok(self.nodes.read().await.get(id).cloned()),
            None => Ok(None),
        }
    }

    async fn get_train_by_number(&self, number: &str) -> Result<Option<Train>> {
        match self.train_index.read().await.get(number) {
            Some(id) => Ok(self.trains.read().await.get(id).cloned()),
            None => Ok(None),
        }
    }

    async fn all_sections(&self) -> Result<Vec<Section>> {
        Ok(self.sections.read().await.values().cloned().collect())
    }

    async fn get_section(&self, section_id: &SectionId) -> Result<Option<Section>> {
        Ok(self.sections.read().await.get(section_id).cloned())
    }

    async fn get_task(&self, task_id: &TaskId) -> Result<Option<MaintenanceRequest>> {
        Ok(self.tasks.read().await.get(task_id).map(|record| record.request.clone()))
    }
}

struct InMemoryTransaction {
    section_id: SectionId,
    guard: OwnedMutexGuard<Timeline>,
    snapshot: Timeline,
    tasks: Arc<RwLock<HashMap<TaskId, TaskRecord>>>,
}

#[async_trait]
impl SectionTransaction for InMemoryTransaction {
    async fn find_fixed_slots(&self, min_priority: i64, after: NaiveDateTime) -> Result<Vec<Slot>> {
        Ok(self.guard.values().filter(|s| s.priority >= min_priority && s.ends_at >= after).cloned().collect())
    }

    async fn pop_intersecting_slots(&mut self, starts_at: NaiveDateTime, ends_at: NaiveDateTime, min_priority: i64) -> Result<Vec<DisplacedTask>> {
        let to_remove: Vec<NaiveDateTime> =
            self.guard.iter().filter(|(_, s)| s.priority < min_priority && s.intersects(starts_at, ends_at)).map(|(k, _)| *k).collect();

        let mut displaced = Vec::new();
        for key in to_remove {
            if let Some(slot) = self.guard.remove(&key) {
                if let Some(task_id) = slot.task_id() {
                    let tasks = self.tasks.read().await;
                    if let Some(record) = tasks.get(&task_id) {
                        displaced.push(DisplacedTask { request: record.request.clone() });
                    }
                }
            }
        }
        Ok(displaced)
    }

    async fn insert_slot(&mut self, slot: Slot) -> Result<Slot> {
        if slot.section_id != self.section_id {
            return Err(Error::StoreError(format!("slot for section {} inserted into transaction for section {}", slot.section_id, self.section_id)));
        }
        if self.guard.values().any(|s| s.intersects(slot.starts_at, slot.ends_at)) {
            return Err(Error::StoreError(format!("slot [{}, {}) overlaps an existing slot on section {}", slot.starts_at, slot.ends_at, self.section_id)));
        }
        self.guard.insert(slot.starts_at, slot.clone());
        Ok(slot)
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        // The timeline was mutated in place under the lock; nothing further
        // to flush. Dropping `self` releases the lock.
        Ok(())
    }

    async fn rollback(mut self: Box<Self>) -> Result<()> {
        *self.guard = self.snapshot;
        Ok(())
    }
}
