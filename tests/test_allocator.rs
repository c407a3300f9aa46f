use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use section_slot_allocator::config::TRAIN_PRIORITY;
use section_slot_allocator::domain::allocator::no_higher_priority_overlap;
use section_slot_allocator::domain::ids::SectionId;
use section_slot_allocator::domain::node::NodePosition;
use section_slot_allocator::domain::scheduler::RequestScheduler;
use section_slot_allocator::domain::section::Line;
use section_slot_allocator::domain::slot::{Occupant, Slot};
use section_slot_allocator::domain::store::memory::InMemoryStore;
use section_slot_allocator::domain::store::{PartialTask, RecordStore};
use section_slot_allocator::domain::task::{MaintenanceRequest, PlacementOutcome, PreferredWindow};
use std::sync::Arc;

async fn section(store: &InMemoryStore) -> SectionId {
    let a = store.insert_node("Alpha", NodePosition::One).await.unwrap();
    let b = store.insert_node("Beta", NodePosition::Two).await.unwrap();
    store.insert_section(a, b, "Alpha", "Beta", Line::Up).await.unwrap()
}

fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 8, d).unwrap()
}

fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn start_of_time() -> NaiveDateTime {
    date(1).and_time(time(0, 0))
}

async fn insert_request(
    store: &InMemoryStore,
    section_id: SectionId,
    priority: i64,
    requested_date: NaiveDate,
    window: Option<(NaiveTime, NaiveTime)>,
    duration_minutes: i64,
) -> MaintenanceRequest {
    let preferred_window = window.map(|(s, e)| PreferredWindow::new(s, e));
    let task_id = store
        .insert_task(PartialTask {
            section_id,
            department: "Signal & Telecom".to_string(),
            division_engineer: "DEN/North".to_string(),
            nature_of_work: "track renewal".to_string(),
            block_label: "Alpha-Beta".to_string(),
            location: "km 12".to_string(),
            preferred_window,
            requested_date,
            requested_duration: Duration::minutes(duration_minutes),
            priority,
        })
        .await
        .unwrap();
    store.get_task(&task_id).await.unwrap().unwrap()
}

fn placed_interval(outcome: &PlacementOutcome) -> (NaiveDateTime, NaiveDateTime) {
    match outcome {
        PlacementOutcome::Placed { starts_at, ends_at, .. } => (*starts_at, *ends_at),
        PlacementOutcome::Unplaced { task_id, reason } => panic!("expected a placed outcome, task {} was unplaced: {}", task_id, reason),
    }
}

fn assert_no_overlaps(outcomes: &[PlacementOutcome]) {
    let mut intervals: Vec<(NaiveDateTime, NaiveDateTime)> = outcomes.iter().map(placed_interval).collect();
    intervals.sort();
    for pair in intervals.windows(2) {
        assert!(pair[0].1 <= pair[1].0, "placed slots {:?} and {:?} overlap", pair[0], pair[1]);
    }
}

#[tokio::test]
async fn empty_timeline_single_request_lands_in_its_preferred_window() {
    let store = Arc::new(InMemoryStore::new());
    let section_id = section(&store).await;
    let request = insert_request(&store, section_id, 1, date(5), Some((time(2, 0), time(4, 0))), 120).await;

    let scheduler = RequestScheduler::new(store.clone());
    let report = scheduler.schedule(vec![request], start_of_time()).await.unwrap();

    assert_eq!(report.placed.len(), 1);
    assert_eq!(placed_interval(&report.placed[0]), (date(5).and_time(time(2, 0)), date(5).and_time(time(4, 0))));
}

#[tokio::test]
async fn higher_priority_request_preempts_and_requeues_the_lower_priority_task() {
    let store = Arc::new(InMemoryStore::new());
    let section_id = section(&store).await;
    let scheduler = RequestScheduler::new(store.clone());

    let low = insert_request(&store, section_id.clone(), 1, date(5), Some((time(2, 0), time(4, 0))), 120).await;
    let first = scheduler.schedule(vec![low], start_of_time()).await.unwrap();
    assert_eq!(first.placed.len(), 1);

    let high = insert_request(&store, section_id.clone(), 2, date(5), Some((time(2, 30), time(3, 30))), 60).await;
    let second = scheduler.schedule(vec![high], start_of_time()).await.unwrap();

    // The new task and the displaced one are both placed, non-overlapping.
    assert_eq!(second.placed.len(), 2);
    assert_no_overlaps(&second.placed);
    let new_slot = second.placed.iter().find(|o| matches!(o, PlacementOutcome::Placed { starts_at, .. } if *starts_at == date(5).and_time(time(2, 30))));
    assert!(new_slot.is_some(), "the higher-priority task must land exactly in its preferred window");

    // Invariant 4: the higher-priority placement never intersects a slot of
    // equal-or-greater priority that was already on the section.
    let tx = store.begin(&section_id).await.unwrap();
    let (starts_at, ends_at) = placed_interval(new_slot.unwrap());
    assert!(no_higher_priority_overlap(&*tx, 2, starts_at, ends_at).await.unwrap());
    tx.commit().await.unwrap();
}

#[tokio::test]
async fn a_fixed_train_slot_is_never_displaced_and_the_request_picks_the_better_overlap() {
    let store = Arc::new(InMemoryStore::new());
    let section_id = section(&store).await;
    let train_id = store.insert_train("Chennai Mail", "12601").await.unwrap();

    {
        let mut tx = store.begin(&section_id).await.unwrap();
        tx.insert_slot(Slot::new(section_id.clone(), date(5).and_time(time(3, 0)), date(5).and_time(time(3, 20)), TRAIN_PRIORITY, Occupant::Train(train_id)))
            .await
            .unwrap();
        tx.commit().await.unwrap();
    }

    let request = insert_request(&store, section_id, 5, date(5), Some((time(2, 30), time(3, 30))), 30).await;
    let scheduler = RequestScheduler::new(store.clone());
    let report = scheduler.schedule(vec![request], start_of_time()).await.unwrap();

    assert_eq!(report.placed.len(), 1);
    assert_eq!(placed_interval(&report.placed[0]), (date(5).and_time(time(2, 30)), date(5).and_time(time(3, 0))));
}

#[tokio::test]
async fn a_preferred_window_wrapping_midnight_starts_at_the_preferred_start() {
    let store = Arc::new(InMemoryStore::new());
    let section_id = section(&store).await;
    let request = insert_request(&store, section_id, 1, date(5), Some((time(23, 30), time(1, 0))), 45).await;

    let scheduler = RequestScheduler::new(store.clone());
    let report = scheduler.schedule(vec![request], start_of_time()).await.unwrap();

    assert_eq!(report.placed.len(), 1);
    let (starts_at, _) = placed_interval(&report.placed[0]);
    assert_eq!(starts_at, date(5).and_time(time(23, 30)));
}

#[tokio::test]
async fn a_section_fully_covered_by_train_slots_reports_no_free_slot() {
    let store = Arc::new(InMemoryStore::new());
    let section_id = section(&store).await;
    let train_id = store.insert_train("Night Goods", "00601").await.unwrap();

    {
        let mut tx = store.begin(&section_id).await.unwrap();
        tx.insert_slot(Slot::new(section_id.clone(), date(5).and_time(time(0, 0)), date(6).and_time(time(0, 0)), TRAIN_PRIORITY, Occupant::Train(train_id)))
            .await
            .unwrap();
        tx.commit().await.unwrap();
    }

    let request = insert_request(&store, section_id, 5, date(5), Some((time(2, 0), time(3, 0))), 30).await;
    let task_id = request.task_id.clone();
    let scheduler = RequestScheduler::new(store.clone());
    let report = scheduler.schedule(vec![request], start_of_time()).await.unwrap();

    assert!(report.placed.is_empty());
    assert_eq!(report.unplaced.len(), 1);
    match &report.unplaced[0] {
        PlacementOutcome::Unplaced { task_id: unplaced_id, reason } => {
            assert_eq!(*unplaced_id, task_id);
            assert!(reason.contains("no feasible gap"), "unexpected reason: {}", reason);
        }
        other => panic!("expected Unplaced, got {:?}", other),
    }

    // The task record survives even though it was never placed.
    assert!(store.get_task(&task_id).await.unwrap().is_some());
}

#[tokio::test]
async fn preemption_cascades_across_three_adjacent_low_priority_slots() {
    let store = Arc::new(InMemoryStore::new());
    let section_id = section(&store).await;
    let scheduler = RequestScheduler::new(store.clone());

    let first = insert_request(&store, section_id.clone(), 1, date(5), Some((time(2, 0), time(3, 0))), 60).await;
    let second = insert_request(&store, section_id.clone(), 1, date(5), Some((time(3, 0), time(4, 0))), 60).await;
    let third = insert_request(&store, section_id.clone(), 1, date(5), Some((time(4, 0), time(5, 0))), 60).await;
    let setup = scheduler.schedule(vec![first, second, third], start_of_time()).await.unwrap();
    assert_eq!(setup.placed.len(), 3);

    let high = insert_request(&store, section_id, 2, date(5), Some((time(2, 30), time(4, 30))), 120).await;
    let report = scheduler.schedule(vec![high], start_of_time()).await.unwrap();

    // The incoming request plus all three displaced tasks end up placed,
    // none of them overlapping.
    assert_eq!(report.placed.len(), 4);
    assert_no_overlaps(&report.placed);
}
