use chrono::NaiveDate;
use section_slot_allocator::domain::section::Line;
use section_slot_allocator::domain::store::memory::InMemoryStore;
use section_slot_allocator::domain::store::RecordStore;
use section_slot_allocator::domain::timetable::seeder::seed_trains;
use section_slot_allocator::domain::timetable::{RawSchedule, StationTime};
use section_slot_allocator::domain::topology::bootstrap;

fn time(h: u32, m: u32) -> chrono::NaiveTime {
    chrono::NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

async fn setup() -> InMemoryStore {
    let store = InMemoryStore::new();
    bootstrap(&store, &vec!["Alpha".to_string(), "Beta".to_string()]).await.unwrap();
    store.insert_train("Express", "101").await.unwrap();
    store
}

fn schedule() -> RawSchedule {
    RawSchedule {
        number: "101".to_string(),
        on_days: [true; 7],
        stations: vec![
            ("Alpha".to_string(), StationTime { arrival: None, departure: Some(time(2, 0)) }),
            ("Beta".to_string(), StationTime { arrival: Some(time(3, 0)), departure: None }),
        ],
    }
}

async fn slot_count(store: &InMemoryStore, section_id: &section_slot_allocator::domain::ids::SectionId) -> usize {
    let tx = store.begin(section_id).await.unwrap();
    let count = tx.find_fixed_slots(i64::MIN, chrono::NaiveDateTime::MIN).await.unwrap().len();
    tx.commit().await.unwrap();
    count
}

#[tokio::test]
async fn seeding_emits_one_slot_per_active_day_in_the_horizon() {
    let store = setup().await;
    let resolved = section_slot_allocator::domain::timetable::interpolation::resolve(schedule());
    let section_id = store.find_section_by_line_and_names(Line::Up, "Alpha", "Beta").await.unwrap().unwrap().id;

    seed_trains(&store, &[resolved], 5, NaiveDate::from_ymd_opt(2026, 8, 1).unwrap()).await.unwrap();

    assert_eq!(slot_count(&store, &section_id).await, 5);
}

#[tokio::test]
async fn seeding_the_same_horizon_twice_does_not_duplicate_slots() {
    let store = setup().await;
    let resolved = section_slot_allocator::domain::timetable::interpolation::resolve(schedule());
    let section_id = store.find_section_by_line_and_names(Line::Up, "Alpha", "Beta").await.unwrap().unwrap().id;

    seed_trains(&store, &[resolved.clone()], 5, NaiveDate::from_ymd_opt(2026, 8, 1).unwrap()).await.unwrap();
    seed_trains(&store, &[resolved], 5, NaiveDate::from_ymd_opt(2026, 8, 1).unwrap()).await.unwrap();

    assert_eq!(slot_count(&store, &section_id).await, 5);
}

#[tokio::test]
async fn seeding_honours_the_on_days_mask() {
    let store = setup().await;
    let mut raw = schedule();
    raw.on_days = [true, false, false, false, false, false, false];
    let resolved = section_slot_allocator::domain::timetable::interpolation::resolve(raw);
    let section_id = store.find_section_by_line_and_names(Line::Up, "Alpha", "Beta").await.unwrap().unwrap().id;

    // 2026-08-03 is a Monday; a 7-day horizon from that date hits exactly one Monday.
    seed_trains(&store, &[resolved], 7, NaiveDate::from_ymd_opt(2026, 8, 3).unwrap()).await.unwrap();

    assert_eq!(slot_count(&store, &section_id).await, 1);
}
