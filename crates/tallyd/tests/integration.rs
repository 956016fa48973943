//! Integration tests for tallyd
//!
//! These tests verify the end-to-end behavior of the daemon's library
//! crates working together: config parsing, the day registry lifecycle
//! against a real on-disk store, and recovery across process restarts.

use chrono::NaiveDate;
use std::sync::Arc;
use tally_config::parse_config;
use tally_core::{DayRegistry, SnapshotSchedule, TickEvent};
use tally_store::{SnapshotKind, SqliteStore, Store};
use tally_util::{ManualClock, Username};

const TEST_CONFIG: &str = r#"
config_version = 1

[service]
listen_addr = "127.0.0.1:3000"
tick_interval_secs = 60

[[users]]
name = "mikel"
password = "1234"

[[users]]
name = "eneko"
password = "valladares"
"#;

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
}

fn mikel() -> Username {
    Username::new("mikel")
}

#[test]
fn config_parses_with_defaults() {
    let settings = parse_config(TEST_CONFIG).unwrap();

    assert_eq!(settings.users.len(), 2);
    assert_eq!(settings.service.listen_addr, "127.0.0.1:3000");
    assert_eq!(settings.service.snapshot_hours, vec![3, 6, 9, 12, 15, 18, 21]);
    assert!(settings.lookup_user("mikel", "1234"));
    assert!(!settings.lookup_user("mikel", "4321"));
}

#[test]
fn full_day_lifecycle_with_restart() {
    let settings = parse_config(TEST_CONFIG).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("tallyd.db");
    let clock = Arc::new(ManualClock::at(day(), 8, 30));
    let schedule = SnapshotSchedule {
        hours: settings.service.snapshot_hours.clone(),
        minute_window: settings.service.snapshot_minute_window,
    };

    // Morning session: a few counters and an event
    {
        let store = Arc::new(SqliteStore::open(&db_path).unwrap());
        let mut registry = DayRegistry::recover(
            &settings.usernames(),
            store,
            clock.clone(),
            schedule.clone(),
        )
        .unwrap();

        registry.increment(&mikel(), "coffee").unwrap();
        registry.increment(&mikel(), "coffee").unwrap();
        registry.increment(&mikel(), "poop").unwrap();
        registry.add_event(&mikel(), "films", "Dune").unwrap();

        // 12:00 snapshot
        clock.set_at(day(), 12, 0);
        let events = registry.tick();
        assert!(events
            .iter()
            .any(|e| matches!(e, TickEvent::SnapshotTaken { hour: 12, .. })));
    }

    // Process restart in the afternoon: state comes back intact
    clock.set_at(day(), 14, 0);
    let store = Arc::new(SqliteStore::open(&db_path).unwrap());
    let mut registry = DayRegistry::recover(
        &settings.usernames(),
        store.clone(),
        clock.clone(),
        schedule,
    )
    .unwrap();

    let view = registry.state(&mikel()).unwrap();
    assert_eq!(view.coffee, 2);
    assert_eq!(view.poop, 1);
    assert_eq!(view.films.len(), 1);
    assert_eq!(view.films[0].name, "Dune");

    // Afternoon mutations, then midnight rollover
    registry.increment(&mikel(), "workout").unwrap();
    registry.add_event(&mikel(), "books", "Dune").unwrap();

    let next = day().succ_opt().unwrap();
    clock.set_at(next, 0, 0);
    let events = registry.tick();
    assert_eq!(
        events
            .iter()
            .filter(|e| matches!(e, TickEvent::RolledOver { .. }))
            .count(),
        2 // both configured users roll over
    );

    // The archive holds the full old day
    let snapshot = store.latest_snapshot(&mikel(), day()).unwrap().unwrap();
    assert_eq!(snapshot.kind, SnapshotKind::Midnight);
    assert_eq!(snapshot.coffee, 2);
    assert_eq!(snapshot.workout, 1);
    assert_eq!(snapshot.film_count, 1);
    assert_eq!(snapshot.book_count, 1);

    let rows = store.events_for_day(&mikel(), day()).unwrap();
    assert_eq!(rows.len(), 2);

    // Live state starts fresh on the new day
    let view = registry.state(&mikel()).unwrap();
    assert_eq!(view.date, next);
    assert_eq!(view.coffee, 0);
    assert!(view.books.is_empty());

    // An uninvolved user stays untouched but also rolled over
    let view = registry.state(&Username::new("eneko")).unwrap();
    assert_eq!(view.date, next);
    assert_eq!(view.coffee, 0);
}

#[test]
fn recovery_after_crash_between_snapshots() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("tallyd.db");
    let clock = Arc::new(ManualClock::at(day(), 9, 0));
    let users = [mikel()];

    {
        let store = Arc::new(SqliteStore::open(&db_path).unwrap());
        let mut registry = DayRegistry::recover(
            &users,
            store,
            clock.clone(),
            SnapshotSchedule::default(),
        )
        .unwrap();

        registry.increment(&mikel(), "sick").unwrap();
        registry.tick(); // 09:00 snapshot persists it

        // Mutations after the snapshot are lost on crash
        registry.increment(&mikel(), "sick").unwrap();
    }

    clock.set_at(day(), 10, 0);
    let store = Arc::new(SqliteStore::open(&db_path).unwrap());
    let registry =
        DayRegistry::recover(&users, store, clock, SnapshotSchedule::default()).unwrap();

    let view = registry.state(&mikel()).unwrap();
    assert_eq!(view.sick, 1);
    // Recovery never trusts a stale snapshot guard
    assert_eq!(view.last_snapshot_hour, None);
}
