//! Persisted record types

use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tally_api::{CounterField, EventCategory};
use tally_util::Username;

/// Snapshot kind: end-of-day archive or intra-day checkpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotKind {
    Midnight,
    Snapshot,
}

impl SnapshotKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SnapshotKind::Midnight => "midnight",
            SnapshotKind::Snapshot => "snapshot",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "midnight" => Some(SnapshotKind::Midnight),
            "snapshot" => Some(SnapshotKind::Snapshot),
            _ => None,
        }
    }
}

/// One archived day-state row (immutable once written).
///
/// Carries counter values and per-category event *counts*; full event
/// bodies live in [`EventRecord`] rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotRecord {
    /// Row ID, set by the store on append
    pub id: i64,
    pub username: Username,
    pub day: NaiveDate,
    pub kind: SnapshotKind,
    pub poop: u32,
    pub piss: u32,
    pub coffee: u32,
    pub shower: u32,
    pub sick: u32,
    pub workout: u32,
    pub nap: u32,
    pub party: u32,
    pub restaurant_count: u32,
    pub film_count: u32,
    pub show_count: u32,
    pub book_count: u32,
    pub created_at: DateTime<Local>,
}

impl SnapshotRecord {
    /// Zeroed record for a user and day; counters are filled in via
    /// [`SnapshotRecord::set_counter`] and [`SnapshotRecord::set_event_count`]
    pub fn new(
        username: Username,
        day: NaiveDate,
        kind: SnapshotKind,
        created_at: DateTime<Local>,
    ) -> Self {
        Self {
            id: 0,
            username,
            day,
            kind,
            poop: 0,
            piss: 0,
            coffee: 0,
            shower: 0,
            sick: 0,
            workout: 0,
            nap: 0,
            party: 0,
            restaurant_count: 0,
            film_count: 0,
            show_count: 0,
            book_count: 0,
            created_at,
        }
    }

    pub fn counter(&self, field: CounterField) -> u32 {
        match field {
            CounterField::Poop => self.poop,
            CounterField::Piss => self.piss,
            CounterField::Coffee => self.coffee,
            CounterField::Shower => self.shower,
            CounterField::Sick => self.sick,
            CounterField::Workout => self.workout,
            CounterField::Nap => self.nap,
            CounterField::Party => self.party,
        }
    }

    pub fn set_counter(&mut self, field: CounterField, value: u32) {
        match field {
            CounterField::Poop => self.poop = value,
            CounterField::Piss => self.piss = value,
            CounterField::Coffee => self.coffee = value,
            CounterField::Shower => self.shower = value,
            CounterField::Sick => self.sick = value,
            CounterField::Workout => self.workout = value,
            CounterField::Nap => self.nap = value,
            CounterField::Party => self.party = value,
        }
    }

    pub fn event_count(&self, category: EventCategory) -> u32 {
        match category {
            EventCategory::Restaurants => self.restaurant_count,
            EventCategory::Films => self.film_count,
            EventCategory::Shows => self.show_count,
            EventCategory::Books => self.book_count,
        }
    }

    pub fn set_event_count(&mut self, category: EventCategory, value: u32) {
        match category {
            EventCategory::Restaurants => self.restaurant_count = value,
            EventCategory::Films => self.film_count = value,
            EventCategory::Shows => self.show_count = value,
            EventCategory::Books => self.book_count = value,
        }
    }
}

/// One archived named-event row (immutable once written).
///
/// The category is stored in its singular `record_type` form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Row ID, set by the store on append
    pub id: i64,
    pub username: Username,
    pub day: NaiveDate,
    pub category: EventCategory,
    pub name: String,
    pub time: DateTime<Local>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_kind_round_trip() {
        assert_eq!(SnapshotKind::parse("midnight"), Some(SnapshotKind::Midnight));
        assert_eq!(SnapshotKind::parse("snapshot"), Some(SnapshotKind::Snapshot));
        assert_eq!(SnapshotKind::parse("hourly"), None);
    }

    #[test]
    fn counter_accessors_cover_all_fields() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let mut record =
            SnapshotRecord::new(Username::new("mikel"), day, SnapshotKind::Midnight, Local::now());

        for (i, field) in CounterField::ALL.into_iter().enumerate() {
            record.set_counter(field, i as u32 + 1);
        }
        for (i, field) in CounterField::ALL.into_iter().enumerate() {
            assert_eq!(record.counter(field), i as u32 + 1);
        }
    }

    #[test]
    fn event_count_accessors_cover_all_categories() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let mut record =
            SnapshotRecord::new(Username::new("mikel"), day, SnapshotKind::Midnight, Local::now());

        for category in EventCategory::ALL {
            assert_eq!(record.event_count(category), 0);
        }
        for (i, category) in EventCategory::ALL.into_iter().enumerate() {
            record.set_event_count(category, i as u32 + 1);
        }
        for (i, category) in EventCategory::ALL.into_iter().enumerate() {
            assert_eq!(record.event_count(category), i as u32 + 1);
        }
    }
}
