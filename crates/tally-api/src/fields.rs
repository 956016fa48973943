//! Static field schema
//!
//! Every recognized day-state field is declared here together with its
//! kind, so mutation dispatch matches on the declared kind instead of
//! sniffing the runtime shape of a value. The singular/plural mapping
//! between the persisted event type and the in-memory category key is
//! an explicit bidirectional table, declared once.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a recognized field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Non-negative integer counter, mutated by increment/decrement/toggle
    Counter,
    /// Ordered list of named events, mutated by add
    EventList,
}

/// Daily counter fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CounterField {
    Poop,
    Piss,
    Coffee,
    Shower,
    Sick,
    Workout,
    Nap,
    Party,
}

impl CounterField {
    pub const ALL: [CounterField; 8] = [
        CounterField::Poop,
        CounterField::Piss,
        CounterField::Coffee,
        CounterField::Shower,
        CounterField::Sick,
        CounterField::Workout,
        CounterField::Nap,
        CounterField::Party,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CounterField::Poop => "poop",
            CounterField::Piss => "piss",
            CounterField::Coffee => "coffee",
            CounterField::Shower => "shower",
            CounterField::Sick => "sick",
            CounterField::Workout => "workout",
            CounterField::Nap => "nap",
            CounterField::Party => "party",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.iter().find(|f| f.as_str() == name).copied()
    }
}

impl fmt::Display for CounterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Named-event categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    Restaurants,
    Films,
    Shows,
    Books,
}

impl EventCategory {
    pub const ALL: [EventCategory; 4] = [
        EventCategory::Restaurants,
        EventCategory::Films,
        EventCategory::Shows,
        EventCategory::Books,
    ];

    /// In-memory category key (plural), as used in API paths and views
    pub fn as_str(&self) -> &'static str {
        match self {
            EventCategory::Restaurants => "restaurants",
            EventCategory::Films => "films",
            EventCategory::Shows => "shows",
            EventCategory::Books => "books",
        }
    }

    /// Persisted row form (singular)
    pub fn record_type(&self) -> &'static str {
        match self {
            EventCategory::Restaurants => "restaurant",
            EventCategory::Films => "film",
            EventCategory::Shows => "show",
            EventCategory::Books => "book",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.iter().find(|c| c.as_str() == name).copied()
    }

    pub fn from_record_type(name: &str) -> Option<Self> {
        Self::ALL.iter().find(|c| c.record_type() == name).copied()
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classify a field name against the declared schema
pub fn kind_of(name: &str) -> Option<FieldKind> {
    if CounterField::parse(name).is_some() {
        Some(FieldKind::Counter)
    } else if EventCategory::parse(name).is_some() {
        Some(FieldKind::EventList)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_fields_parse_round_trip() {
        for field in CounterField::ALL {
            assert_eq!(CounterField::parse(field.as_str()), Some(field));
        }
        assert_eq!(CounterField::parse("films"), None);
        assert_eq!(CounterField::parse("beer"), None);
    }

    #[test]
    fn category_lookup_table_is_bidirectional() {
        for category in EventCategory::ALL {
            assert_eq!(EventCategory::parse(category.as_str()), Some(category));
            assert_eq!(
                EventCategory::from_record_type(category.record_type()),
                Some(category)
            );
        }
        // plural and singular forms never cross
        assert_eq!(EventCategory::parse("restaurant"), None);
        assert_eq!(EventCategory::from_record_type("restaurants"), None);
    }

    #[test]
    fn kind_dispatch() {
        assert_eq!(kind_of("poop"), Some(FieldKind::Counter));
        assert_eq!(kind_of("books"), Some(FieldKind::EventList));
        assert_eq!(kind_of("mood"), None);
    }
}
