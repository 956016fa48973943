//! Day-state views and request/response bodies

use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::EventCategory;

/// A named event within a category (restaurant visit, film watched, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedEvent {
    pub name: String,
    pub time: DateTime<Local>,
}

/// Snapshot-by-value of a user's day state, as serialized to clients.
///
/// Live reads always return a copy, never a reference into the
/// registry. Historical reads for days with no live state set
/// `read_only`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayStateView {
    pub date: NaiveDate,
    pub poop: u32,
    pub piss: u32,
    pub coffee: u32,
    pub shower: u32,
    pub sick: u32,
    pub workout: u32,
    pub nap: u32,
    pub party: u32,
    pub restaurants: Vec<NamedEvent>,
    pub films: Vec<NamedEvent>,
    pub shows: Vec<NamedEvent>,
    pub books: Vec<NamedEvent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_snapshot_hour: Option<u32>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub read_only: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl DayStateView {
    /// Zeroed view for a day with no recorded state
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            poop: 0,
            piss: 0,
            coffee: 0,
            shower: 0,
            sick: 0,
            workout: 0,
            nap: 0,
            party: 0,
            restaurants: Vec::new(),
            films: Vec::new(),
            shows: Vec::new(),
            books: Vec::new(),
            last_snapshot_hour: None,
            read_only: false,
        }
    }

    pub fn events_mut(&mut self, category: EventCategory) -> &mut Vec<NamedEvent> {
        match category {
            EventCategory::Restaurants => &mut self.restaurants,
            EventCategory::Films => &mut self.films,
            EventCategory::Shows => &mut self.shows,
            EventCategory::Books => &mut self.books,
        }
    }
}

/// `POST /login` body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub user: String,
    pub password: String,
}

/// `POST /login` success response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub ok: bool,
    pub user: String,
}

/// `POST /add/{user}/{category}` body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddEventRequest {
    pub name: String,
}

/// Error body for non-2xx responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// `GET /health` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub api_version: u32,
    pub live: bool,
    pub store_ok: bool,
    pub user_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_view_serialization_omits_optional_flags() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let view = DayStateView::empty(date);

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["date"], "2024-03-01");
        assert_eq!(json["poop"], 0);
        assert!(json.get("lastSnapshotHour").is_none());
        assert!(json.get("readOnly").is_none());
    }

    #[test]
    fn read_only_flag_serializes_camel_case() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let mut view = DayStateView::empty(date);
        view.read_only = true;
        view.last_snapshot_hour = Some(6);

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["readOnly"], true);
        assert_eq!(json["lastSnapshotHour"], 6);
    }
}
