//! The in-memory daily aggregate for one user

use chrono::{DateTime, Local, NaiveDate};
use tally_api::{kind_of, CounterField, DayStateView, EventCategory, FieldKind, NamedEvent};
use tally_util::TallyError;

/// One user's live day state.
///
/// A pure value object: operations never block and have no I/O side
/// effects. Counters are clamped at zero and the event lists are
/// append-only in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct DayState {
    /// The logical day this state accumulates
    pub date: NaiveDate,

    /// Hour (0-23) of the last intra-day snapshot, reset to `None`
    /// whenever `date` changes
    pub last_snapshot_hour: Option<u32>,

    poop: u32,
    piss: u32,
    coffee: u32,
    shower: u32,
    sick: u32,
    workout: u32,
    nap: u32,
    party: u32,

    restaurants: Vec<NamedEvent>,
    films: Vec<NamedEvent>,
    shows: Vec<NamedEvent>,
    books: Vec<NamedEvent>,
}

impl DayState {
    /// Fresh zeroed state for a day
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            last_snapshot_hour: None,
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
        *self.counter_mut(field) = value;
    }

    fn counter_mut(&mut self, field: CounterField) -> &mut u32 {
        match field {
            CounterField::Poop => &mut self.poop,
            CounterField::Piss => &mut self.piss,
            CounterField::Coffee => &mut self.coffee,
            CounterField::Shower => &mut self.shower,
            CounterField::Sick => &mut self.sick,
            CounterField::Workout => &mut self.workout,
            CounterField::Nap => &mut self.nap,
            CounterField::Party => &mut self.party,
        }
    }

    pub fn events(&self, category: EventCategory) -> &[NamedEvent] {
        match category {
            EventCategory::Restaurants => &self.restaurants,
            EventCategory::Films => &self.films,
            EventCategory::Shows => &self.shows,
            EventCategory::Books => &self.books,
        }
    }

    fn events_mut(&mut self, category: EventCategory) -> &mut Vec<NamedEvent> {
        match category {
            EventCategory::Restaurants => &mut self.restaurants,
            EventCategory::Films => &mut self.films,
            EventCategory::Shows => &mut self.shows,
            EventCategory::Books => &mut self.books,
        }
    }

    /// Append an already-timestamped event (recovery replay)
    pub fn push_event(&mut self, category: EventCategory, event: NamedEvent) {
        self.events_mut(category).push(event);
    }

    /// Increment a counter field by one
    pub fn increment(&mut self, field: &str) -> Result<(), TallyError> {
        let field = counter_target(field)?;
        let counter = self.counter_mut(field);
        *counter = counter.saturating_add(1);
        Ok(())
    }

    /// Decrement a counter field by one, clamped at zero.
    ///
    /// Decrementing a counter already at zero succeeds and leaves it
    /// at zero.
    pub fn decrement(&mut self, field: &str) -> Result<(), TallyError> {
        let field = counter_target(field)?;
        let counter = self.counter_mut(field);
        *counter = counter.saturating_sub(1);
        Ok(())
    }

    /// Toggle a counter treated as a boolean: nonzero becomes 0, zero
    /// becomes 1
    pub fn toggle(&mut self, field: &str) -> Result<(), TallyError> {
        let field = counter_target(field)?;
        let counter = self.counter_mut(field);
        *counter = if *counter != 0 { 0 } else { 1 };
        Ok(())
    }

    /// Append a named event to a category
    pub fn add_event(
        &mut self,
        category: &str,
        name: impl Into<String>,
        time: DateTime<Local>,
    ) -> Result<(), TallyError> {
        let category = EventCategory::parse(category)
            .ok_or_else(|| TallyError::UnknownField(category.to_string()))?;
        self.events_mut(category).push(NamedEvent {
            name: name.into(),
            time,
        });
        Ok(())
    }

    /// Snapshot-by-value view for serialization
    pub fn to_view(&self) -> DayStateView {
        DayStateView {
            date: self.date,
            poop: self.poop,
            piss: self.piss,
            coffee: self.coffee,
            shower: self.shower,
            sick: self.sick,
            workout: self.workout,
            nap: self.nap,
            party: self.party,
            restaurants: self.restaurants.clone(),
            films: self.films.clone(),
            shows: self.shows.clone(),
            books: self.books.clone(),
            last_snapshot_hour: self.last_snapshot_hour,
            read_only: false,
        }
    }
}

/// Resolve the target of a counter operation against the declared
/// field schema
fn counter_target(name: &str) -> Result<CounterField, TallyError> {
    match kind_of(name) {
        Some(FieldKind::Counter) => {
            // parse cannot fail for a name classified as Counter
            CounterField::parse(name).ok_or_else(|| TallyError::UnknownField(name.to_string()))
        }
        Some(FieldKind::EventList) => Err(TallyError::NotNumeric(name.to_string())),
        None => Err(TallyError::UnknownField(name.to_string())),
    }
}
