//! Day-state registry, rollover scheduler and startup recovery

use chrono::{DateTime, Local, NaiveDate, Timelike};
use std::collections::HashMap;
use std::sync::Arc;
use tally_api::{CounterField, DayStateView, EventCategory, NamedEvent};
use tally_store::{EventRecord, SnapshotKind, SnapshotRecord, Store, StoreError};
use tally_util::{Clock, TallyError, Username};
use tracing::{debug, info, warn};

use crate::{DayState, TickEvent};

/// Scheduling knobs for the rollover tick
#[derive(Debug, Clone)]
pub struct SnapshotSchedule {
    /// Hours at which intra-day snapshots fire
    pub hours: Vec<u32>,

    /// Width of the minute window at the start of a snapshot hour.
    /// The window exists so a once-per-minute tick fires the snapshot
    /// once, not for the whole hour.
    pub minute_window: u32,
}

impl SnapshotSchedule {
    fn matches(&self, hour: u32, minute: u32) -> bool {
        self.hours.contains(&hour) && minute < self.minute_window
    }
}

impl Default for SnapshotSchedule {
    fn default() -> Self {
        Self {
            hours: vec![3, 6, 9, 12, 15, 18, 21],
            minute_window: 1,
        }
    }
}

/// Per-category count of event rows already flushed to the store.
///
/// Events are replicated into persistence at rollover/snapshot time,
/// not at creation time; the cursor guarantees each row is appended
/// exactly once across multiple snapshots of the same day.
#[derive(Debug, Clone, Copy, Default)]
struct FlushCursor {
    restaurants: usize,
    films: usize,
    shows: usize,
    books: usize,
}

impl FlushCursor {
    fn get(&self, category: EventCategory) -> usize {
        match category {
            EventCategory::Restaurants => self.restaurants,
            EventCategory::Films => self.films,
            EventCategory::Shows => self.shows,
            EventCategory::Books => self.books,
        }
    }

    fn set(&mut self, category: EventCategory, count: usize) {
        match category {
            EventCategory::Restaurants => self.restaurants = count,
            EventCategory::Films => self.films = count,
            EventCategory::Shows => self.shows = count,
            EventCategory::Books => self.books = count,
        }
    }
}

struct UserEntry {
    state: DayState,
    flushed: FlushCursor,
}

/// Owns every user's live day state.
///
/// Exactly one `DayState` exists per active user; all mutations and
/// the periodic tick serialize through this object, so a persisted
/// snapshot always reflects an exact momentary state.
pub struct DayRegistry {
    users: HashMap<Username, UserEntry>,
    store: Arc<dyn Store>,
    clock: Arc<dyn Clock>,
    schedule: SnapshotSchedule,
}

impl DayRegistry {
    /// Reconstruct live state for every known user from the most
    /// recent same-day snapshot plus same-day event rows.
    ///
    /// Must complete before the service accepts mutation requests. Any
    /// store failure that is not simply "no prior rows" is fatal: the
    /// service must not serve a user whose history could not be
    /// determined.
    pub fn recover(
        usernames: &[Username],
        store: Arc<dyn Store>,
        clock: Arc<dyn Clock>,
        schedule: SnapshotSchedule,
    ) -> Result<Self, StoreError> {
        let today = clock.today();
        let mut users = HashMap::new();

        for name in usernames {
            let entry = recover_user(store.as_ref(), name, today)?;
            users.insert(name.clone(), entry);
        }

        info!(user_count = users.len(), %today, "Day registry recovered");

        Ok(Self {
            users,
            store,
            clock,
            schedule,
        })
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    /// Snapshot-by-value of a user's live state
    pub fn state(&self, user: &Username) -> Result<DayStateView, TallyError> {
        self.users
            .get(user)
            .map(|entry| entry.state.to_view())
            .ok_or_else(|| TallyError::UserNotFound(user.clone()))
    }

    pub fn increment(&mut self, user: &Username, field: &str) -> Result<DayStateView, TallyError> {
        let entry = self.entry_mut(user)?;
        entry.state.increment(field)?;
        Ok(entry.state.to_view())
    }

    pub fn decrement(&mut self, user: &Username, field: &str) -> Result<DayStateView, TallyError> {
        let entry = self.entry_mut(user)?;
        entry.state.decrement(field)?;
        Ok(entry.state.to_view())
    }

    pub fn toggle(&mut self, user: &Username, field: &str) -> Result<DayStateView, TallyError> {
        let entry = self.entry_mut(user)?;
        entry.state.toggle(field)?;
        Ok(entry.state.to_view())
    }

    /// Append a named event, timestamped from the injected clock.
    ///
    /// The event is durable only from the next rollover/snapshot tick
    /// onward; a crash before that loses it (known limitation, bounded
    /// by the tick interval).
    pub fn add_event(
        &mut self,
        user: &Username,
        category: &str,
        name: impl Into<String>,
    ) -> Result<DayStateView, TallyError> {
        let time = self.clock.now();
        let entry = self.entry_mut(user)?;
        entry.state.add_event(category, name, time)?;
        Ok(entry.state.to_view())
    }

    fn entry_mut(&mut self, user: &Username) -> Result<&mut UserEntry, TallyError> {
        self.users
            .get_mut(user)
            .ok_or_else(|| TallyError::UserNotFound(user.clone()))
    }

    /// Evaluate rollover and snapshot conditions for every user.
    ///
    /// The midnight check runs first on every tick and wins over the
    /// intra-day snapshot; snapshot evaluation only proceeds on states
    /// whose date already equals today, so a freshly reset state never
    /// also fires a snapshot in the same tick. A persistence failure
    /// leaves the in-memory state untouched and the same condition
    /// retries on the next tick.
    pub fn tick(&mut self) -> Vec<TickEvent> {
        let now = self.clock.now();
        let today = now.date_naive();
        let hour = now.hour();
        let minute = now.minute();
        let mut events = Vec::new();

        for (user, entry) in self.users.iter_mut() {
            // Midnight rollover, independent of time of day
            if entry.state.date != today {
                match persist_day(self.store.as_ref(), user, entry, SnapshotKind::Midnight, now) {
                    Ok(()) => {
                        let archived_day = entry.state.date;
                        entry.state = DayState::new(today);
                        entry.flushed = FlushCursor::default();
                        info!(user = %user, %archived_day, new_day = %today, "Midnight rollover");
                        events.push(TickEvent::RolledOver {
                            user: user.clone(),
                            archived_day,
                            new_day: today,
                        });
                    }
                    Err(e) => {
                        warn!(user = %user, error = %e, "Rollover persist failed, retrying next tick");
                        events.push(TickEvent::PersistFailed {
                            user: user.clone(),
                            error: e.to_string(),
                        });
                    }
                }
                continue;
            }

            // Intra-day snapshot: observational checkpoint, no reset
            if self.schedule.matches(hour, minute) && entry.state.last_snapshot_hour != Some(hour) {
                match persist_day(self.store.as_ref(), user, entry, SnapshotKind::Snapshot, now) {
                    Ok(()) => {
                        entry.state.last_snapshot_hour = Some(hour);
                        info!(user = %user, hour, "Snapshot taken");
                        events.push(TickEvent::SnapshotTaken {
                            user: user.clone(),
                            hour,
                        });
                    }
                    Err(e) => {
                        warn!(user = %user, error = %e, "Snapshot persist failed");
                        events.push(TickEvent::PersistFailed {
                            user: user.clone(),
                            error: e.to_string(),
                        });
                    }
                }
            }
        }

        events
    }
}

fn recover_user(
    store: &dyn Store,
    name: &Username,
    today: NaiveDate,
) -> Result<UserEntry, StoreError> {
    let mut state = DayState::new(today);

    match store.latest_snapshot(name, today)? {
        None => {
            debug!(user = %name, "No snapshot for today, starting fresh");
        }
        Some(snapshot) => {
            for field in CounterField::ALL {
                state.set_counter(field, snapshot.counter(field));
            }
            state.date = snapshot.day;
            // Deliberately None even when the loaded snapshot was an
            // intra-day one for the current hour: one extra snapshot
            // may fire, never one too few.
            state.last_snapshot_hour = None;
            info!(user = %name, kind = snapshot.kind.as_str(), "Recovered snapshot");
        }
    }

    let rows = store.events_for_day(name, today)?;
    let replayed = rows.len();
    for row in rows {
        state.push_event(
            row.category,
            NamedEvent {
                name: row.name,
                time: row.time,
            },
        );
    }

    // Replayed rows are already durable; start the cursor past them
    let mut flushed = FlushCursor::default();
    for category in EventCategory::ALL {
        flushed.set(category, state.events(category).len());
    }

    if replayed > 0 {
        info!(user = %name, replayed, "Replayed same-day events");
    }

    Ok(UserEntry { state, flushed })
}

/// Append a snapshot row plus the event rows not yet flushed.
///
/// The flush cursor only advances after both appends succeed, so a
/// failed attempt re-sends the same tail on the next try. A duplicate
/// snapshot row for the same day is acceptable (latest wins); event
/// rows are appended in one transaction and never duplicated.
fn persist_day(
    store: &dyn Store,
    user: &Username,
    entry: &mut UserEntry,
    kind: SnapshotKind,
    now: DateTime<Local>,
) -> Result<(), StoreError> {
    let state = &entry.state;

    let mut record = SnapshotRecord::new(user.clone(), state.date, kind, now);
    for field in CounterField::ALL {
        record.set_counter(field, state.counter(field));
    }
    for category in EventCategory::ALL {
        record.set_event_count(category, state.events(category).len() as u32);
    }
    store.append_snapshot(&record)?;

    let mut rows = Vec::new();
    for category in EventCategory::ALL {
        for event in &state.events(category)[entry.flushed.get(category)..] {
            rows.push(EventRecord {
                id: 0,
                username: user.clone(),
                day: state.date,
                category,
                name: event.name.clone(),
                time: event.time,
            });
        }
    }
    if !rows.is_empty() {
        store.append_events(&rows)?;
    }

    for category in EventCategory::ALL {
        entry.flushed.set(category, state.events(category).len());
    }

    Ok(())
}
