//! SQLite-based store implementation

use chrono::{DateTime, Local, NaiveDate};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::Mutex;
use tally_api::EventCategory;
use tally_util::Username;
use tracing::{debug, warn};

use crate::{EventRecord, SnapshotKind, SnapshotRecord, Store, StoreError, StoreResult};

const DAY_FORMAT: &str = "%Y-%m-%d";

/// SQLite-based store
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create a store at the given path
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Create an in-memory store (for testing)
    pub fn in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();

        conn.execute_batch(
            r#"
            -- Day-state snapshots (append-only)
            CREATE TABLE IF NOT EXISTS snapshots (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL,
                day TEXT NOT NULL,
                kind TEXT NOT NULL,
                poop INTEGER NOT NULL,
                piss INTEGER NOT NULL,
                coffee INTEGER NOT NULL,
                shower INTEGER NOT NULL,
                sick INTEGER NOT NULL,
                workout INTEGER NOT NULL,
                nap INTEGER NOT NULL,
                party INTEGER NOT NULL,
                restaurant_count INTEGER NOT NULL,
                film_count INTEGER NOT NULL,
                show_count INTEGER NOT NULL,
                book_count INTEGER NOT NULL,
                created_at TEXT NOT NULL
            );

            -- Named events (append-only)
            CREATE TABLE IF NOT EXISTS day_events (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL,
                day TEXT NOT NULL,
                category TEXT NOT NULL,
                name TEXT NOT NULL,
                time TEXT NOT NULL
            );

            -- Indexes
            CREATE INDEX IF NOT EXISTS idx_snapshots_user_day ON snapshots(username, day);
            CREATE INDEX IF NOT EXISTS idx_day_events_user_day ON day_events(username, day);
            "#,
        )?;

        debug!("Store schema initialized");
        Ok(())
    }
}

fn parse_day(s: &str) -> StoreResult<NaiveDate> {
    NaiveDate::parse_from_str(s, DAY_FORMAT)
        .map_err(|e| StoreError::Database(format!("bad day value '{s}': {e}")))
}

fn parse_timestamp(s: &str) -> StoreResult<DateTime<Local>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Local))
        .map_err(|e| StoreError::Database(format!("bad timestamp '{s}': {e}")))
}

fn snapshot_from_row(row: &Row<'_>) -> rusqlite::Result<(SnapshotRecord, String, String, String)> {
    let record = SnapshotRecord {
        id: row.get(0)?,
        username: Username::new(row.get::<_, String>(1)?),
        // day, kind and created_at are parsed by the caller
        day: NaiveDate::MIN,
        kind: SnapshotKind::Snapshot,
        poop: row.get::<_, i64>(4)? as u32,
        piss: row.get::<_, i64>(5)? as u32,
        coffee: row.get::<_, i64>(6)? as u32,
        shower: row.get::<_, i64>(7)? as u32,
        sick: row.get::<_, i64>(8)? as u32,
        workout: row.get::<_, i64>(9)? as u32,
        nap: row.get::<_, i64>(10)? as u32,
        party: row.get::<_, i64>(11)? as u32,
        restaurant_count: row.get::<_, i64>(12)? as u32,
        film_count: row.get::<_, i64>(13)? as u32,
        show_count: row.get::<_, i64>(14)? as u32,
        book_count: row.get::<_, i64>(15)? as u32,
        created_at: Local::now(),
    };
    Ok((record, row.get(2)?, row.get(3)?, row.get(16)?))
}

impl Store for SqliteStore {
    fn append_snapshot(&self, record: &SnapshotRecord) -> StoreResult<i64> {
        let conn = self.conn.lock().unwrap();

        conn.execute(
            r#"
            INSERT INTO snapshots (
                username, day, kind,
                poop, piss, coffee, shower, sick, workout, nap, party,
                restaurant_count, film_count, show_count, book_count,
                created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                record.username.as_str(),
                record.day.format(DAY_FORMAT).to_string(),
                record.kind.as_str(),
                record.poop as i64,
                record.piss as i64,
                record.coffee as i64,
                record.shower as i64,
                record.sick as i64,
                record.workout as i64,
                record.nap as i64,
                record.party as i64,
                record.restaurant_count as i64,
                record.film_count as i64,
                record.show_count as i64,
                record.book_count as i64,
                record.created_at.to_rfc3339(),
            ],
        )?;

        let id = conn.last_insert_rowid();
        debug!(
            user = %record.username,
            day = %record.day,
            kind = record.kind.as_str(),
            snapshot_id = id,
            "Snapshot appended"
        );
        Ok(id)
    }

    fn append_events(&self, records: &[EventRecord]) -> StoreResult<()> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;

        for record in records {
            tx.execute(
                "INSERT INTO day_events (username, day, category, name, time) VALUES (?, ?, ?, ?, ?)",
                params![
                    record.username.as_str(),
                    record.day.format(DAY_FORMAT).to_string(),
                    record.category.record_type(),
                    record.name,
                    record.time.to_rfc3339(),
                ],
            )?;
        }

        tx.commit()?;
        debug!(event_count = records.len(), "Event rows appended");
        Ok(())
    }

    fn latest_snapshot(
        &self,
        user: &Username,
        day: NaiveDate,
    ) -> StoreResult<Option<SnapshotRecord>> {
        let conn = self.conn.lock().unwrap();

        let row = conn
            .query_row(
                r#"
                SELECT id, username, day, kind,
                       poop, piss, coffee, shower, sick, workout, nap, party,
                       restaurant_count, film_count, show_count, book_count,
                       created_at
                FROM snapshots
                WHERE username = ? AND day = ?
                ORDER BY id DESC
                LIMIT 1
                "#,
                params![user.as_str(), day.format(DAY_FORMAT).to_string()],
                snapshot_from_row,
            )
            .optional()?;

        match row {
            None => Ok(None),
            Some((mut record, day_str, kind_str, created_str)) => {
                record.day = parse_day(&day_str)?;
                record.kind = SnapshotKind::parse(&kind_str)
                    .ok_or_else(|| StoreError::Database(format!("unknown snapshot kind '{kind_str}'")))?;
                record.created_at = parse_timestamp(&created_str)?;
                Ok(Some(record))
            }
        }
    }

    fn events_for_day(&self, user: &Username, day: NaiveDate) -> StoreResult<Vec<EventRecord>> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn.prepare(
            r#"
            SELECT id, category, name, time
            FROM day_events
            WHERE username = ? AND day = ?
            ORDER BY id ASC
            "#,
        )?;

        let rows = stmt.query_map(
            params![user.as_str(), day.format(DAY_FORMAT).to_string()],
            |row| {
                let id: i64 = row.get(0)?;
                let category: String = row.get(1)?;
                let name: String = row.get(2)?;
                let time: String = row.get(3)?;
                Ok((id, category, name, time))
            },
        )?;

        let mut events = Vec::new();
        for row in rows {
            let (id, category_str, name, time_str) = row?;
            let category = EventCategory::from_record_type(&category_str).ok_or_else(|| {
                StoreError::Database(format!("unknown event category '{category_str}'"))
            })?;

            events.push(EventRecord {
                id,
                username: user.clone(),
                day,
                category,
                name,
                time: parse_timestamp(&time_str)?,
            });
        }

        Ok(events)
    }

    fn is_healthy(&self) -> bool {
        match self.conn.lock() {
            Ok(conn) => conn.query_row("SELECT 1", [], |_| Ok(())).is_ok(),
            Err(_) => {
                warn!("Store lock poisoned");
                false
            }
        }
    }
}
