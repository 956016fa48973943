//! Store trait definitions

use chrono::NaiveDate;
use tally_util::Username;

use crate::{EventRecord, SnapshotRecord, StoreResult};

/// Append-only persistence gateway for day archives.
///
/// Absence of rows is reported as `Ok(None)` / an empty `Vec`; an `Err`
/// always means the store itself failed and the caller must treat the
/// result as unknown, not as "no data".
pub trait Store: Send + Sync {
    /// Append one snapshot row, returning its row ID. Rows are never
    /// updated; multiple snapshots may exist per (user, day).
    fn append_snapshot(&self, record: &SnapshotRecord) -> StoreResult<i64>;

    /// Append named-event rows in a single transaction
    fn append_events(&self, records: &[EventRecord]) -> StoreResult<()>;

    /// Most recently created snapshot row for (user, day), if any
    fn latest_snapshot(
        &self,
        user: &Username,
        day: NaiveDate,
    ) -> StoreResult<Option<SnapshotRecord>>;

    /// All named-event rows for (user, day), in insertion order
    fn events_for_day(&self, user: &Username, day: NaiveDate) -> StoreResult<Vec<EventRecord>>;

    /// Check if the store is healthy
    fn is_healthy(&self) -> bool;
}
