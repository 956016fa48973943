//! Events emitted by the registry tick

use chrono::NaiveDate;
use tally_util::Username;

/// Outcome of one tick evaluation, per user
#[derive(Debug, Clone)]
pub enum TickEvent {
    /// The day changed: the old state was archived and replaced with a
    /// fresh zeroed state
    RolledOver {
        user: Username,
        archived_day: NaiveDate,
        new_day: NaiveDate,
    },

    /// An intra-day checkpoint was persisted (counters not reset)
    SnapshotTaken { user: Username, hour: u32 },

    /// A persistence attempt failed; in-memory state was left untouched
    /// and the same condition will retry on the next tick
    PersistFailed { user: Username, error: String },
}
