//! Day-state lifecycle engine for tallyd
//!
//! This crate is the heart of tallyd, containing:
//! - The `DayState` value object and its invariants
//! - The `DayRegistry` owning every user's live state
//! - The rollover/snapshot tick (midnight reset vs. intra-day checkpoint)
//! - Startup recovery from the latest persisted snapshot plus same-day
//!   event rows

mod engine;
mod events;
mod state;

pub use engine::*;
pub use events::*;
pub use state::*;
