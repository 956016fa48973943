//! Shared types for the tallyd HTTP API
//!
//! This crate defines the stable vocabulary between the engine and its
//! clients:
//! - The static field schema (counter fields and event categories)
//! - Day-state views returned to clients
//! - Request and response bodies

mod fields;
mod views;

pub use fields::*;
pub use views::*;

/// Current API version
pub const API_VERSION: u32 = 1;
