//! Shared utilities for tallyd
//!
//! This crate provides:
//! - The `Username` identifier type
//! - The `Clock` abstraction (system and manually-driven implementations)
//! - The core error taxonomy

mod clock;
mod error;
mod ids;

pub use clock::*;
pub use error::*;
pub use ids::*;
