//! Zone system for entity list membership.
//!
//! ## Key Types
//!
//! - `Location`: A hand, a board, or the graveyard
//! - `ZoneManager`: Entity location index and per-list ordering

pub mod manager;

pub use manager::{Location, ZoneManager};

// Re-export the coarse client zone for convenience
pub use crate::core::entity::Zone;
