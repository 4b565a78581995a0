//! Core tracker types: entities, sides, match state, intents, configuration.
//!
//! This module holds the reconstructed model of a match. The log module
//! mutates it; the strategy module reads it.

pub mod action;
pub mod config;
pub mod entity;
pub mod error;
pub mod player;
pub mod state;

pub use action::{Defender, Intent, IntentRecord};
pub use config::TrackerConfig;
pub use entity::{EntityId, Zone};
pub use error::{IntegrityViolation, TrackerError, Warning};
pub use player::{Player, Side, SideMap};
pub use state::{MatchState, Outcome, Reconciled};
