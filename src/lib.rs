//! # hearth-tracker
//!
//! Rebuilds the state of a two-player card match from the game client's
//! append-only event log, and decides what to do on our turn.
//!
//! ## Design Principles
//!
//! 1. **The log is the only truth**: Nothing is inferred from our own
//!    actions. An action is performed, then the log is read to learn what it
//!    did.
//!
//! 2. **Fail loud on desync**: Unknown ids and catalog misses are dropped
//!    with a warning; contradictions between the log and the model stop all
//!    decisions until the next game.
//!
//! 3. **Ids, not positions**: Plans name entities by id. Hand and board
//!    indices are computed only when a command is sent.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: the entity arena uses `im` so a
//!   `MatchState` snapshot is cheap to hand to the decision layer.
//!
//! - **Single-threaded**: the caller owns a `LogSession` and drives it;
//!   nothing here spawns threads or holds locks.
//!
//! ## Modules
//!
//! - `core`: Entity ids, sides, match state, intents, configuration, errors
//! - `zones`: Ordered hand/board/graveyard lists
//! - `cards`: Card catalog and tracked entities
//! - `log`: Log cursor, line rules, classifier, audit archive
//! - `strategy`: Trade search, attack policy, mana spending, turn planning
//! - `effector`: Positional commands for the client
//! - `session`: Log source, classifier and state bundled for a live match

pub mod core;
pub mod zones;
pub mod cards;
pub mod log;
pub mod strategy;
pub mod effector;
pub mod session;

// Re-export commonly used types
pub use crate::core::{
    Defender, EntityId, Intent, IntentRecord, IntegrityViolation, MatchState, Outcome,
    Player, Reconciled, Side, SideMap, TrackerConfig, TrackerError, Warning, Zone,
};

pub use crate::zones::{Location, ZoneManager};

pub use crate::cards::{
    CardDefinition, CardId, CardType, Catalog, CatalogError, Entity, EntityKind, Mechanic,
    Mechanics, NumericTag,
};

pub use crate::log::{
    AuditSink, Classifier, LineSource, LogCursor, LogEvent, LogTail, MemoryLog, Phase, RuleSet,
};

pub use crate::strategy::{
    best_play, best_play_with_bonus, cards_to_play, minimal_killers, plan_attacks, plan_turn,
    Combatant, HandCard, Play, TurnPlan,
};

pub use crate::effector::{AttackTarget, Command, Effector, EffectorError, RecordingEffector};

pub use crate::session::{LogSession, PumpSummary};
