//! Decision layer: what to play and what to attack.
//!
//! Everything here is pure over a `MatchState` snapshot (or over the small
//! views derived from it) and produces `Intent`s. Nothing touches the
//! client; the session resolves intents into effector commands.
//!
//! ## Key Types
//!
//! - `Combatant`: Attack, remaining health, readiness and taunt of a minion
//! - `HandCard`: Cost and kind of a card in hand
//! - `Play`: Chosen cards plus the optional bonus card
//! - `TurnPlan`: Plays, hero power and attacks for one turn

pub mod attack;
pub mod combinations;
pub mod plan;
pub mod spend;
pub mod trade;

pub use attack::plan_attacks;
pub use combinations::Combinations;
pub use plan::{cards_to_play, plan_turn, TurnPlan};
pub use spend::{best_play, best_play_limited, best_play_with_bonus, choose_plays, HandCard, Play};
pub use trade::{minimal_killers, Combatant, Killers};
