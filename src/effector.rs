//! Effector seam: turning intents into client input.
//!
//! The tracker never drives the client itself. An `Effector` receives
//! positional `Command`s (hand slot out of hand size, board slot out of
//! board size) and performs the input. It returns once the input is
//! submitted; whether it worked is learned later from the log.
//!
//! Intents name entities by id. `resolve` maps them to positions against
//! the state as it is at execution time, so kills and plays earlier in the
//! turn are accounted for.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::action::{Defender, Intent};
use crate::core::entity::EntityId;
use crate::core::error::TrackerError;
use crate::core::player::Side;
use crate::core::state::MatchState;

/// What an attack is aimed at, positionally.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackTarget {
    /// Enemy minion at `index` (0-based) of a board holding `board_size`.
    Minion { index: usize, board_size: usize },
    /// The enemy hero.
    Hero,
}

/// A positional input for the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Play the card at `hand_index` (0-based) of a hand holding `hand_size`.
    PlayCard { hand_index: usize, hand_size: usize },
    /// Attack with our minion at `attacker_index` of a board of `board_size`.
    Attack {
        attacker_index: usize,
        board_size: usize,
        target: AttackTarget,
    },
    HeroPower,
    EndTurn,
}

/// Failure to submit an input.
#[derive(Debug)]
pub enum EffectorError {
    /// The effector cannot act right now (window lost, not our turn).
    Unavailable(String),
    /// Underlying I/O failed.
    Io(std::io::Error),
}

impl std::fmt::Display for EffectorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EffectorError::Unavailable(reason) => write!(f, "effector unavailable: {reason}"),
            EffectorError::Io(err) => write!(f, "effector I/O: {err}"),
        }
    }
}

impl std::error::Error for EffectorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EffectorError::Io(err) => Some(err),
            EffectorError::Unavailable(_) => None,
        }
    }
}

impl From<std::io::Error> for EffectorError {
    fn from(err: std::io::Error) -> Self {
        EffectorError::Io(err)
    }
}

/// Performs commands against the game client.
///
/// Implementations must not wait for the outcome: the session reads the
/// log afterwards.
pub trait Effector {
    fn perform(&mut self, command: Command) -> Result<(), EffectorError>;
}

/// Keeps every command instead of performing it. Used for dry runs.
#[derive(Clone, Debug, Default)]
pub struct RecordingEffector {
    pub commands: Vec<Command>,
}

impl RecordingEffector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Effector for RecordingEffector {
    fn perform(&mut self, command: Command) -> Result<(), EffectorError> {
        self.commands.push(command);
        Ok(())
    }
}

/// Map an intent to a command against the current state.
///
/// Cards must be in our hand, attackers on our board and minion defenders
/// on the opposing board; anything else is a `StaleIntent`.
pub fn resolve(intent: &Intent, state: &MatchState) -> Result<Command, TrackerError> {
    state.ensure_synced()?;

    let command = match *intent {
        Intent::PlayCard { card } | Intent::UseBonus { card } => {
            let (hand_index, hand_size) = slot(state, state.hand(Side::Friendly), card)?;
            Command::PlayCard {
                hand_index,
                hand_size,
            }
        }
        Intent::Attack { attacker, defender } => {
            let (attacker_index, board_size) = slot(state, state.board(Side::Friendly), attacker)?;
            let target = match defender {
                Defender::Hero => AttackTarget::Hero,
                Defender::Minion(id) => {
                    let (index, board_size) = slot(state, state.board(Side::Opposing), id)?;
                    AttackTarget::Minion { index, board_size }
                }
            };
            Command::Attack {
                attacker_index,
                board_size,
                target,
            }
        }
        Intent::HeroPower => Command::HeroPower,
        Intent::EndTurn => Command::EndTurn,
    };
    debug!(%intent, ?command, "resolved intent");
    Ok(command)
}

/// 0-based slot and list size for `id`.
///
/// The client's 1-based position wins when it fits the list; otherwise the
/// list order is used.
fn slot(state: &MatchState, list: &[EntityId], id: EntityId) -> Result<(usize, usize), TrackerError> {
    let Some(listed) = list.iter().position(|&e| e == id) else {
        return Err(TrackerError::StaleIntent { entity: id });
    };
    let index = state
        .entity(id)
        .and_then(|e| e.position)
        .map(usize::from)
        .filter(|&p| (1..=list.len()).contains(&p))
        .map_or(listed, |p| p - 1);
    Ok((index, list.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardDefinition, CardId, CardType, Catalog};
    use crate::core::config::TrackerConfig;

    fn catalog() -> Catalog {
        [
            CardDefinition::new("CS2_168", "Murloc Raider", CardType::Minion)
                .with_cost(1)
                .with_stats(2, 1),
            CardDefinition::new("CS2_172", "Bloodfen Raptor", CardType::Minion)
                .with_cost(2)
                .with_stats(3, 2),
        ]
        .into_iter()
        .collect()
    }

    fn state() -> (MatchState, Catalog) {
        let mut state = MatchState::new(TrackerConfig::new("tingle"));
        state.start_game();
        state.set_player_number(1);
        (state, catalog())
    }

    #[test]
    fn test_play_card_uses_position() {
        let (mut state, catalog) = state();
        state.draw(&CardId::from("CS2_168"), EntityId(5), Some(1), &catalog);
        state.draw(&CardId::from("CS2_172"), EntityId(6), Some(2), &catalog);
        state.update_position(EntityId(5), 2);
        state.update_position(EntityId(6), 1);

        let command = resolve(&Intent::PlayCard { card: EntityId(5) }, &state).unwrap();
        assert_eq!(
            command,
            Command::PlayCard {
                hand_index: 1,
                hand_size: 2
            }
        );
    }

    #[test]
    fn test_attack_resolution() {
        let (mut state, catalog) = state();
        state
            .play(Side::Friendly, &CardId::from("CS2_172"), EntityId(30), &catalog)
            .unwrap();
        state
            .play(Side::Opposing, &CardId::from("CS2_168"), EntityId(40), &catalog)
            .unwrap();
        state
            .play(Side::Opposing, &CardId::from("CS2_172"), EntityId(41), &catalog)
            .unwrap();

        let trade = Intent::Attack {
            attacker: EntityId(30),
            defender: Defender::Minion(EntityId(41)),
        };
        assert_eq!(
            resolve(&trade, &state).unwrap(),
            Command::Attack {
                attacker_index: 0,
                board_size: 1,
                target: AttackTarget::Minion {
                    index: 1,
                    board_size: 2
                },
            }
        );

        let face = Intent::Attack {
            attacker: EntityId(30),
            defender: Defender::Hero,
        };
        assert!(matches!(
            resolve(&face, &state).unwrap(),
            Command::Attack {
                target: AttackTarget::Hero,
                ..
            }
        ));
    }

    #[test]
    fn test_stale_intent() {
        let (mut state, catalog) = state();
        state
            .play(Side::Friendly, &CardId::from("CS2_172"), EntityId(30), &catalog)
            .unwrap();
        state
            .play(Side::Opposing, &CardId::from("CS2_168"), EntityId(40), &catalog)
            .unwrap();
        state.send_to_graveyard(EntityId(40)).unwrap();

        let trade = Intent::Attack {
            attacker: EntityId(30),
            defender: Defender::Minion(EntityId(40)),
        };
        assert!(matches!(
            resolve(&trade, &state),
            Err(TrackerError::StaleIntent { entity }) if entity == EntityId(40)
        ));
        assert!(matches!(
            resolve(&Intent::PlayCard { card: EntityId(30) }, &state),
            Err(TrackerError::StaleIntent { .. })
        ));
    }

    #[test]
    fn test_recording_effector() {
        let mut effector = RecordingEffector::new();
        effector.perform(Command::HeroPower).unwrap();
        effector.perform(Command::EndTurn).unwrap();
        assert_eq!(effector.commands, vec![Command::HeroPower, Command::EndTurn]);
    }
}
