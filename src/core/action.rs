//! Intents: what the decision layer wants to do next.
//!
//! An intent names entities by id, never by hand or board index. Indices
//! shift every time a card is played or a minion dies, so an intent is
//! resolved into a positional effector command only at the moment it is
//! executed, against the state as it is then.
//!
//! For example:
//! - "End turn" = no entity pointers
//! - "Play card X" = 1 pointer (the card)
//! - "Attack Y with X" = 2 pointers (attacker, defender)

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::entity::EntityId;
use super::player::Side;

/// The thing being attacked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Defender {
    /// An enemy minion.
    Minion(EntityId),
    /// The enemy hero.
    Hero,
}

/// A planned action.
///
/// ## Example
///
/// ```
/// use hearth_tracker::core::{Defender, EntityId, Intent};
///
/// let swing = Intent::Attack { attacker: EntityId(12), defender: Defender::Hero };
/// assert_eq!(swing.pointers().as_slice(), &[EntityId(12)]);
///
/// let trade = Intent::Attack {
///     attacker: EntityId(12),
///     defender: Defender::Minion(EntityId(40)),
/// };
/// assert_eq!(trade.pointers().as_slice(), &[EntityId(12), EntityId(40)]);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intent {
    /// Play a card from our hand.
    PlayCard { card: EntityId },
    /// Play the bonus-mana card from our hand.
    UseBonus { card: EntityId },
    /// Use the hero power.
    HeroPower,
    /// Attack with a minion on our board.
    Attack {
        attacker: EntityId,
        defender: Defender,
    },
    /// Pass the turn.
    EndTurn,
}

impl Intent {
    /// Entities this intent refers to, in argument order.
    #[must_use]
    pub fn pointers(&self) -> SmallVec<[EntityId; 2]> {
        let mut pointers = SmallVec::new();
        match *self {
            Intent::PlayCard { card } | Intent::UseBonus { card } => pointers.push(card),
            Intent::Attack { attacker, defender } => {
                pointers.push(attacker);
                if let Defender::Minion(target) = defender {
                    pointers.push(target);
                }
            }
            Intent::HeroPower | Intent::EndTurn => {}
        }
        pointers
    }

    /// Check if this intent takes no entity arguments.
    #[must_use]
    pub fn is_no_arg(&self) -> bool {
        self.pointers().is_empty()
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Intent::PlayCard { card } => write!(f, "play {card}"),
            Intent::UseBonus { card } => write!(f, "use bonus {card}"),
            Intent::HeroPower => f.write_str("hero power"),
            Intent::Attack {
                attacker,
                defender: Defender::Minion(target),
            } => write!(f, "attack {target} with {attacker}"),
            Intent::Attack {
                attacker,
                defender: Defender::Hero,
            } => write!(f, "attack hero with {attacker}"),
            Intent::EndTurn => f.write_str("end turn"),
        }
    }
}

/// An executed intent with metadata for history tracking.
///
/// Used for replay output and post-mortem review.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentRecord {
    /// The side that acted (always ours for executed intents).
    pub side: Side,

    /// The intent carried out.
    pub intent: Intent,

    /// Turn number when it was issued.
    pub turn: u32,

    /// Sequence number within the turn (for ordering).
    pub sequence: u32,
}

impl IntentRecord {
    /// Create a new intent record.
    #[must_use]
    pub fn new(side: Side, intent: Intent, turn: u32, sequence: u32) -> Self {
        Self {
            side,
            intent,
            turn,
            sequence,
        }
    }
}
