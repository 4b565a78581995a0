//! Typed events extracted from log lines.

use crate::cards::CardId;
use crate::core::entity::{EntityId, Zone};
use crate::core::player::Side;
use crate::core::state::Outcome;

/// The bracketed entity block the client prints:
/// `[name=Wolfrider id=47 zone=PLAY zonePos=1 cardId=CS2_124 player=2]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntityDescriptor {
    pub name: String,
    pub id: EntityId,
    /// Zone at the time the line was printed (often the source zone).
    pub zone: Zone,
    pub position: u8,
    /// Empty when the card is hidden from us.
    pub card_id: CardId,
    /// Client player slot of the controller.
    pub player: u8,
}

/// One recognized log event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LogEvent {
    /// `CREATE_GAME`.
    GameStart,
    /// Our hero was placed, revealing our player slot.
    PlayerNumber(u8),
    /// A terminal PLAYSTATE for us.
    GameOver(Outcome),
    /// `GameEntity tag=STATE value=COMPLETE`.
    GameComplete,
    /// `CURRENT_PLAYER` for us: the turn passes to `side`.
    TurnStart(Side),
    /// A card arrived in our hand.
    Draw(EntityDescriptor),
    /// An entity entered play on `side`.
    Play {
        side: Side,
        entity: EntityDescriptor,
    },
    /// An entity went to a graveyard.
    Graveyard(EntityDescriptor),
    /// Generic `tag=ZONE` transition.
    ZoneChange {
        entity: EntityDescriptor,
        zone: Zone,
    },
    /// `pos from A -> B`.
    Position { entity: EntityDescriptor, to: u8 },
    /// `ACTION_START ... SubType=ATTACK`.
    Attack {
        attacker: EntityDescriptor,
        defender: EntityDescriptor,
    },
    /// `tag=CARD_TARGET`.
    Target { source: EntityId, target: EntityId },
    /// `tag=CONTROLLER value=N`.
    Controller { entity: EntityDescriptor, player: u8 },
    /// A numeric tag the tracker models (`ATK`, `DAMAGE`, ...).
    Tag {
        entity: EntityDescriptor,
        tag: crate::cards::NumericTag,
        value: i32,
    },
    /// The opponent cast a card from hand that went nowhere visible.
    OpposingCast(EntityDescriptor),
}

impl LogEvent {
    /// Events that end the match.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, LogEvent::GameOver(_) | LogEvent::GameComplete)
    }
}
