//! Entity identification and coarse location.
//!
//! Every game object (hero, minion, spell, hero power, weapon, enchantment)
//! carries an `EntityId` assigned by the game client. Ids are unique for the
//! lifetime of a match and never reused, so they are the only key the
//! tracker uses to correlate log lines.
//!
//! ## Usage
//!
//! ```
//! use hearth_tracker::core::{EntityId, Zone};
//!
//! let id: EntityId = "47".parse().unwrap();
//! assert_eq!(id, EntityId(47));
//!
//! let zone: Zone = "GRAVEYARD".parse().unwrap();
//! assert!(zone.is_terminal());
//! ```

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Unique identifier for any game entity, as printed by the client (`id=47`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl EntityId {
    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl From<u32> for EntityId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl FromStr for EntityId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

/// Coarse location of an entity as reported by the client.
///
/// Client zones the tracker does not model (`SETASIDE`, `SECRET`,
/// `REMOVEDFROMGAME`, ...) parse as `Zone::None`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    #[default]
    None,
    Hand,
    Play,
    Graveyard,
    Deck,
}

impl Zone {
    /// Graveyard is the only terminal zone: nothing moves an entity out of it.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Zone::Graveyard)
    }

    /// Hand and play are the "live" zones.
    #[must_use]
    pub const fn is_live(self) -> bool {
        matches!(self, Zone::Hand | Zone::Play)
    }
}

impl FromStr for Zone {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "HAND" => Zone::Hand,
            "PLAY" => Zone::Play,
            "GRAVEYARD" => Zone::Graveyard,
            "DECK" => Zone::Deck,
            _ => Zone::None,
        })
    }
}

impl std::fmt::Display for Zone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Zone::None => "NONE",
            Zone::Hand => "HAND",
            Zone::Play => "PLAY",
            Zone::Graveyard => "GRAVEYARD",
            Zone::Deck => "DECK",
        };
        f.write_str(name)
    }
}
