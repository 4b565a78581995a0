//! Sides of the table and per-player resources.
//!
//! ## Side
//!
//! The log speaks of `FRIENDLY` and `OPPOSING`; the tracker does the same.
//! The numeric player slot (`player=1`/`player=2`) is only known once the
//! client reveals which hero is ours, see [`Side::from_player_number`].
//!
//! ## SideMap
//!
//! Fixed two-entry storage indexed by `Side`.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

use super::entity::EntityId;

/// One of the two sides of a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// The side the tracker plays for.
    Friendly,
    /// The other side.
    Opposing,
}

impl Side {
    /// Both sides, friendly first.
    pub const ALL: [Side; 2] = [Side::Friendly, Side::Opposing];

    /// The other side.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Side::Friendly => Side::Opposing,
            Side::Opposing => Side::Friendly,
        }
    }

    /// Map a client player slot to a side, given our own slot.
    ///
    /// ```
    /// use hearth_tracker::core::Side;
    ///
    /// assert_eq!(Side::from_player_number(2, 2), Side::Friendly);
    /// assert_eq!(Side::from_player_number(1, 2), Side::Opposing);
    /// ```
    #[must_use]
    pub const fn from_player_number(player: u8, self_player: u8) -> Self {
        if player == self_player {
            Side::Friendly
        } else {
            Side::Opposing
        }
    }

    const fn index(self) -> usize {
        match self {
            Side::Friendly => 0,
            Side::Opposing => 1,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Friendly => f.write_str("FRIENDLY"),
            Side::Opposing => f.write_str("OPPOSING"),
        }
    }
}

/// Per-side data storage with O(1) access.
///
/// ```
/// use hearth_tracker::core::{Side, SideMap};
///
/// let mut life: SideMap<i32> = SideMap::with_value(30);
/// life[Side::Opposing] -= 6;
/// assert_eq!(life[Side::Friendly], 30);
/// assert_eq!(life[Side::Opposing], 24);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SideMap<T> {
    data: [T; 2],
}

impl<T> SideMap<T> {
    /// Create a new SideMap with values from a factory function.
    pub fn new(factory: impl Fn(Side) -> T) -> Self {
        Self {
            data: [factory(Side::Friendly), factory(Side::Opposing)],
        }
    }

    /// Create a new SideMap with both entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self::new(|_| value.clone())
    }

    /// Get a reference to a side's data.
    #[must_use]
    pub fn get(&self, side: Side) -> &T {
        &self.data[side.index()]
    }

    /// Get a mutable reference to a side's data.
    pub fn get_mut(&mut self, side: Side) -> &mut T {
        &mut self.data[side.index()]
    }

    /// Iterate over (Side, &T) pairs, friendly first.
    pub fn iter(&self) -> impl Iterator<Item = (Side, &T)> {
        Side::ALL.into_iter().zip(self.data.iter())
    }

    /// Iterate over (Side, &mut T) pairs, friendly first.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Side, &mut T)> {
        Side::ALL.into_iter().zip(self.data.iter_mut())
    }
}

impl<T> Index<Side> for SideMap<T> {
    type Output = T;

    fn index(&self, side: Side) -> &Self::Output {
        self.get(side)
    }
}

impl<T> IndexMut<Side> for SideMap<T> {
    fn index_mut(&mut self, side: Side) -> &mut Self::Output {
        self.get_mut(side)
    }
}

/// Resources and singleton slots of one player.
///
/// Hand and board membership is not stored here: it lives in the match's
/// `ZoneManager`, which holds only entity ids.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// The player's hero entity, once seen.
    pub hero: Option<EntityId>,

    /// Equipped weapon, if any.
    pub weapon: Option<EntityId>,

    /// Mana crystals available at the start of the turn.
    pub mana_pool: i32,

    /// Mana already committed this turn.
    pub mana_spent_this_turn: i32,

    /// One-turn crystals granted by the bonus card.
    pub temporary_mana: i32,

    /// Set by a draw during this player's own turn.
    pub drew_card_this_turn: bool,
}

impl Player {
    /// Mana still spendable this turn; never negative.
    #[must_use]
    pub fn mana_available(&self) -> i32 {
        (self.mana_pool + self.temporary_mana - self.mana_spent_this_turn).max(0)
    }

    /// Commit `amount` mana, clamped so availability never drops below zero.
    pub fn spend_mana(&mut self, amount: i32) {
        let spendable = self.mana_available();
        self.mana_spent_this_turn += amount.clamp(0, spendable);
    }

    /// Start-of-turn refresh: one more crystal (capped), nothing spent.
    pub fn refresh(&mut self, max_mana: i32) {
        self.mana_pool = (self.mana_pool + 1).min(max_mana);
        self.mana_spent_this_turn = 0;
        self.temporary_mana = 0;
        self.drew_card_this_turn = false;
    }
}
