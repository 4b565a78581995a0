//! Tracker configuration.
//!
//! The client's log identifies the local account by name in a handful of
//! `TAG_CHANGE Entity=<name>` lines, so the name has to be supplied up
//! front. Everything else has a sensible default for the standard ruleset.

use serde::{Deserialize, Serialize};

/// Tracker configuration parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Account name as printed in `TAG_CHANGE Entity=<name>` lines.
    pub player_name: String,

    /// Maximum mana crystals a player can hold.
    pub max_mana: i32,

    /// Maximum minions on one side of the board.
    pub max_board_size: usize,

    /// Name of the one-shot card that grants a temporary crystal.
    pub bonus_card_name: String,

    /// Mana cost of the hero power.
    pub hero_power_cost: i32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            player_name: "Player".to_string(),
            max_mana: 10,
            max_board_size: 7,
            bonus_card_name: "The Coin".to_string(),
            hero_power_cost: 2,
        }
    }
}

impl TrackerConfig {
    /// Create a config for the given account name.
    pub fn new(player_name: impl Into<String>) -> Self {
        Self {
            player_name: player_name.into(),
            ..Self::default()
        }
    }

    /// Set the mana cap.
    #[must_use]
    pub fn with_max_mana(mut self, max_mana: i32) -> Self {
        self.max_mana = max_mana;
        self
    }

    /// Set the board size limit.
    #[must_use]
    pub fn with_max_board_size(mut self, size: usize) -> Self {
        self.max_board_size = size;
        self
    }

    /// Set the bonus card's name.
    #[must_use]
    pub fn with_bonus_card(mut self, name: impl Into<String>) -> Self {
        self.bonus_card_name = name.into();
        self
    }

    /// Set the hero power cost.
    #[must_use]
    pub fn with_hero_power_cost(mut self, cost: i32) -> Self {
        self.hero_power_cost = cost;
        self
    }
}
