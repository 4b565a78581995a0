//! Card definitions - static card data.
//!
//! `CardDefinition` holds the immutable attributes shared by every copy of a
//! card: name, cost, base stats, mechanics. Instance-specific data (damage
//! taken, zone, position) lives on the runtime `Entity`.

use serde::{Deserialize, Serialize};

use super::mechanics::Mechanics;

/// Catalog identifier of a card (`cardId=CS2_065` in the log).
///
/// Identifies the card, not a specific copy in a match.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub String);

impl CardId {
    /// Create a new card ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the raw ID.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Hidden cards are printed with an empty `cardId=`.
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for CardId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Kind of card, as spelled in the database `type` field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardType {
    Minion,
    Spell,
    Weapon,
    Enchantment,
    Hero,
    #[serde(rename = "Hero Power")]
    HeroPower,
}

impl CardType {
    /// Parse the database spelling.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Minion" => Some(CardType::Minion),
            "Spell" => Some(CardType::Spell),
            "Weapon" => Some(CardType::Weapon),
            "Enchantment" => Some(CardType::Enchantment),
            "Hero" => Some(CardType::Hero),
            "Hero Power" => Some(CardType::HeroPower),
            _ => None,
        }
    }
}

/// Static card definition.
///
/// ## Example
///
/// ```
/// use hearth_tracker::cards::{CardDefinition, CardType, Mechanic};
///
/// let goldshire = CardDefinition::new("CS1_042", "Goldshire Footman", CardType::Minion)
///     .with_cost(1)
///     .with_stats(1, 2)
///     .with_mechanic("Taunt");
///
/// assert_eq!(goldshire.health, 2);
/// assert!(goldshire.mechanics.has(&Mechanic::Taunt));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDefinition {
    /// Catalog identifier.
    pub id: super::CardId,

    /// Card name.
    pub name: String,

    /// Card type.
    pub card_type: CardType,

    /// Mana cost.
    pub cost: i32,

    /// Base attack (minions, weapons, some heroes).
    pub attack: i32,

    /// Base health (minions, heroes).
    pub health: i32,

    /// Base durability (weapons).
    pub durability: i32,

    /// Capability tags.
    pub mechanics: Mechanics,
}

impl CardDefinition {
    /// Create a definition with zeroed stats.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, card_type: CardType) -> Self {
        Self {
            id: CardId::new(id),
            name: name.into(),
            card_type,
            cost: 0,
            attack: 0,
            health: 0,
            durability: 0,
            mechanics: Mechanics::new(),
        }
    }

    /// Set the cost (builder pattern).
    #[must_use]
    pub fn with_cost(mut self, cost: i32) -> Self {
        self.cost = cost;
        self
    }

    /// Set attack and health (builder pattern).
    #[must_use]
    pub fn with_stats(mut self, attack: i32, health: i32) -> Self {
        self.attack = attack;
        self.health = health;
        self
    }

    /// Set durability (builder pattern).
    #[must_use]
    pub fn with_durability(mut self, durability: i32) -> Self {
        self.durability = durability;
        self
    }

    /// Add a mechanic (builder pattern).
    #[must_use]
    pub fn with_mechanic(mut self, mechanic: impl Into<super::Mechanic>) -> Self {
        self.mechanics.insert(mechanic.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Mechanic;

    #[test]
    fn test_card_id() {
        let id = CardId::new("EX1_001");
        assert_eq!(id.as_str(), "EX1_001");
        assert_eq!(format!("{}", id), "Card(EX1_001)");
    }

    #[test]
    fn test_card_type_parse() {
        assert_eq!(CardType::parse("Hero Power"), Some(CardType::HeroPower));
        assert_eq!(CardType::parse("Minion"), Some(CardType::Minion));
        assert_eq!(CardType::parse("Playable Hero"), None);
    }

    #[test]
    fn test_builder() {
        let wolfrider = CardDefinition::new("CS2_124", "Wolfrider", CardType::Minion)
            .with_cost(3)
            .with_stats(3, 1)
            .with_mechanic("Charge");

        assert_eq!(wolfrider.cost, 3);
        assert_eq!(wolfrider.attack, 3);
        assert!(wolfrider.mechanics.has(&Mechanic::Charge));
    }

    #[test]
    fn test_weapon_durability() {
        let axe = CardDefinition::new("CS2_106", "Fiery War Axe", CardType::Weapon)
            .with_cost(2)
            .with_stats(3, 0)
            .with_durability(2);
        assert_eq!(axe.durability, 2);
    }
}
