//! Entities - runtime game objects.
//!
//! An `Entity` is a specific copy of a card in a specific match. It starts
//! from its catalog definition and is then mutated by log reconciliation:
//! damage, zone, position, controller, activation.
//!
//! Variant-specific stats live in `EntityKind`, a closed sum type. Fields a
//! variant does not have simply do not exist on it, so a stray `ARMOR` tag
//! on a minion is detected rather than silently stored.

use serde::{Deserialize, Serialize};

use super::definition::{CardDefinition, CardId, CardType};
use super::mechanics::{Mechanic, Mechanics};
use crate::core::entity::{EntityId, Zone};
use crate::core::player::Side;

/// Variant-specific data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Minion { attack: i32, health: i32 },
    Hero { attack: i32, health: i32, armor: i32 },
    HeroPower,
    Spell,
    Weapon { attack: i32, durability: i32 },
    Enchantment,
}

impl EntityKind {
    /// Build the variant from catalog data.
    #[must_use]
    pub fn from_definition(definition: &CardDefinition) -> Self {
        match definition.card_type {
            CardType::Minion => EntityKind::Minion {
                attack: definition.attack,
                health: definition.health,
            },
            CardType::Hero => EntityKind::Hero {
                attack: definition.attack,
                health: definition.health,
                armor: 0,
            },
            CardType::HeroPower => EntityKind::HeroPower,
            CardType::Spell => EntityKind::Spell,
            CardType::Weapon => EntityKind::Weapon {
                attack: definition.attack,
                durability: definition.durability,
            },
            CardType::Enchantment => EntityKind::Enchantment,
        }
    }

    /// The catalog type this variant corresponds to.
    #[must_use]
    pub fn card_type(&self) -> CardType {
        match self {
            EntityKind::Minion { .. } => CardType::Minion,
            EntityKind::Hero { .. } => CardType::Hero,
            EntityKind::HeroPower => CardType::HeroPower,
            EntityKind::Spell => CardType::Spell,
            EntityKind::Weapon { .. } => CardType::Weapon,
            EntityKind::Enchantment => CardType::Enchantment,
        }
    }
}

/// Numeric tags the tracker applies from `TAG_CHANGE` lines.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NumericTag {
    Attack,
    Health,
    Damage,
    Armor,
    Cost,
}

impl NumericTag {
    /// Parse the client tag name (`ATK`, `HEALTH`, ...).
    #[must_use]
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "ATK" => Some(NumericTag::Attack),
            "HEALTH" => Some(NumericTag::Health),
            "DAMAGE" => Some(NumericTag::Damage),
            "ARMOR" => Some(NumericTag::Armor),
            "COST" => Some(NumericTag::Cost),
            _ => None,
        }
    }

    /// The client tag name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            NumericTag::Attack => "ATK",
            NumericTag::Health => "HEALTH",
            NumericTag::Damage => "DAMAGE",
            NumericTag::Armor => "ARMOR",
            NumericTag::Cost => "COST",
        }
    }
}

impl std::fmt::Display for NumericTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tracked game object.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Unique id assigned by the client.
    pub id: EntityId,

    /// Catalog card this entity is a copy of.
    pub card_id: CardId,

    /// Card name.
    pub name: String,

    /// Current mana cost.
    pub cost: i32,

    /// Damage taken (heroes, minions) or durability lost (weapons).
    pub damage: i32,

    /// Capability tags.
    pub mechanics: Mechanics,

    /// 1-based slot within its zone, if the client reported one.
    pub position: Option<u8>,

    /// Coarse zone.
    pub zone: Zone,

    /// Current controller, once known.
    pub controller: Option<Side>,

    /// May act right now (no summoning sickness, has not attacked).
    pub active: bool,

    /// Attacked during the current turn.
    pub has_attacked: bool,

    /// Last target chosen for this entity (spells, hero powers).
    pub target: Option<EntityId>,

    /// Variant-specific stats.
    pub kind: EntityKind,
}

impl Entity {
    /// Materialize an entity from its catalog definition.
    #[must_use]
    pub fn from_definition(
        id: EntityId,
        definition: &CardDefinition,
        zone: Zone,
        controller: Option<Side>,
    ) -> Self {
        Self {
            id,
            card_id: definition.id.clone(),
            name: definition.name.clone(),
            cost: definition.cost,
            damage: 0,
            mechanics: definition.mechanics.clone(),
            position: None,
            zone,
            controller,
            active: false,
            has_attacked: false,
            target: None,
            kind: EntityKind::from_definition(definition),
        }
    }

    /// Current attack value; 0 for variants without one.
    #[must_use]
    pub fn attack(&self) -> i32 {
        match self.kind {
            EntityKind::Minion { attack, .. }
            | EntityKind::Hero { attack, .. }
            | EntityKind::Weapon { attack, .. } => attack,
            _ => 0,
        }
    }

    /// Maximum health; 0 for variants without one.
    #[must_use]
    pub fn health(&self) -> i32 {
        match self.kind {
            EntityKind::Minion { health, .. } | EntityKind::Hero { health, .. } => health,
            _ => 0,
        }
    }

    /// Health minus damage taken.
    #[must_use]
    pub fn remaining_health(&self) -> i32 {
        self.health() - self.damage
    }

    /// Check for a mechanic tag.
    #[must_use]
    pub fn has_mechanic(&self, mechanic: &Mechanic) -> bool {
        self.mechanics.has(mechanic)
    }

    #[must_use]
    pub fn is_minion(&self) -> bool {
        matches!(self.kind, EntityKind::Minion { .. })
    }

    /// Catalog type of this entity.
    #[must_use]
    pub fn card_type(&self) -> CardType {
        self.kind.card_type()
    }

    /// Apply a numeric tag. Returns `false` if the variant has no such field.
    pub fn apply_tag(&mut self, tag: NumericTag, value: i32) -> bool {
        match (tag, &mut self.kind) {
            (NumericTag::Cost, _) => self.cost = value,
            (NumericTag::Damage, EntityKind::Minion { .. })
            | (NumericTag::Damage, EntityKind::Hero { .. })
            | (NumericTag::Damage, EntityKind::Weapon { .. }) => self.damage = value,
            (NumericTag::Attack, EntityKind::Minion { attack, .. })
            | (NumericTag::Attack, EntityKind::Hero { attack, .. })
            | (NumericTag::Attack, EntityKind::Weapon { attack, .. }) => *attack = value,
            (NumericTag::Health, EntityKind::Minion { health, .. })
            | (NumericTag::Health, EntityKind::Hero { health, .. }) => *health = value,
            (NumericTag::Armor, EntityKind::Hero { armor, .. }) => *armor = value,
            _ => return false,
        }
        true
    }
}
