//! Lethal-trade search.

use smallvec::SmallVec;

use super::combinations::Combinations;
use crate::cards::{Entity, Mechanic};
use crate::core::entity::EntityId;

/// The combat-relevant view of a minion.
///
/// Planning works on these copies so simulated damage never touches the
/// match state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Combatant {
    pub id: EntityId,
    pub attack: i32,
    pub remaining_health: i32,
    pub active: bool,
    pub taunt: bool,
}

impl Combatant {
    #[must_use]
    pub fn from_entity(entity: &Entity) -> Self {
        Self {
            id: entity.id,
            attack: entity.attack(),
            remaining_health: entity.remaining_health(),
            active: entity.active,
            taunt: entity.has_mechanic(&Mechanic::Taunt),
        }
    }

    /// Active with something to hit for.
    #[must_use]
    pub fn can_attack(&self) -> bool {
        self.active && self.attack > 0
    }
}

/// Attacker subsets never exceed a full board.
pub type Killers<'a> = SmallVec<[&'a Combatant; 7]>;

/// Fewest attackers whose summed attack reaches the target's remaining
/// health.
///
/// Sizes are tried from 1 upward and, within a size, combinations in input
/// order; the first sufficient one wins. Attacker survival is not
/// considered. A target already at zero or below needs nobody and yields an
/// empty set. `None` means even the whole pool falls short.
#[must_use]
pub fn minimal_killers<'a>(attackers: &'a [Combatant], target: &Combatant) -> Option<Killers<'a>> {
    if target.remaining_health <= 0 {
        return Some(SmallVec::new());
    }

    for size in 1..=attackers.len() {
        for combination in Combinations::new(attackers.len(), size) {
            let total: i32 = combination.iter().map(|&i| attackers[i].attack).sum();
            if total >= target.remaining_health {
                return Some(combination.iter().map(|&i| &attackers[i]).collect());
            }
        }
    }
    None
}
