//! Attack-phase policy.
//!
//! ## Sub-phases
//!
//! 1. Taunts: each taunter, lowest attack first, is killed with the fewest
//!    attackers that can do it. Taunters nobody can kill outright are then
//!    swarmed one attacker at a time, weakest taunter first.
//! 2. Trades: remaining enemies, highest attack first, are killed where a
//!    killing subset exists.
//! 3. Face: every attacker still unused hits the enemy hero.
//!
//! Damage is simulated on copies so later decisions see earlier kills. The
//! resulting intents are meant to be executed one at a time; the session
//! re-reads the log between them.

use smallvec::SmallVec;
use tracing::debug;

use super::trade::{minimal_killers, Combatant};
use crate::core::action::{Defender, Intent};
use crate::core::entity::EntityId;

/// Plan this turn's attacks.
///
/// Only attackers that are active with attack above zero are used. A taunter
/// left alive blocks both trades and face attacks, which can only happen once
/// every attacker has been spent on taunters.
#[must_use]
pub fn plan_attacks(self_board: &[Combatant], enemy_board: &[Combatant]) -> Vec<Intent> {
    let mut pool: Vec<Combatant> = self_board.iter().copied().filter(Combatant::can_attack).collect();
    let mut enemies: Vec<Combatant> = enemy_board.to_vec();
    let mut intents = Vec::new();

    debug!(attackers = pool.len(), enemies = enemies.len(), "planning attacks");

    let mut taunters: Vec<usize> = (0..enemies.len())
        .filter(|&i| enemies[i].taunt && enemies[i].remaining_health > 0)
        .collect();
    taunters.sort_by_key(|&i| enemies[i].attack);

    // Clean kills first.
    taunters.retain(|&t| match killer_ids(&pool, &enemies[t]) {
        Some(ids) => {
            for id in ids {
                commit(&mut pool, &mut enemies[t], id, &mut intents);
            }
            false
        }
        None => true,
    });

    // Whatever is left gets swarmed.
    taunters.sort_by_key(|&i| enemies[i].remaining_health);
    for &t in &taunters {
        while enemies[t].remaining_health > 0 {
            let Some(attacker) = pool.first().map(|c| c.id) else {
                break;
            };
            commit(&mut pool, &mut enemies[t], attacker, &mut intents);
        }
    }

    if taunters.iter().any(|&t| enemies[t].remaining_health > 0) {
        debug!("taunt still standing; no further attacks");
        return intents;
    }

    let mut order: Vec<usize> = (0..enemies.len())
        .filter(|&i| enemies[i].remaining_health > 0)
        .collect();
    order.sort_by_key(|&i| std::cmp::Reverse(enemies[i].attack));

    for e in order {
        let Some(ids) = killer_ids(&pool, &enemies[e]) else {
            continue;
        };
        for id in ids {
            if enemies[e].remaining_health <= 0 {
                break;
            }
            commit(&mut pool, &mut enemies[e], id, &mut intents);
        }
    }

    for attacker in pool {
        intents.push(Intent::Attack {
            attacker: attacker.id,
            defender: Defender::Hero,
        });
    }
    intents
}

fn killer_ids(pool: &[Combatant], target: &Combatant) -> Option<SmallVec<[EntityId; 7]>> {
    minimal_killers(pool, target).map(|killers| killers.iter().map(|c| c.id).collect())
}

/// Remove `attacker` from the pool and swing it at `target`.
fn commit(pool: &mut Vec<Combatant>, target: &mut Combatant, attacker: EntityId, intents: &mut Vec<Intent>) {
    let Some(index) = pool.iter().position(|c| c.id == attacker) else {
        return;
    };
    let attacker = pool.remove(index);
    target.remaining_health -= attacker.attack;
    intents.push(Intent::Attack {
        attacker: attacker.id,
        defender: Defender::Minion(target.id),
    });
}
