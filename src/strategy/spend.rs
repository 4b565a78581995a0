//! Mana spending: which minions to play from hand.
//!
//! Plays favour more cards over fewer, then more mana over less. The bonus
//! card grants one extra crystal for the turn and is only spent when it
//! strictly reduces the mana left unused.

use smallvec::SmallVec;
use tracing::{debug, info};

use super::combinations::Combinations;
use crate::cards::Entity;
use crate::core::action::Intent;
use crate::core::config::TrackerConfig;
use crate::core::entity::EntityId;

/// The spend-relevant view of a card in hand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HandCard {
    pub id: EntityId,
    pub cost: i32,
    pub is_minion: bool,
    pub is_bonus: bool,
}

impl HandCard {
    #[must_use]
    pub fn from_entity(entity: &Entity, config: &TrackerConfig) -> Self {
        Self {
            id: entity.id,
            cost: entity.cost,
            is_minion: entity.is_minion(),
            is_bonus: entity.name == config.bonus_card_name,
        }
    }
}

/// A chosen set of cards.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Play {
    /// Summed cost of `cards`.
    pub mana: i32,
    /// Cards to play, in hand order.
    pub cards: SmallVec<[EntityId; 10]>,
    /// Bonus card to play before the others.
    pub bonus: Option<EntityId>,
}

impl Play {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty() && self.bonus.is_none()
    }

    /// Mana the play makes available, bonus included.
    #[must_use]
    pub fn budget(&self, available: i32) -> i32 {
        available + i32::from(self.bonus.is_some())
    }

    /// Intents in execution order: bonus first.
    #[must_use]
    pub fn intents(&self) -> Vec<Intent> {
        self.bonus
            .map(|card| Intent::UseBonus { card })
            .into_iter()
            .chain(self.cards.iter().map(|&card| Intent::PlayCard { card }))
            .collect()
    }
}

/// Largest affordable set of minions, spending as much as possible.
///
/// Sizes are tried from the largest down; the first size with any set that
/// fits the budget wins, and within it the costliest set (first in
/// enumeration order on ties). Zero-cost sets count.
#[must_use]
pub fn best_play(hand: &[HandCard], available_mana: i32) -> Play {
    best_play_limited(hand, available_mana, usize::MAX)
}

/// `best_play` with at most `max_cards` cards.
#[must_use]
pub fn best_play_limited(hand: &[HandCard], available_mana: i32, max_cards: usize) -> Play {
    let candidates: SmallVec<[HandCard; 10]> = hand
        .iter()
        .copied()
        .filter(|c| c.is_minion && c.cost <= available_mana)
        .collect();

    let largest = candidates.len().min(max_cards);
    for size in (1..=largest).rev() {
        let mut best: Option<(i32, SmallVec<[usize; 10]>)> = None;
        for combination in Combinations::new(candidates.len(), size) {
            let spent: i32 = combination.iter().map(|&i| candidates[i].cost).sum();
            if spent > available_mana {
                continue;
            }
            if best.as_ref().map_or(true, |(top, _)| spent > *top) {
                best = Some((spent, combination));
            }
        }
        if let Some((mana, indices)) = best {
            debug!(size, mana, "found play");
            return Play {
                mana,
                cards: indices.iter().map(|&i| candidates[i].id).collect(),
                bonus: None,
            };
        }
    }
    Play::default()
}

/// `best_play`, considering one bonus crystal when the bonus card is held.
///
/// The bonus is only evaluated when the plain play leaves mana unused, and
/// only chosen when it leaves strictly less unused.
#[must_use]
pub fn best_play_with_bonus(hand: &[HandCard], available_mana: i32) -> Play {
    best_play_with_bonus_limited(hand, available_mana, usize::MAX)
}

fn best_play_with_bonus_limited(hand: &[HandCard], available_mana: i32, max_cards: usize) -> Play {
    let plain = best_play_limited(hand, available_mana, max_cards);
    let Some(bonus) = hand.iter().find(|c| c.is_bonus) else {
        return plain;
    };
    if plain.mana >= available_mana {
        return plain;
    }

    let mut boosted = best_play_limited(hand, available_mana + 1, max_cards);
    let plain_waste = available_mana - plain.mana;
    let boosted_waste = available_mana + 1 - boosted.mana;
    if boosted_waste < plain_waste {
        info!(plain_waste, boosted_waste, "bonus play chosen");
        boosted.bonus = Some(bonus.id);
        boosted
    } else {
        debug!(plain_waste, boosted_waste, "bonus not worth it");
        plain
    }
}

/// Decide what to play given the current board size.
///
/// A full board plays nothing. One free slot plays the most expensive
/// affordable minion (first in hand on ties). Otherwise the bonus-aware
/// search runs, never choosing more minions than there are free slots.
#[must_use]
pub fn choose_plays(
    hand: &[HandCard],
    board_size: usize,
    available_mana: i32,
    config: &TrackerConfig,
) -> Play {
    let free = config.max_board_size.saturating_sub(board_size);
    match free {
        0 => {
            info!(board_size, "board full");
            Play::default()
        }
        1 => {
            let mut choice: Option<&HandCard> = None;
            for card in hand.iter().filter(|c| c.is_minion && c.cost <= available_mana) {
                if choice.map_or(true, |best| card.cost > best.cost) {
                    choice = Some(card);
                }
            }
            choice.map_or_else(Play::default, |card| Play {
                mana: card.cost,
                cards: SmallVec::from_slice(&[card.id]),
                bonus: None,
            })
        }
        _ => best_play_with_bonus_limited(hand, available_mana, free),
    }
}
