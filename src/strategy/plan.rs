//! Whole-turn planning against a match snapshot.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::attack::plan_attacks;
use super::spend::{choose_plays, HandCard, Play};
use super::trade::Combatant;
use crate::core::action::Intent;
use crate::core::error::TrackerError;
use crate::core::player::Side;
use crate::core::state::MatchState;

/// What we intend to do this turn, in execution order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnPlan {
    /// Bonus card (if any) then minions.
    pub plays: Vec<Intent>,
    /// Use the hero power after the plays.
    pub hero_power: bool,
    /// Attacks, meant to run one at a time.
    pub attacks: Vec<Intent>,
}

impl TurnPlan {
    /// Every intent in order, ending the turn.
    #[must_use]
    pub fn intents(&self) -> Vec<Intent> {
        let mut intents = self.plays.clone();
        if self.hero_power {
            intents.push(Intent::HeroPower);
        }
        intents.extend(self.attacks.iter().copied());
        intents.push(Intent::EndTurn);
        intents
    }
}

/// Which cards to play from our hand right now.
pub fn cards_to_play(state: &MatchState) -> Result<Play, TrackerError> {
    state.ensure_synced()?;
    let config = state.config();
    let hand: Vec<HandCard> = state
        .hand_entities(Side::Friendly)
        .map(|e| HandCard::from_entity(e, config))
        .collect();
    Ok(choose_plays(
        &hand,
        state.board(Side::Friendly).len(),
        state.mana_available(Side::Friendly),
        config,
    ))
}

/// Plan our turn: plays, hero power with what is left, then attacks.
///
/// Attacks are planned against the board as it stands; minions played this
/// turn are not yet able to attack unless they charge, and the log will say
/// so once they land.
pub fn plan_turn(state: &MatchState) -> Result<TurnPlan, TrackerError> {
    let play = cards_to_play(state)?;

    let available = state.mana_available(Side::Friendly);
    let leftover = play.budget(available) - play.mana;
    let hero_power = leftover >= state.config().hero_power_cost;

    let ours: Vec<Combatant> = state
        .board_entities(Side::Friendly)
        .map(Combatant::from_entity)
        .collect();
    let theirs: Vec<Combatant> = state
        .board_entities(Side::Opposing)
        .map(Combatant::from_entity)
        .collect();
    let attacks = plan_attacks(&ours, &theirs);

    info!(
        plays = play.cards.len(),
        bonus = play.bonus.is_some(),
        hero_power,
        attacks = attacks.len(),
        "turn planned"
    );

    Ok(TurnPlan {
        plays: play.intents(),
        hero_power,
        attacks,
    })
}
