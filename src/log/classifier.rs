//! Line classifier: turns log lines into match-state reconciliation.
//!
//! ## Phases
//!
//! - `AwaitingGame`: only `CREATE_GAME` is recognized. It resets the match
//!   state and moves to `InGame`. Nothing is archived.
//! - `InGame`: every line is archived, then classified against the rule
//!   table. A second `CREATE_GAME` is ignored; a terminal event returns to
//!   `AwaitingGame`.
//!
//! After an integrity failure the match state is desynchronized. Lines are
//! still archived but only terminal events are honoured, so the next game
//! starts from a clean state.

use std::sync::Arc;

use tracing::{debug, trace, warn};

use super::audit::AuditSink;
use super::event::LogEvent;
use super::rules::{RuleKind, RuleSet};
use crate::cards::Catalog;
use crate::core::config::TrackerConfig;
use crate::core::error::TrackerError;
use crate::core::state::{MatchState, Outcome, Reconciled};

/// Classifier state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    AwaitingGame,
    InGame,
}

const TERMINAL: &[RuleKind] = &[RuleKind::PlayState, RuleKind::GameComplete];

/// Classifies lines and applies them to a `MatchState`.
pub struct Classifier {
    rules: RuleSet,
    catalog: Arc<Catalog>,
    phase: Phase,
}

impl Classifier {
    /// Compile the rule table for the configured account name.
    pub fn new(config: &TrackerConfig, catalog: Arc<Catalog>) -> Result<Self, TrackerError> {
        Ok(Self {
            rules: RuleSet::new(&config.player_name)?,
            catalog,
            phase: Phase::AwaitingGame,
        })
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Process one line.
    ///
    /// Returns `Ok(None)` for lines that carry no recognized event.
    pub fn feed_line(
        &mut self,
        line: &str,
        state: &mut MatchState,
        audit: &mut dyn AuditSink,
    ) -> Result<Option<Reconciled>, TrackerError> {
        if self.phase == Phase::AwaitingGame {
            if self
                .rules
                .classify_only(line, &[RuleKind::GameStart])
                .is_some()
            {
                state.start_game();
                self.phase = Phase::InGame;
                return Ok(Some(Reconciled::Updated));
            }
            return Ok(None);
        }

        if let Err(err) = audit.archive(line) {
            warn!(error = %err, "audit sink failed");
        }

        let classified = if state.is_desynced() {
            self.rules.classify_only(line, TERMINAL)
        } else {
            self.rules.classify(line)
        };
        let Some((kind, event)) = classified else {
            trace!(line, "unmatched");
            return Ok(None);
        };
        trace!(?kind, "matched");

        self.apply(event, state).map(Some)
    }

    fn apply(&mut self, event: LogEvent, state: &mut MatchState) -> Result<Reconciled, TrackerError> {
        let catalog = Arc::clone(&self.catalog);
        let outcome = match event {
            LogEvent::GameStart => {
                debug!("ignoring game start inside a running game");
                Reconciled::Unchanged
            }
            LogEvent::PlayerNumber(number) => state.set_player_number(number),
            LogEvent::GameOver(outcome) => {
                self.phase = Phase::AwaitingGame;
                state.finish(outcome)
            }
            LogEvent::GameComplete => {
                self.phase = Phase::AwaitingGame;
                state.finish(Outcome::Unknown)
            }
            LogEvent::TurnStart(side) => state.begin_turn(side),
            LogEvent::Draw(entity) => state.draw(
                &entity.card_id,
                entity.id,
                Some(entity.position).filter(|&p| p > 0),
                &catalog,
            ),
            LogEvent::Play { side, entity } => state.play(side, &entity.card_id, entity.id, &catalog)?,
            LogEvent::Graveyard(entity) => state.send_to_graveyard(entity.id)?,
            LogEvent::ZoneChange { entity, zone } => state.update_zone(entity.id, zone)?,
            LogEvent::Position { entity, to } => state.update_position(entity.id, to),
            LogEvent::Attack { attacker, defender } => state.perform_attack(attacker.id, defender.id),
            LogEvent::Target { source, target } => state.note_target(source, target),
            LogEvent::Controller { entity, player } => state.change_controller(entity.id, player)?,
            LogEvent::Tag { entity, tag, value } => state.update_tag(entity.id, tag, value),
            LogEvent::OpposingCast(entity) => state.cast_spell(&entity.card_id, entity.id, &catalog),
        };
        Ok(outcome)
    }
}
