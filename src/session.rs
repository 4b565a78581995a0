//! A live match session: log source, classifier, state and archive.
//!
//! The caller owns the session and drives it. `pump` applies every line
//! completed since the last call; `execute` performs one intent and pumps
//! again, so each decision sees the consequences of the previous one.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::cards::Catalog;
use crate::core::action::{Intent, IntentRecord};
use crate::core::config::TrackerConfig;
use crate::core::error::TrackerError;
use crate::core::player::Side;
use crate::core::state::{MatchState, Reconciled};
use crate::effector::{resolve, Effector};
use crate::log::{AuditSink, Classifier, LineSource};
use crate::strategy::{plan_turn, TurnPlan};

/// Counts from one `pump`, plus the errors it absorbed.
#[derive(Debug, Default)]
pub struct PumpSummary {
    /// Complete lines read.
    pub lines: usize,
    /// Lines that changed the state.
    pub updated: usize,
    /// Lines dropped as unknown or inapplicable.
    pub dropped: usize,
    /// Lines that raised an error.
    pub failed: usize,
    /// The errors themselves, in line order.
    pub errors: Vec<TrackerError>,
}

impl PumpSummary {
    /// First error that desynchronized the state during this pump.
    #[must_use]
    pub fn fatal(&self) -> Option<&TrackerError> {
        self.errors.iter().find(|e| e.is_fatal())
    }
}

/// Everything needed to follow one client log.
pub struct LogSession<S: LineSource, A: AuditSink> {
    source: S,
    classifier: Classifier,
    state: MatchState,
    audit: A,
    history: Vec<IntentRecord>,
}

impl<S: LineSource, A: AuditSink> LogSession<S, A> {
    pub fn new(
        config: TrackerConfig,
        catalog: Arc<Catalog>,
        source: S,
        audit: A,
    ) -> Result<Self, TrackerError> {
        let classifier = Classifier::new(&config, catalog)?;
        Ok(Self {
            source,
            classifier,
            state: MatchState::new(config),
            audit,
            history: Vec::new(),
        })
    }

    #[must_use]
    pub fn state(&self) -> &MatchState {
        &self.state
    }

    #[must_use]
    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    #[must_use]
    pub fn audit(&self) -> &A {
        &self.audit
    }

    /// Intents executed so far, across games.
    #[must_use]
    pub fn history(&self) -> &[IntentRecord] {
        &self.history
    }

    /// Apply every newly completed line.
    ///
    /// Integrity failures do not stop the pass: they are logged, kept in the
    /// summary, the state is left desynchronized, and later lines are still
    /// read so the next game is picked up. Only a read failure aborts.
    pub fn pump(&mut self) -> Result<PumpSummary, TrackerError> {
        let lines = self.source.poll()?;
        let mut summary = PumpSummary {
            lines: lines.len(),
            ..PumpSummary::default()
        };

        for line in &lines {
            match self.classifier.feed_line(line, &mut self.state, &mut self.audit) {
                Ok(Some(Reconciled::Updated)) => summary.updated += 1,
                Ok(Some(Reconciled::Dropped)) => summary.dropped += 1,
                Ok(_) => {}
                Err(err) => {
                    error!(error = %err, line = line.as_str(), "failed to apply line");
                    summary.failed += 1;
                    summary.errors.push(err);
                }
            }
        }
        Ok(summary)
    }

    /// Plan our turn against the current state.
    ///
    /// Runs the full consistency sweep first; a violation found here
    /// desynchronizes the match like one raised by a log line.
    pub fn plan(&mut self) -> Result<TurnPlan, TrackerError> {
        self.state.ensure_synced()?;
        self.state.check_integrity()?;
        plan_turn(&self.state)
    }

    /// Resolve, perform and record one intent, then read the log.
    pub fn execute(
        &mut self,
        intent: Intent,
        effector: &mut dyn Effector,
    ) -> Result<PumpSummary, TrackerError> {
        let command = resolve(&intent, &self.state)?;
        effector.perform(command)?;

        if intent == Intent::HeroPower {
            let cost = self.state.config().hero_power_cost;
            self.state.spend_mana(Side::Friendly, cost);
        }

        let turn = self.state.turn_number;
        let sequence = self
            .history
            .iter()
            .rev()
            .take_while(|r| r.turn == turn)
            .count() as u32;
        self.history
            .push(IntentRecord::new(Side::Friendly, intent, turn, sequence));
        info!(%intent, turn, sequence, "executed");

        self.pump()
    }

    /// Plan and execute a whole turn.
    ///
    /// Intents whose entity has moved since planning are skipped. Stops
    /// early if the match desynchronizes or ends.
    pub fn play_turn(&mut self, effector: &mut dyn Effector) -> Result<usize, TrackerError> {
        let plan = self.plan()?;
        let mut executed = 0;
        for intent in plan.intents() {
            if self.state.is_ended() {
                break;
            }
            match self.execute(intent, effector) {
                Ok(_) => executed += 1,
                Err(TrackerError::StaleIntent { entity }) => {
                    warn!(%intent, %entity, "skipping stale intent");
                }
                Err(err) => return Err(err),
            }
            self.state.ensure_synced()?;
        }
        Ok(executed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardDefinition, CardType};
    use crate::core::entity::EntityId;
    use crate::effector::{Command, RecordingEffector};
    use crate::log::MemoryLog;

    fn session() -> LogSession<MemoryLog, Vec<String>> {
        let catalog: Catalog = [
            CardDefinition::new("CS2_168", "Murloc Raider", CardType::Minion)
                .with_cost(1)
                .with_stats(2, 1),
            CardDefinition::new("HERO_08", "Jaina Proudmoore", CardType::Hero).with_stats(0, 30),
        ]
        .into_iter()
        .collect();
        LogSession::new(
            TrackerConfig::new("tingle"),
            Arc::new(catalog),
            MemoryLog::new(),
            Vec::new(),
        )
        .unwrap()
    }

    const START: &str = "[Power] GameState.DebugPrintPower() - CREATE_GAME";
    const HERO: &str = "[Zone] ZoneChangeList.ProcessChanges() - TRANSITIONING card [name=Jaina Proudmoore id=4 zone=PLAY zonePos=0 cardId=HERO_08 player=1] to FRIENDLY PLAY (Hero)";
    const TURN: &str = "[Power] GameState.DebugPrintPower() - TAG_CHANGE Entity=tingle tag=CURRENT_PLAYER value=1";
    const DRAW: &str = "[Zone] ZoneChangeList.ProcessChanges() - id=1 local=False [name=Murloc Raider id=6 zone=HAND zonePos=1 cardId=CS2_168 player=1] zone from  -> FRIENDLY HAND";

    #[test]
    fn test_pump_counts_lines() {
        let mut session = session();
        for line in [START, HERO, TURN, DRAW] {
            session.source_mut().push_line(line);
        }
        session.source_mut().append("[Power] partial");

        let summary = session.pump().unwrap();
        assert_eq!(summary.lines, 4);
        assert_eq!(summary.failed, 0);
        assert_eq!(session.state().hand(Side::Friendly), &[EntityId(6)]);
        assert_eq!(session.audit().len(), 3);
    }

    #[test]
    fn test_execute_records_and_pumps() {
        let mut session = session();
        for line in [START, HERO, TURN, DRAW] {
            session.source_mut().push_line(line);
        }
        session.pump().unwrap();

        let mut effector = RecordingEffector::new();
        session
            .execute(Intent::PlayCard { card: EntityId(6) }, &mut effector)
            .unwrap();
        assert_eq!(
            effector.commands,
            vec![Command::PlayCard {
                hand_index: 0,
                hand_size: 1
            }]
        );

        session.source_mut().push_line(
            "[Zone] ZoneChangeList.ProcessChanges() - id=2 local=False [name=Murloc Raider id=6 zone=PLAY zonePos=1 cardId=CS2_168 player=1] zone from FRIENDLY HAND -> FRIENDLY PLAY",
        );
        session.execute(Intent::EndTurn, &mut effector).unwrap();

        assert_eq!(session.state().board(Side::Friendly), &[EntityId(6)]);
        let sequences: Vec<u32> = session.history().iter().map(|r| r.sequence).collect();
        assert_eq!(sequences, vec![0, 1]);
    }

    #[test]
    fn test_hero_power_spends_mana() {
        let mut session = session();
        for line in [START, HERO, TURN] {
            session.source_mut().push_line(line);
        }
        session.pump().unwrap();
        assert_eq!(session.state().mana_available(Side::Friendly), 1);

        let mut effector = RecordingEffector::new();
        session.execute(Intent::HeroPower, &mut effector).unwrap();
        // Clamped: only one crystal was available.
        assert_eq!(session.state().mana_available(Side::Friendly), 0);
    }

    #[test]
    fn test_pump_surfaces_violation_details() {
        let mut session = session();
        for line in [
            START,
            HERO,
            "[Power] GameState.DebugPrintPower() -     TAG_CHANGE Entity=[name=Murloc Raider id=77 zone=PLAY zonePos=1 cardId=CS2_168 player=2] tag=CONTROLLER value=1",
        ] {
            session.source_mut().push_line(line);
        }

        let summary = session.pump().unwrap();
        assert_eq!(summary.failed, 1);
        assert!(matches!(
            summary.fatal(),
            Some(TrackerError::ControllerTargetMissing { entity }) if *entity == EntityId(77)
        ));

        let err = session.plan().unwrap_err();
        assert!(matches!(
            &err,
            TrackerError::Desynchronized { cause } if cause.entity() == EntityId(77)
        ));
        assert!(err.to_string().contains("Entity(77)"));
    }

    #[test]
    fn test_stale_intent_is_not_performed() {
        let mut session = session();
        session.source_mut().push_line(START);
        session.pump().unwrap();

        let mut effector = RecordingEffector::new();
        let err = session
            .execute(Intent::PlayCard { card: EntityId(77) }, &mut effector)
            .unwrap_err();
        assert!(matches!(err, TrackerError::StaleIntent { .. }));
        assert!(effector.commands.is_empty());
        assert!(session.history().is_empty());
    }
}
