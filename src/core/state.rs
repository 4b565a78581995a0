//! Match state: the reconstructed model of one game.
//!
//! ## MatchState
//!
//! Owns every entity seen this match in an arena keyed by `EntityId`.
//! Hands, boards and the graveyard are ordered id lists in the
//! `ZoneManager`; nothing else holds entities, so a zone change can never
//! leave a stale copy behind.
//!
//! All mutation goes through the reconciliation operations below, one per
//! recognized log event. Each returns a `Reconciled` outcome. Recoverable
//! anomalies (unknown ids, catalog misses) drop the update and push a
//! `Warning`; integrity violations return an error and mark the state
//! desynchronized.
//!
//! The arena uses `im` persistent maps, so `snapshot()` is O(1) and a
//! decision pass can hold a consistent copy.

use im::{HashMap as ImHashMap, HashSet as ImHashSet};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use super::config::TrackerConfig;
use super::entity::{EntityId, Zone};
use super::error::{IntegrityViolation, TrackerError, Warning};
use super::player::{Player, Side, SideMap};
use crate::cards::{Catalog, CardId, Entity, EntityKind, Mechanic, NumericTag};
use crate::zones::{Location, ZoneManager};

/// Result of applying one event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reconciled {
    /// The state changed.
    Updated,
    /// The event was already reflected (or targets a terminal entity).
    Unchanged,
    /// The event could not be applied; a warning was recorded.
    Dropped,
}

/// How a match ended, from our side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Won,
    Lost,
    Tied,
    /// The game ended without a PLAYSTATE line for us.
    Unknown,
}

/// Reconstructed state of one match.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchState {
    config: TrackerConfig,

    players: SideMap<Player>,

    /// Every entity seen this match.
    entities: ImHashMap<EntityId, Entity>,

    /// Entities whose zone is HAND or PLAY.
    live: ImHashSet<EntityId>,

    /// Hand, board and graveyard membership.
    zones: ZoneManager,

    /// Side to act; unknown until the first turn event.
    turn: Option<Side>,

    /// Turn transitions observed (starts at 0).
    pub turn_number: u32,

    started: bool,
    ended: bool,
    outcome: Option<Outcome>,

    /// Our client player slot (1 or 2).
    self_player: Option<u8>,

    /// First integrity violation this match, if any.
    desync_cause: Option<IntegrityViolation>,

    diagnostics: Vec<Warning>,
}

impl MatchState {
    /// Create an idle state (no game started).
    #[must_use]
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            config,
            players: SideMap::default(),
            entities: ImHashMap::new(),
            live: ImHashSet::new(),
            zones: ZoneManager::new(),
            turn: None,
            turn_number: 0,
            started: false,
            ended: false,
            outcome: None,
            self_player: None,
            desync_cause: None,
            diagnostics: Vec::new(),
        }
    }

    // === Queries ===

    #[must_use]
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    #[must_use]
    pub fn player(&self, side: Side) -> &Player {
        &self.players[side]
    }

    /// Side to act, if known.
    #[must_use]
    pub fn turn(&self) -> Option<Side> {
        self.turn
    }

    #[must_use]
    pub fn is_started(&self) -> bool {
        self.started
    }

    #[must_use]
    pub fn is_ended(&self) -> bool {
        self.ended
    }

    #[must_use]
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    #[must_use]
    pub fn self_player_number(&self) -> Option<u8> {
        self.self_player
    }

    /// True after an integrity violation; decisions must not use this state.
    #[must_use]
    pub fn is_desynced(&self) -> bool {
        self.desync_cause.is_some()
    }

    /// The violation that desynchronized this match.
    #[must_use]
    pub fn desync_cause(&self) -> Option<&IntegrityViolation> {
        self.desync_cause.as_ref()
    }

    /// Refuse decisions on a desynchronized state.
    pub fn ensure_synced(&self) -> Result<(), TrackerError> {
        match &self.desync_cause {
            Some(cause) => Err(TrackerError::Desynchronized {
                cause: cause.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Warnings recorded this match, oldest first.
    #[must_use]
    pub fn diagnostics(&self) -> &[Warning] {
        &self.diagnostics
    }

    /// Drain the recorded warnings.
    pub fn take_diagnostics(&mut self) -> Vec<Warning> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Look up any entity seen this match.
    #[must_use]
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// All entities seen this match, in no particular order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    /// Check whether an entity's zone is HAND or PLAY.
    #[must_use]
    pub fn is_live(&self, id: EntityId) -> bool {
        self.live.contains(&id)
    }

    /// Hand contents in log order. Only our own hand is tracked.
    #[must_use]
    pub fn hand(&self, side: Side) -> &[EntityId] {
        self.zones.entities_in(Location::Hand(side))
    }

    /// Board contents in log order.
    #[must_use]
    pub fn board(&self, side: Side) -> &[EntityId] {
        self.zones.entities_in(Location::Board(side))
    }

    /// Dead entities in the order they died.
    #[must_use]
    pub fn graveyard(&self) -> &[EntityId] {
        self.zones.entities_in(Location::Graveyard)
    }

    /// Where an entity is listed.
    #[must_use]
    pub fn location(&self, id: EntityId) -> Option<Location> {
        self.zones.location(id)
    }

    /// Hand entities in order.
    pub fn hand_entities(&self, side: Side) -> impl Iterator<Item = &Entity> {
        self.hand(side).iter().filter_map(|id| self.entities.get(id))
    }

    /// Board entities in order.
    pub fn board_entities(&self, side: Side) -> impl Iterator<Item = &Entity> {
        self.board(side).iter().filter_map(|id| self.entities.get(id))
    }

    /// Mana still spendable this turn.
    #[must_use]
    pub fn mana_available(&self, side: Side) -> i32 {
        self.players[side].mana_available()
    }

    /// Our board entities that could still attack this turn.
    #[must_use]
    pub fn idle_attackers(&self) -> Vec<EntityId> {
        self.board_entities(Side::Friendly)
            .filter(|e| e.active && e.attack() > 0)
            .map(|e| e.id)
            .collect()
    }

    /// Map a client player slot to a side, once our slot is known.
    #[must_use]
    pub fn side_of(&self, player: u8) -> Option<Side> {
        self.self_player
            .map(|own| Side::from_player_number(player, own))
    }

    /// Cheap copy for the decision layer.
    #[must_use]
    pub fn snapshot(&self) -> Self {
        self.clone()
    }

    // === Match lifecycle ===

    /// Reset for a new game and mark it started.
    pub fn start_game(&mut self) {
        let config = self.config.clone();
        *self = Self::new(config);
        self.started = true;
        info!("game started");
    }

    /// Record which client slot is ours. Only the first call takes effect.
    pub fn set_player_number(&mut self, number: u8) -> Reconciled {
        if self.self_player.is_some() {
            return Reconciled::Unchanged;
        }
        self.self_player = Some(number);
        info!(player = number, "assigned player slot");
        Reconciled::Updated
    }

    /// Terminal event.
    pub fn finish(&mut self, outcome: Outcome) -> Reconciled {
        if self.ended {
            return Reconciled::Unchanged;
        }
        self.ended = true;
        self.started = false;
        self.outcome = Some(outcome);
        info!(?outcome, turns = self.turn_number, "game over");
        Reconciled::Updated
    }

    /// Hand the turn to `side`: refresh its mana and wake its board.
    ///
    /// A repeated event for the side already acting is a no-op.
    pub fn begin_turn(&mut self, side: Side) -> Reconciled {
        if self.turn == Some(side) {
            return Reconciled::Unchanged;
        }
        self.turn = Some(side);
        self.turn_number += 1;

        let max_mana = self.config.max_mana;
        self.players[side].refresh(max_mana);

        let board: Vec<EntityId> = self.board(side).to_vec();
        for id in board {
            if let Some(entity) = self.entities.get_mut(&id) {
                entity.active = true;
                entity.has_attacked = false;
            }
        }

        info!(
            %side,
            turn = self.turn_number,
            mana = self.players[side].mana_available(),
            "turn started"
        );
        Reconciled::Updated
    }

    /// Commit mana outside the card-play path (hero power).
    pub fn spend_mana(&mut self, side: Side, amount: i32) {
        self.players[side].spend_mana(amount);
        debug!(%side, amount, left = self.players[side].mana_available(), "spent mana");
    }

    // === Entity reconciliation ===

    /// A card arrived in our hand.
    pub fn draw(
        &mut self,
        card_id: &CardId,
        id: EntityId,
        position: Option<u8>,
        catalog: &Catalog,
    ) -> Reconciled {
        if let Some(entity) = self.entities.get(&id) {
            if entity.zone.is_terminal() {
                return Reconciled::Unchanged;
            }
            if self.zones.is_in(id, Location::Hand(Side::Friendly)) {
                return Reconciled::Unchanged;
            }
        } else {
            let Some(entity) = self.materialize(card_id, id, Zone::Hand, catalog) else {
                return Reconciled::Dropped;
            };
            self.entities.insert(id, entity);
        }

        self.relist(id, Some(Location::Hand(Side::Friendly)));
        self.set_zone(id, Zone::Hand);
        if let Some(entity) = self.entities.get_mut(&id) {
            entity.controller = Some(Side::Friendly);
            entity.position = position;
            entity.active = false;
            info!(entity = %id, name = %entity.name, cost = entity.cost, "drew card");
        }

        if self.turn == Some(Side::Friendly) {
            self.players[Side::Friendly].drew_card_this_turn = true;
        }
        Reconciled::Updated
    }

    /// An entity entered play on `side`.
    ///
    /// A known entity is reused; our own play from hand pays its cost.
    /// Unknown entities (summoned, granted, heroes at game start) are
    /// built from the catalog. Only minions are listed on a board.
    pub fn play(
        &mut self,
        side: Side,
        card_id: &CardId,
        id: EntityId,
        catalog: &Catalog,
    ) -> Result<Reconciled, TrackerError> {
        if let Some(entity) = self.entities.get(&id) {
            if entity.zone.is_terminal() {
                return Ok(Reconciled::Unchanged);
            }
            if let Some(held_by) = self.zones.board_of(id) {
                if held_by == side {
                    return Ok(Reconciled::Unchanged);
                }
                return Err(self.violation(IntegrityViolation::BoardConflict {
                    entity: id,
                    held_by,
                    claimed_by: side,
                }));
            }
            if side == Side::Friendly && self.in_our_hand(id) {
                self.pay_from_hand(id);
            }
        } else {
            let Some(entity) = self.materialize(card_id, id, Zone::Play, catalog) else {
                return Ok(Reconciled::Dropped);
            };
            self.entities.insert(id, entity);
        }

        self.enter_play(id, side);
        Ok(Reconciled::Updated)
    }

    /// The opponent cast a spell from hand. Tracked for target lookups only.
    pub fn cast_spell(&mut self, card_id: &CardId, id: EntityId, catalog: &Catalog) -> Reconciled {
        if let Some(existing) = self.entities.get(&id) {
            if existing.card_id == *card_id {
                return Reconciled::Unchanged;
            }
            warn!(entity = %id, card = %card_id, known = %existing.card_id, "cast reuses a registered id");
            self.diagnostics.push(Warning::DuplicateEntity { entity: id });
            return Reconciled::Dropped;
        }
        let Some(mut entity) = self.materialize(card_id, id, Zone::Play, catalog) else {
            return Reconciled::Dropped;
        };
        entity.controller = Some(Side::Opposing);
        info!(entity = %id, name = %entity.name, "opponent cast");
        self.entities.insert(id, entity);
        self.set_zone(id, Zone::Play);
        Reconciled::Updated
    }

    /// Move an entity to the graveyard. Re-applying is a no-op.
    pub fn send_to_graveyard(&mut self, id: EntityId) -> Result<Reconciled, TrackerError> {
        let Some(entity) = self.entities.get(&id) else {
            return Ok(self.drop_unknown(id, "GRAVEYARD"));
        };
        if entity.zone.is_terminal() {
            return Ok(Reconciled::Unchanged);
        }

        self.relist(id, Some(Location::Graveyard));
        self.set_zone(id, Zone::Graveyard);

        for (_, player) in self.players.iter_mut() {
            if player.weapon == Some(id) {
                player.weapon = None;
            }
        }
        if let Some(entity) = self.entities.get_mut(&id) {
            entity.active = false;
            entity.position = None;
            info!(entity = %id, name = %entity.name, "moved to graveyard");
        }
        Ok(Reconciled::Updated)
    }

    /// Generic `tag=ZONE` transition.
    ///
    /// Defers to the specific handlers where one exists; never touches a
    /// dead entity.
    pub fn update_zone(&mut self, id: EntityId, zone: Zone) -> Result<Reconciled, TrackerError> {
        let Some(entity) = self.entities.get(&id) else {
            return Ok(self.drop_unknown(id, "ZONE"));
        };
        if entity.zone.is_terminal() {
            return Ok(Reconciled::Unchanged);
        }

        match zone {
            Zone::Graveyard => self.send_to_graveyard(id),
            Zone::Deck => {
                self.relist(id, None);
                self.entities.remove(&id);
                self.live.remove(&id);
                info!(entity = %id, "returned to deck; forgotten");
                Ok(Reconciled::Updated)
            }
            Zone::Play => {
                if !self.in_our_hand(id) {
                    return Ok(Reconciled::Unchanged);
                }
                self.pay_from_hand(id);
                self.relist(id, None);
                self.set_zone(id, Zone::Play);
                debug!(entity = %id, "left hand for play");
                Ok(Reconciled::Updated)
            }
            Zone::Hand => {
                if entity.zone == Zone::Hand {
                    return Ok(Reconciled::Unchanged);
                }
                let to = match entity.controller {
                    Some(Side::Friendly) => Some(Location::Hand(Side::Friendly)),
                    _ => None,
                };
                self.relist(id, to);
                self.set_zone(id, Zone::Hand);
                if let Some(entity) = self.entities.get_mut(&id) {
                    entity.active = false;
                }
                debug!(entity = %id, "returned to hand");
                Ok(Reconciled::Updated)
            }
            Zone::None => Ok(Reconciled::Unchanged),
        }
    }

    /// `pos from A -> B`.
    pub fn update_position(&mut self, id: EntityId, position: u8) -> Reconciled {
        let Some(entity) = self.entities.get_mut(&id) else {
            return self.drop_unknown(id, "POSITION");
        };
        if entity.zone.is_terminal() || entity.position == Some(position) {
            return Reconciled::Unchanged;
        }
        entity.position = Some(position);
        debug!(entity = %id, position, zone = %entity.zone, "position updated");
        Reconciled::Updated
    }

    /// Numeric `TAG_CHANGE`.
    pub fn update_tag(&mut self, id: EntityId, tag: NumericTag, value: i32) -> Reconciled {
        let Some(entity) = self.entities.get_mut(&id) else {
            return self.drop_unknown(id, tag.as_str());
        };
        if entity.zone.is_terminal() {
            return Reconciled::Unchanged;
        }
        if !entity.apply_tag(tag, value) {
            warn!(entity = %id, %tag, "tag does not apply to this entity");
            self.diagnostics.push(Warning::InapplicableTag {
                entity: id,
                tag: tag.as_str(),
            });
            return Reconciled::Dropped;
        }
        debug!(entity = %id, %tag, value, "tag updated");
        Reconciled::Updated
    }

    /// `tag=CONTROLLER value=N`: move a minion between boards.
    pub fn change_controller(&mut self, id: EntityId, player: u8) -> Result<Reconciled, TrackerError> {
        let Some(to) = self.side_of(player) else {
            warn!(entity = %id, "controller change before player slot is known");
            self.diagnostics.push(Warning::PlayerUnknown { entity: id });
            return Ok(Reconciled::Dropped);
        };
        let Some(entity) = self.entities.get(&id) else {
            self.desync_cause
                .get_or_insert(IntegrityViolation::UnknownController { entity: id });
            error!(entity = %id, "controller change for unknown entity");
            return Err(TrackerError::ControllerTargetMissing { entity: id });
        };
        if entity.zone.is_terminal() {
            return Ok(Reconciled::Unchanged);
        }

        let zone = entity.zone;
        let is_minion = entity.is_minion();
        let charge = entity.has_mechanic(&Mechanic::Charge);

        match self.zones.board_of(id) {
            Some(from) if from == to => return Ok(Reconciled::Unchanged),
            Some(_) => {
                self.relist(id, Some(Location::Board(to)));
            }
            None if zone == Zone::Play && is_minion => {
                return Err(self.violation(IntegrityViolation::MissingFromBoard {
                    entity: id,
                    zone,
                    expected: to,
                }));
            }
            None => {}
        }

        if let Some(entity) = self.entities.get_mut(&id) {
            entity.controller = Some(to);
            if zone == Zone::Play {
                entity.active = charge;
            }
            info!(entity = %id, name = %entity.name, controller = %to, "changed controller");
        }
        Ok(Reconciled::Updated)
    }

    /// `ACTION_START ... SubType=ATTACK`: the attacker has acted.
    ///
    /// Damage is not applied here; it arrives as `DAMAGE` tags.
    pub fn perform_attack(&mut self, attacker: EntityId, defender: EntityId) -> Reconciled {
        let Some(entity) = self.entities.get_mut(&attacker) else {
            return self.drop_unknown(attacker, "ATTACK");
        };
        if entity.zone.is_terminal() {
            return Reconciled::Unchanged;
        }
        entity.has_attacked = true;
        entity.active = false;
        info!(attacker = %attacker, name = %entity.name, %defender, "attack");
        Reconciled::Updated
    }

    /// `tag=CARD_TARGET`: remember what a spell or hero power aimed at.
    pub fn note_target(&mut self, id: EntityId, target: EntityId) -> Reconciled {
        let Some(entity) = self.entities.get_mut(&id) else {
            return self.drop_unknown(id, "CARD_TARGET");
        };
        if entity.zone.is_terminal() || entity.target == Some(target) {
            return Reconciled::Unchanged;
        }
        entity.target = Some(target);
        if matches!(entity.kind, EntityKind::HeroPower) {
            info!(entity = %id, name = %entity.name, %target, controller = ?entity.controller, "hero power used");
        } else {
            debug!(entity = %id, %target, "target chosen");
        }
        Reconciled::Updated
    }

    // === Integrity ===

    /// Full consistency sweep.
    ///
    /// Checks that every listed id is registered, that each entity's zone
    /// agrees with the list holding it, and that the live set holds exactly
    /// the HAND and PLAY entities.
    pub fn check_integrity(&mut self) -> Result<(), TrackerError> {
        if let Some(violation) = self.find_violation() {
            return Err(self.violation(violation));
        }
        Ok(())
    }

    fn find_violation(&self) -> Option<IntegrityViolation> {
        for (id, listed) in self.zones.iter() {
            let Some(entity) = self.entities.get(&id) else {
                return Some(IntegrityViolation::Orphan { entity: id, listed });
            };
            let expected = match listed {
                Location::Hand(_) => Zone::Hand,
                Location::Board(_) => Zone::Play,
                Location::Graveyard => Zone::Graveyard,
            };
            if entity.zone != expected {
                return Some(IntegrityViolation::ZoneMismatch {
                    entity: id,
                    recorded: entity.zone,
                    listed,
                });
            }
        }
        for &id in &self.live {
            match self.entities.get(&id) {
                Some(entity) if entity.zone.is_terminal() => {
                    return Some(IntegrityViolation::LiveAndDead { entity: id });
                }
                Some(entity) if !entity.zone.is_live() => {
                    return Some(IntegrityViolation::LiveSetMismatch {
                        entity: id,
                        zone: entity.zone,
                        live: true,
                    });
                }
                Some(_) => {}
                None => {
                    return Some(IntegrityViolation::Orphan {
                        entity: id,
                        listed: self.zones.location(id).unwrap_or(Location::Graveyard),
                    });
                }
            }
        }
        for entity in self.entities.values() {
            if entity.zone.is_live() && !self.live.contains(&entity.id) {
                return Some(IntegrityViolation::LiveSetMismatch {
                    entity: entity.id,
                    zone: entity.zone,
                    live: false,
                });
            }
        }
        None
    }

    // === Internals ===

    fn violation(&mut self, violation: IntegrityViolation) -> TrackerError {
        error!(entity = %violation.entity(), %violation, "state desynchronized");
        self.desync_cause.get_or_insert_with(|| violation.clone());
        TrackerError::Integrity(violation)
    }

    fn drop_unknown(&mut self, id: EntityId, update: &'static str) -> Reconciled {
        warn!(entity = %id, update, "dropping update for unknown entity");
        self.diagnostics.push(Warning::UnknownEntity { entity: id, update });
        Reconciled::Dropped
    }

    fn materialize(
        &mut self,
        card_id: &CardId,
        id: EntityId,
        zone: Zone,
        catalog: &Catalog,
    ) -> Option<Entity> {
        match catalog.get(card_id) {
            Some(definition) => Some(Entity::from_definition(id, definition, zone, None)),
            None => {
                warn!(entity = %id, card = %card_id, "no catalog entry; entity not created");
                self.diagnostics.push(Warning::CatalogMiss {
                    card: card_id.clone(),
                    entity: id,
                });
                None
            }
        }
    }

    /// Move an id between lists.
    fn relist(&mut self, id: EntityId, to: Option<Location>) {
        match to {
            Some(location) => {
                self.zones.move_to(id, location);
            }
            None => {
                self.zones.remove(id);
            }
        }
    }

    /// Assign a zone; live membership follows it.
    fn set_zone(&mut self, id: EntityId, zone: Zone) {
        let Some(entity) = self.entities.get_mut(&id) else {
            return;
        };
        entity.zone = zone;
        if zone.is_live() {
            self.live.insert(id);
        } else {
            self.live.remove(&id);
        }
    }

    fn in_our_hand(&self, id: EntityId) -> bool {
        self.entities.get(&id).is_some_and(|e| {
            e.zone == Zone::Hand && e.controller == Some(Side::Friendly)
        })
    }

    /// Charge a card leaving our hand. The bonus card grants a crystal.
    fn pay_from_hand(&mut self, id: EntityId) {
        let Some(entity) = self.entities.get(&id) else {
            return;
        };
        let cost = entity.cost;
        let is_bonus = entity.name == self.config.bonus_card_name;

        let player = &mut self.players[Side::Friendly];
        player.spend_mana(cost);
        if is_bonus {
            player.temporary_mana += 1;
        }
        debug!(entity = %id, cost, bonus = is_bonus, left = player.mana_available(), "paid for card");
    }

    fn enter_play(&mut self, id: EntityId, side: Side) {
        let Some(entity) = self.entities.get(&id) else {
            return;
        };
        let listing = match entity.kind {
            EntityKind::Minion { .. } => Some(Location::Board(side)),
            EntityKind::Hero { .. } => {
                self.players[side].hero = Some(id);
                None
            }
            EntityKind::Weapon { .. } => {
                self.players[side].weapon = Some(id);
                None
            }
            EntityKind::HeroPower | EntityKind::Spell | EntityKind::Enchantment => None,
        };
        self.relist(id, listing);
        self.set_zone(id, Zone::Play);

        if let Some(entity) = self.entities.get_mut(&id) {
            entity.controller = Some(side);
            entity.has_attacked = false;
            entity.active = entity.has_mechanic(&Mechanic::Charge);
            info!(
                entity = %id,
                name = %entity.name,
                %side,
                kind = ?entity.card_type(),
                "entered play"
            );
        }
    }
}

impl Default for MatchState {
    fn default() -> Self {
        Self::new(TrackerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardDefinition, CardType};

    fn catalog() -> Catalog {
        [
            CardDefinition::new("CS2_168", "Murloc Raider", CardType::Minion)
                .with_cost(1)
                .with_stats(2, 1),
            CardDefinition::new("CS2_121", "Frostwolf Grunt", CardType::Minion)
                .with_cost(2)
                .with_stats(2, 2)
                .with_mechanic("Taunt"),
            CardDefinition::new("CS2_124", "Wolfrider", CardType::Minion)
                .with_cost(3)
                .with_stats(3, 1)
                .with_mechanic("Charge"),
            CardDefinition::new("HERO_01", "Garrosh Hellscream", CardType::Hero).with_stats(0, 30),
            CardDefinition::new("CS2_102", "Armor Up!", CardType::HeroPower).with_cost(2),
            CardDefinition::new("CS2_106", "Fiery War Axe", CardType::Weapon)
                .with_cost(2)
                .with_stats(3, 0)
                .with_durability(2),
            CardDefinition::new("GAME_005", "The Coin", CardType::Spell),
        ]
        .into_iter()
        .collect()
    }

    fn started() -> MatchState {
        let mut state = MatchState::default();
        state.start_game();
        state.set_player_number(1);
        state
    }

    fn card(id: &str) -> CardId {
        CardId::from(id)
    }

    #[test]
    fn test_draw_registers_in_hand() {
        let cat = catalog();
        let mut state = started();

        let outcome = state.draw(&card("CS2_168"), EntityId(10), Some(1), &cat);

        assert_eq!(outcome, Reconciled::Updated);
        assert_eq!(state.hand(Side::Friendly), &[EntityId(10)]);
        assert!(state.is_live(EntityId(10)));
        assert_eq!(state.entity(EntityId(10)).unwrap().zone, Zone::Hand);
    }

    #[test]
    fn test_draw_catalog_miss() {
        let cat = catalog();
        let mut state = started();

        let outcome = state.draw(&card("NOPE_001"), EntityId(10), None, &cat);

        assert_eq!(outcome, Reconciled::Dropped);
        assert!(state.entity(EntityId(10)).is_none());
        assert!(matches!(state.diagnostics()[0], Warning::CatalogMiss { .. }));
    }

    #[test]
    fn test_play_from_hand_pays_cost() {
        let cat = catalog();
        let mut state = started();
        state.begin_turn(Side::Friendly);
        state.begin_turn(Side::Opposing);
        state.begin_turn(Side::Friendly);
        assert_eq!(state.mana_available(Side::Friendly), 2);

        state.draw(&card("CS2_168"), EntityId(10), None, &cat);
        state.play(Side::Friendly, &card("CS2_168"), EntityId(10), &cat).unwrap();

        assert!(state.hand(Side::Friendly).is_empty());
        assert_eq!(state.board(Side::Friendly), &[EntityId(10)]);
        assert_eq!(state.mana_available(Side::Friendly), 1);
        assert!(!state.entity(EntityId(10)).unwrap().active);
    }

    #[test]
    fn test_zone_tag_then_play_pays_once() {
        let cat = catalog();
        let mut state = started();
        for _ in 0..3 {
            state.begin_turn(Side::Friendly);
            state.begin_turn(Side::Opposing);
        }
        state.begin_turn(Side::Friendly);
        assert_eq!(state.mana_available(Side::Friendly), 4);

        state.draw(&card("CS2_124"), EntityId(12), None, &cat);
        state.update_zone(EntityId(12), Zone::Play).unwrap();
        state.play(Side::Friendly, &card("CS2_124"), EntityId(12), &cat).unwrap();

        assert_eq!(state.mana_available(Side::Friendly), 1);
        assert_eq!(state.board(Side::Friendly), &[EntityId(12)]);
        // Charge minions may act immediately.
        assert!(state.entity(EntityId(12)).unwrap().active);
    }

    #[test]
    fn test_bonus_card_grants_crystal() {
        let cat = catalog();
        let mut state = started();
        state.begin_turn(Side::Friendly);

        state.draw(&card("GAME_005"), EntityId(68), None, &cat);
        state.update_zone(EntityId(68), Zone::Play).unwrap();

        assert_eq!(state.mana_available(Side::Friendly), 2);
        assert!(state.hand(Side::Friendly).is_empty());
        assert!(state.is_live(EntityId(68)));
    }

    #[test]
    fn test_hero_weapon_and_power_not_on_board() {
        let cat = catalog();
        let mut state = started();

        state.play(Side::Friendly, &card("HERO_01"), EntityId(4), &cat).unwrap();
        state.play(Side::Friendly, &card("CS2_102"), EntityId(5), &cat).unwrap();
        state.play(Side::Friendly, &card("CS2_106"), EntityId(30), &cat).unwrap();

        assert!(state.board(Side::Friendly).is_empty());
        assert_eq!(state.player(Side::Friendly).hero, Some(EntityId(4)));
        assert_eq!(state.player(Side::Friendly).weapon, Some(EntityId(30)));
        assert!(state.entity(EntityId(5)).is_some());

        state.send_to_graveyard(EntityId(30)).unwrap();
        assert_eq!(state.player(Side::Friendly).weapon, None);
    }

    #[test]
    fn test_play_on_both_boards_is_violation() {
        let cat = catalog();
        let mut state = started();
        state.play(Side::Friendly, &card("CS2_168"), EntityId(13), &cat).unwrap();

        let err = state
            .play(Side::Opposing, &card("CS2_168"), EntityId(13), &cat)
            .unwrap_err();

        assert!(err.is_fatal());
        assert!(state.is_desynced());
        assert!(err.to_string().contains("Entity(13)"));
    }

    #[test]
    fn test_graveyard_is_terminal_and_idempotent() {
        let cat = catalog();
        let mut state = started();
        state.play(Side::Opposing, &card("CS2_121"), EntityId(20), &cat).unwrap();

        assert_eq!(state.send_to_graveyard(EntityId(20)).unwrap(), Reconciled::Updated);
        let once = state.snapshot();
        assert_eq!(state.send_to_graveyard(EntityId(20)).unwrap(), Reconciled::Unchanged);
        assert_eq!(state, once);

        assert!(state.board(Side::Opposing).is_empty());
        assert_eq!(state.graveyard(), &[EntityId(20)]);
        assert!(!state.is_live(EntityId(20)));

        assert_eq!(state.update_tag(EntityId(20), NumericTag::Damage, 5), Reconciled::Unchanged);
        assert_eq!(state.update_position(EntityId(20), 3), Reconciled::Unchanged);
        assert_eq!(state.change_controller(EntityId(20), 1).unwrap(), Reconciled::Unchanged);
        assert_eq!(state.entity(EntityId(20)).unwrap().damage, 0);
    }

    #[test]
    fn test_unknown_zone_update_is_dropped() {
        let mut state = started();
        let before = state.snapshot();

        let outcome = state.update_zone(EntityId(99), Zone::Graveyard).unwrap();

        assert_eq!(outcome, Reconciled::Dropped);
        assert_eq!(state.diagnostics().len(), 1);
        assert_eq!(state.take_diagnostics().len(), 1);
        assert_eq!(state, before);
    }

    #[test]
    fn test_deck_forgets_entity() {
        let cat = catalog();
        let mut state = started();
        state.draw(&card("CS2_168"), EntityId(10), None, &cat);

        state.update_zone(EntityId(10), Zone::Deck).unwrap();

        assert!(state.entity(EntityId(10)).is_none());
        assert!(state.hand(Side::Friendly).is_empty());
        assert!(!state.is_live(EntityId(10)));
    }

    #[test]
    fn test_turn_refresh_and_repeat() {
        let cat = catalog();
        let mut state = started();
        state.play(Side::Friendly, &card("CS2_168"), EntityId(10), &cat).unwrap();

        assert_eq!(state.begin_turn(Side::Friendly), Reconciled::Updated);
        assert_eq!(state.begin_turn(Side::Friendly), Reconciled::Unchanged);
        assert_eq!(state.turn_number, 1);
        assert_eq!(state.player(Side::Friendly).mana_pool, 1);
        assert!(state.entity(EntityId(10)).unwrap().active);
        assert_eq!(state.idle_attackers(), vec![EntityId(10)]);

        state.perform_attack(EntityId(10), EntityId(4));
        assert!(state.idle_attackers().is_empty());
        assert!(state.entity(EntityId(10)).unwrap().has_attacked);
    }

    #[test]
    fn test_mana_caps_at_max() {
        let mut state = started();
        for _ in 0..12 {
            state.begin_turn(Side::Friendly);
            state.begin_turn(Side::Opposing);
        }
        assert_eq!(state.player(Side::Friendly).mana_pool, 10);
        assert_eq!(state.player(Side::Opposing).mana_pool, 10);
    }

    #[test]
    fn test_controller_change_moves_between_boards() {
        let cat = catalog();
        let mut state = started();
        state.play(Side::Opposing, &card("CS2_121"), EntityId(20), &cat).unwrap();

        let outcome = state.change_controller(EntityId(20), 1).unwrap();

        assert_eq!(outcome, Reconciled::Updated);
        assert!(state.board(Side::Opposing).is_empty());
        assert_eq!(state.board(Side::Friendly), &[EntityId(20)]);
        assert_eq!(state.entity(EntityId(20)).unwrap().controller, Some(Side::Friendly));
    }

    #[test]
    fn test_controller_change_unknown_is_fatal() {
        let mut state = started();
        let err = state.change_controller(EntityId(77), 2).unwrap_err();
        assert!(matches!(err, TrackerError::ControllerTargetMissing { entity } if entity == EntityId(77)));
        assert!(state.is_desynced());
    }

    #[test]
    fn test_tags_and_unknown_ids() {
        let cat = catalog();
        let mut state = started();
        state.play(Side::Opposing, &card("CS2_121"), EntityId(20), &cat).unwrap();

        assert_eq!(state.update_tag(EntityId(20), NumericTag::Damage, 1), Reconciled::Updated);
        assert_eq!(state.entity(EntityId(20)).unwrap().remaining_health(), 1);

        assert_eq!(state.update_tag(EntityId(20), NumericTag::Armor, 1), Reconciled::Dropped);
        assert_eq!(state.update_tag(EntityId(55), NumericTag::Attack, 1), Reconciled::Dropped);
        assert_eq!(state.update_position(EntityId(56), 1), Reconciled::Dropped);
        assert_eq!(state.diagnostics().len(), 3);
    }

    #[test]
    fn test_start_game_resets() {
        let cat = catalog();
        let mut state = started();
        state.draw(&card("CS2_168"), EntityId(10), None, &cat);
        state.finish(Outcome::Won);
        assert!(state.is_ended());
        assert!(!state.is_started());

        state.start_game();

        assert!(state.is_started());
        assert!(!state.is_ended());
        assert!(state.entity(EntityId(10)).is_none());
        assert_eq!(state.self_player_number(), None);
        assert_eq!(state.turn(), None);
    }

    #[test]
    fn test_check_integrity_clean() {
        let cat = catalog();
        let mut state = started();
        state.draw(&card("CS2_168"), EntityId(10), None, &cat);
        state.play(Side::Opposing, &card("CS2_121"), EntityId(20), &cat).unwrap();
        state.send_to_graveyard(EntityId(20)).unwrap();

        assert!(state.check_integrity().is_ok());
        assert!(!state.is_desynced());
    }

    #[test]
    fn test_play_zone_entities_stay_live() {
        let cat = catalog();
        let mut state = started();
        state.begin_turn(Side::Friendly);

        state.play(Side::Friendly, &card("HERO_01"), EntityId(4), &cat).unwrap();
        state.play(Side::Friendly, &card("CS2_106"), EntityId(30), &cat).unwrap();
        state.draw(&card("CS2_168"), EntityId(10), None, &cat);
        state.update_zone(EntityId(10), Zone::Play).unwrap();

        for id in [4, 30, 10] {
            assert_eq!(state.entity(EntityId(id)).unwrap().zone, Zone::Play);
            assert!(state.is_live(EntityId(id)), "Entity({id}) should be live");
        }
        assert!(state.board(Side::Friendly).is_empty());
        assert!(state.check_integrity().is_ok());

        state.send_to_graveyard(EntityId(30)).unwrap();
        assert!(!state.is_live(EntityId(30)));
        assert!(state.check_integrity().is_ok());
    }

    #[test]
    fn test_opposing_cast_is_live_and_id_reuse_warns() {
        let cat = catalog();
        let mut state = started();

        assert_eq!(state.cast_spell(&card("GAME_005"), EntityId(70), &cat), Reconciled::Updated);
        assert!(state.is_live(EntityId(70)));
        assert_eq!(state.cast_spell(&card("GAME_005"), EntityId(70), &cat), Reconciled::Unchanged);

        let outcome = state.cast_spell(&card("CS2_168"), EntityId(70), &cat);
        assert_eq!(outcome, Reconciled::Dropped);
        assert_eq!(
            state.diagnostics(),
            &[Warning::DuplicateEntity { entity: EntityId(70) }]
        );
        assert_eq!(state.entity(EntityId(70)).unwrap().name, "The Coin");
    }

    #[test]
    fn test_desync_keeps_first_cause() {
        let cat = catalog();
        let mut state = started();
        assert!(state.ensure_synced().is_ok());

        let _ = state.change_controller(EntityId(77), 2);
        state.play(Side::Friendly, &card("CS2_168"), EntityId(13), &cat).unwrap();
        let _ = state.play(Side::Opposing, &card("CS2_168"), EntityId(13), &cat);

        assert_eq!(
            state.desync_cause(),
            Some(&IntegrityViolation::UnknownController { entity: EntityId(77) })
        );
        let err = state.ensure_synced().unwrap_err();
        assert!(matches!(
            err,
            TrackerError::Desynchronized {
                cause: IntegrityViolation::UnknownController { entity }
            } if entity == EntityId(77)
        ));
    }

    #[test]
    fn test_player_number_once() {
        let mut state = started();
        assert_eq!(state.set_player_number(2), Reconciled::Unchanged);
        assert_eq!(state.self_player_number(), Some(1));
        assert_eq!(state.side_of(2), Some(Side::Opposing));
    }
}
