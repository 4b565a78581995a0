//! Error and diagnostic types.
//!
//! Two tiers:
//! - `TrackerError`: surfaced to the caller. Integrity violations mean the
//!   reconstructed state no longer matches the client and must not be used
//!   for decisions.
//! - `Warning`: recoverable conditions (unknown ids, catalog misses). The
//!   update is dropped and the warning is kept in the match diagnostics.

use serde::{Deserialize, Serialize};

use super::entity::{EntityId, Zone};
use super::player::Side;
use crate::cards::{CardId, CatalogError};
use crate::effector::EffectorError;
use crate::zones::Location;

/// The reconciliation model has desynchronized from the client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntegrityViolation {
    /// An event placed an entity on one board while it sits on the other.
    BoardConflict {
        entity: EntityId,
        held_by: Side,
        claimed_by: Side,
    },
    /// A minion recorded in play is on neither board.
    MissingFromBoard {
        entity: EntityId,
        zone: Zone,
        expected: Side,
    },
    /// The entity's zone disagrees with the list that holds it.
    ZoneMismatch {
        entity: EntityId,
        recorded: Zone,
        listed: Location,
    },
    /// An entity is registered as both live and dead.
    LiveAndDead { entity: EntityId },
    /// The live set disagrees with the entity's zone.
    LiveSetMismatch { entity: EntityId, zone: Zone, live: bool },
    /// A controller change named an entity never registered.
    UnknownController { entity: EntityId },
    /// A list references an id missing from the entity registry.
    Orphan { entity: EntityId, listed: Location },
}

impl IntegrityViolation {
    /// The offending entity.
    #[must_use]
    pub fn entity(&self) -> EntityId {
        match self {
            IntegrityViolation::BoardConflict { entity, .. }
            | IntegrityViolation::MissingFromBoard { entity, .. }
            | IntegrityViolation::ZoneMismatch { entity, .. }
            | IntegrityViolation::LiveAndDead { entity }
            | IntegrityViolation::LiveSetMismatch { entity, .. }
            | IntegrityViolation::UnknownController { entity }
            | IntegrityViolation::Orphan { entity, .. } => *entity,
        }
    }
}

impl std::fmt::Display for IntegrityViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IntegrityViolation::BoardConflict {
                entity,
                held_by,
                claimed_by,
            } => write!(
                f,
                "{entity} is on the {held_by} board but was played to the {claimed_by} board"
            ),
            IntegrityViolation::MissingFromBoard {
                entity,
                zone,
                expected,
            } => write!(
                f,
                "{entity} is recorded in {zone} but is on neither board (expected {expected})"
            ),
            IntegrityViolation::ZoneMismatch {
                entity,
                recorded,
                listed,
            } => write!(f, "{entity} is recorded in {recorded} but listed in {listed}"),
            IntegrityViolation::LiveAndDead { entity } => {
                write!(f, "{entity} is registered both live and in GRAVEYARD")
            }
            IntegrityViolation::LiveSetMismatch { entity, zone, live } => {
                let registered = if *live { "registered" } else { "not registered" };
                write!(f, "{entity} is in {zone} but {registered} as live")
            }
            IntegrityViolation::UnknownController { entity } => {
                write!(f, "controller change for unknown {entity}")
            }
            IntegrityViolation::Orphan { entity, listed } => {
                write!(f, "{entity} is listed in {listed} but was never registered")
            }
        }
    }
}

/// Errors surfaced by the tracker.
#[derive(Debug)]
pub enum TrackerError {
    /// Fatal: the match state no longer reflects the client.
    Integrity(IntegrityViolation),
    /// A controller change named an entity the tracker has never seen.
    ControllerTargetMissing { entity: EntityId },
    /// A decision was requested after an integrity failure this match.
    /// Carries the first violation that desynchronized the state.
    Desynchronized { cause: IntegrityViolation },
    /// A planned action references an entity that is no longer where the
    /// plan expected it. Re-plan from the current state.
    StaleIntent { entity: EntityId },
    /// The card database could not be loaded.
    Catalog(CatalogError),
    /// The log source could not be read.
    Io(std::io::Error),
    /// A line pattern failed to compile (bad player name).
    Pattern(regex::Error),
    /// The effector could not submit a command.
    Effector(EffectorError),
}

impl TrackerError {
    /// True when the error invalidates the match state.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            TrackerError::Integrity(_)
                | TrackerError::ControllerTargetMissing { .. }
                | TrackerError::Desynchronized { .. }
        )
    }
}

impl std::fmt::Display for TrackerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrackerError::Integrity(violation) => write!(f, "integrity violation: {violation}"),
            TrackerError::ControllerTargetMissing { entity } => {
                write!(f, "controller change for unknown {entity}")
            }
            TrackerError::Desynchronized { cause } => write!(
                f,
                "match state desynchronized ({cause}); decisions halted until the next game"
            ),
            TrackerError::StaleIntent { entity } => {
                write!(f, "planned action references {entity}, which has moved")
            }
            TrackerError::Catalog(err) => write!(f, "card catalog: {err}"),
            TrackerError::Io(err) => write!(f, "log source: {err}"),
            TrackerError::Pattern(err) => write!(f, "line pattern: {err}"),
            TrackerError::Effector(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for TrackerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TrackerError::Catalog(err) => Some(err),
            TrackerError::Io(err) => Some(err),
            TrackerError::Pattern(err) => Some(err),
            TrackerError::Effector(err) => Some(err),
            _ => None,
        }
    }
}

impl From<IntegrityViolation> for TrackerError {
    fn from(violation: IntegrityViolation) -> Self {
        TrackerError::Integrity(violation)
    }
}

impl From<CatalogError> for TrackerError {
    fn from(err: CatalogError) -> Self {
        TrackerError::Catalog(err)
    }
}

impl From<regex::Error> for TrackerError {
    fn from(err: regex::Error) -> Self {
        TrackerError::Pattern(err)
    }
}

impl From<EffectorError> for TrackerError {
    fn from(err: EffectorError) -> Self {
        TrackerError::Effector(err)
    }
}

impl From<std::io::Error> for TrackerError {
    fn from(err: std::io::Error) -> Self {
        TrackerError::Io(err)
    }
}

/// A recoverable anomaly recorded while reconciling.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum Warning {
    /// An update referenced an id never seen; the update was dropped.
    UnknownEntity {
        entity: EntityId,
        update: &'static str,
    },
    /// The card database has no entry for this card; no entity was created.
    CatalogMiss { card: CardId, entity: EntityId },
    /// A catalog card had a type the tracker does not model; it was skipped.
    UnknownCardType { card: CardId, type_name: String },
    /// A new-entity event reused an id already registered.
    DuplicateEntity { entity: EntityId },
    /// A tag was applied to an entity variant that does not carry it.
    InapplicableTag { entity: EntityId, tag: &'static str },
    /// A side-dependent update arrived before the player slot was known.
    PlayerUnknown { entity: EntityId },
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Warning::UnknownEntity { entity, update } => {
                write!(f, "dropped {update} update for unknown {entity}")
            }
            Warning::CatalogMiss { card, entity } => {
                write!(f, "no catalog entry for {card}; {entity} not created")
            }
            Warning::UnknownCardType { card, type_name } => {
                write!(f, "skipped {card} of unknown type {type_name:?}")
            }
            Warning::DuplicateEntity { entity } => write!(f, "{entity} already registered"),
            Warning::InapplicableTag { entity, tag } => {
                write!(f, "{tag} does not apply to {entity}")
            }
            Warning::PlayerUnknown { entity } => {
                write!(f, "player slot unknown; dropped update for {entity}")
            }
        }
    }
}
