//! Zone manager for entity list membership.
//!
//! The `ZoneManager` is the single index of which ordered list (a hand, a
//! board, or the graveyard) holds each entity. An entity is in at most one
//! list at a time by construction: moving it removes it from wherever it
//! was, so no stale reference survives a zone change.
//!
//! Entities that are tracked but not listed (heroes, hero powers, weapons,
//! resolved spells) simply have no location here.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::entity::EntityId;
use crate::core::player::Side;

/// An ordered list an entity can belong to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Location {
    Hand(Side),
    Board(Side),
    Graveyard,
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Location::Hand(side) => write!(f, "{side} HAND"),
            Location::Board(side) => write!(f, "{side} BOARD"),
            Location::Graveyard => f.write_str("GRAVEYARD"),
        }
    }
}

/// Tracks list membership and log-observed order.
///
/// ## Usage
///
/// ```
/// use hearth_tracker::zones::{Location, ZoneManager};
/// use hearth_tracker::core::{EntityId, Side};
///
/// let mut zones = ZoneManager::new();
/// let hand = Location::Hand(Side::Friendly);
/// let board = Location::Board(Side::Friendly);
///
/// zones.move_to(EntityId(10), hand);
/// zones.move_to(EntityId(11), hand);
/// assert_eq!(zones.entities_in(hand), &[EntityId(10), EntityId(11)]);
///
/// // Playing a card moves it; it is never in two lists.
/// assert_eq!(zones.move_to(EntityId(10), board), Some(hand));
/// assert_eq!(zones.entities_in(hand), &[EntityId(11)]);
/// assert_eq!(zones.location(EntityId(10)), Some(board));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ZoneManager {
    /// Entity locations: entity_id -> list.
    locations: FxHashMap<EntityId, Location>,

    /// Ordered members of each list, in the order the log reported them.
    order: FxHashMap<Location, Vec<EntityId>>,
}

impl ZoneManager {
    /// Create a new empty zone manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entity to a list, removing it from its previous list.
    ///
    /// Returns the previous location, if any. Moving an entity to the list
    /// it already occupies keeps its place.
    pub fn move_to(&mut self, entity: EntityId, location: Location) -> Option<Location> {
        let previous = self.locations.insert(entity, location);

        if previous == Some(location) {
            return previous;
        }

        if let Some(old) = previous {
            if let Some(order) = self.order.get_mut(&old) {
                order.retain(|&e| e != entity);
            }
        }

        self.order.entry(location).or_default().push(entity);
        previous
    }

    /// Remove an entity from whatever list holds it.
    ///
    /// Returns the list it was in, or `None` if it was unlisted.
    pub fn remove(&mut self, entity: EntityId) -> Option<Location> {
        let location = self.locations.remove(&entity)?;

        if let Some(order) = self.order.get_mut(&location) {
            order.retain(|&e| e != entity);
        }

        Some(location)
    }

    /// Get the list an entity is in.
    #[must_use]
    pub fn location(&self, entity: EntityId) -> Option<Location> {
        self.locations.get(&entity).copied()
    }

    /// Check if an entity is in a specific list.
    #[must_use]
    pub fn is_in(&self, entity: EntityId, location: Location) -> bool {
        self.locations.get(&entity) == Some(&location)
    }

    /// The board holding an entity, if any.
    #[must_use]
    pub fn board_of(&self, entity: EntityId) -> Option<Side> {
        match self.location(entity)? {
            Location::Board(side) => Some(side),
            _ => None,
        }
    }

    /// Members of a list, in log order.
    #[must_use]
    pub fn entities_in(&self, location: Location) -> &[EntityId] {
        self.order.get(&location).map_or(&[], |v| v.as_slice())
    }

    /// Index of an entity within its list.
    #[must_use]
    pub fn index_in(&self, entity: EntityId, location: Location) -> Option<usize> {
        self.entities_in(location).iter().position(|&e| e == entity)
    }

    /// Number of entities in a list.
    #[must_use]
    pub fn len(&self, location: Location) -> usize {
        self.entities_in(location).len()
    }

    /// Total number of listed entities.
    #[must_use]
    pub fn total(&self) -> usize {
        self.locations.len()
    }

    /// Check if an entity is listed anywhere.
    #[must_use]
    pub fn contains(&self, entity: EntityId) -> bool {
        self.locations.contains_key(&entity)
    }

    /// Iterate over (entity, location) pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, Location)> + '_ {
        self.locations.iter().map(|(&e, &l)| (e, l))
    }

    /// Forget everything.
    pub fn clear(&mut self) {
        self.locations.clear();
        self.order.clear();
    }
}
