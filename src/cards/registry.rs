//! Card catalog for definition lookup.
//!
//! The `Catalog` stores every card definition from the reference database
//! and provides O(1) lookup by `CardId`. It is loaded once and shared
//! read-only (behind an `Arc`) by the classifier.

use std::path::Path;

use rustc_hash::FxHashMap;
use serde::Deserialize;
use tracing::{debug, warn};

use super::definition::{CardDefinition, CardId, CardType};
use super::mechanics::Mechanics;
use crate::core::error::Warning;

/// Failure to load the card database.
#[derive(Debug)]
pub enum CatalogError {
    /// The file could not be read.
    Io {
        path: String,
        source: std::io::Error,
    },
    /// The contents are not valid JSON for a card list.
    Json(serde_json::Error),
    /// Valid JSON, but neither a set map nor a card array.
    Shape(&'static str),
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::Io { path, source } => write!(f, "cannot read {path}: {source}"),
            CatalogError::Json(err) => write!(f, "malformed card data: {err}"),
            CatalogError::Shape(what) => write!(f, "unexpected card data layout: {what}"),
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogError::Io { source, .. } => Some(source),
            CatalogError::Json(err) => Some(err),
            CatalogError::Shape(_) => None,
        }
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::Json(err)
    }
}

/// One card object as it appears in the database file.
#[derive(Deserialize)]
struct RawCard {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(rename = "type")]
    card_type: String,
    #[serde(default)]
    cost: i32,
    #[serde(default)]
    attack: i32,
    #[serde(default)]
    health: i32,
    #[serde(default)]
    durability: i32,
    #[serde(default)]
    mechanics: Mechanics,
}

/// Reference card database.
///
/// ## Example
///
/// ```
/// use hearth_tracker::cards::{Catalog, CardId, CardType};
///
/// let catalog = Catalog::from_json_str(r#"{
///     "Basic": [
///         {"id": "CS2_168", "name": "Murloc Raider", "type": "Minion",
///          "cost": 1, "attack": 2, "health": 1}
///     ]
/// }"#).unwrap();
///
/// let raider = catalog.get(&CardId::from("CS2_168")).unwrap();
/// assert_eq!(raider.card_type, CardType::Minion);
/// assert_eq!(raider.attack, 2);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    cards: FxHashMap<CardId, CardDefinition>,
    skipped: Vec<Warning>,
}

impl Catalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read and parse a database file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let catalog = Self::from_json_str(&text)?;
        debug!(path = %path.display(), cards = catalog.len(), "loaded card catalog");
        Ok(catalog)
    }

    /// Parse a database from JSON text.
    ///
    /// Accepts either an object mapping set names to card arrays or a flat
    /// card array. Cards of an unrecognized type are skipped.
    pub fn from_json_str(text: &str) -> Result<Self, CatalogError> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        let mut catalog = Catalog::new();

        match value {
            serde_json::Value::Array(cards) => catalog.ingest(cards)?,
            serde_json::Value::Object(sets) => {
                for (_set, cards) in sets {
                    match cards {
                        serde_json::Value::Array(cards) => catalog.ingest(cards)?,
                        _ => return Err(CatalogError::Shape("set entry is not an array")),
                    }
                }
            }
            _ => return Err(CatalogError::Shape("expected an object or an array")),
        }

        Ok(catalog)
    }

    fn ingest(&mut self, cards: Vec<serde_json::Value>) -> Result<(), CatalogError> {
        for value in cards {
            let raw: RawCard = serde_json::from_value(value)?;
            let Some(card_type) = CardType::parse(&raw.card_type) else {
                warn!(card = %raw.id, kind = %raw.card_type, "skipping card of unknown type");
                self.skipped.push(Warning::UnknownCardType {
                    card: CardId::new(raw.id),
                    type_name: raw.card_type,
                });
                continue;
            };

            let definition = CardDefinition {
                id: CardId::new(raw.id),
                name: raw.name,
                card_type,
                cost: raw.cost,
                attack: raw.attack,
                health: raw.health,
                durability: raw.durability,
                mechanics: raw.mechanics,
            };
            self.register(definition);
        }
        Ok(())
    }

    /// Register a card definition. A duplicate id keeps the first entry.
    ///
    /// Returns whether the card was added.
    pub fn register(&mut self, card: CardDefinition) -> bool {
        if self.cards.contains_key(&card.id) {
            debug!(card = %card.id, "duplicate catalog entry ignored");
            return false;
        }
        self.cards.insert(card.id.clone(), card);
        true
    }

    /// Get a card definition by ID.
    #[must_use]
    pub fn get(&self, id: &CardId) -> Option<&CardDefinition> {
        self.cards.get(id)
    }

    /// Check if a card ID is known.
    #[must_use]
    pub fn contains(&self, id: &CardId) -> bool {
        self.cards.contains_key(id)
    }

    /// Get the number of cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate over all card definitions.
    pub fn iter(&self) -> impl Iterator<Item = &CardDefinition> {
        self.cards.values()
    }

    /// Cards dropped during loading.
    #[must_use]
    pub fn skipped(&self) -> &[Warning] {
        &self.skipped
    }
}

impl FromIterator<CardDefinition> for Catalog {
    fn from_iter<I: IntoIterator<Item = CardDefinition>>(iter: I) -> Self {
        let mut catalog = Catalog::new();
        for card in iter {
            catalog.register(card);
        }
        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Mechanic;

    const SETS: &str = r#"{
        "Basic": [
            {"id": "CS2_121", "name": "Frostwolf Grunt", "type": "Minion",
             "cost": 2, "attack": 2, "health": 2, "mechanics": ["Taunt"]},
            {"id": "CS2_106", "name": "Fiery War Axe", "type": "Weapon",
             "cost": 2, "attack": 3, "durability": 2}
        ],
        "Debug": [
            {"id": "XXX_001", "name": "Dev Thing", "type": "Playtest"}
        ],
        "Missions": []
    }"#;

    #[test]
    fn test_load_set_map() {
        let catalog = Catalog::from_json_str(SETS).unwrap();

        assert_eq!(catalog.len(), 2);
        let grunt = catalog.get(&CardId::from("CS2_121")).unwrap();
        assert_eq!(grunt.name, "Frostwolf Grunt");
        assert!(grunt.mechanics.has(&Mechanic::Taunt));

        let axe = catalog.get(&CardId::from("CS2_106")).unwrap();
        assert_eq!(axe.card_type, CardType::Weapon);
        assert_eq!(axe.durability, 2);
        assert_eq!(axe.health, 0);
    }

    #[test]
    fn test_unknown_type_skipped() {
        let catalog = Catalog::from_json_str(SETS).unwrap();

        assert!(!catalog.contains(&CardId::from("XXX_001")));
        assert_eq!(catalog.skipped().len(), 1);
    }

    #[test]
    fn test_flat_array() {
        let catalog = Catalog::from_json_str(
            r#"[{"id": "GAME_005", "name": "The Coin", "type": "Spell"}]"#,
        )
        .unwrap();

        let coin = catalog.get(&CardId::from("GAME_005")).unwrap();
        assert_eq!(coin.cost, 0);
        assert_eq!(coin.card_type, CardType::Spell);
    }

    #[test]
    fn test_hero_power_type() {
        let catalog = Catalog::from_json_str(
            r#"[{"id": "CS2_102", "name": "Armor Up!", "type": "Hero Power", "cost": 2}]"#,
        )
        .unwrap();
        assert_eq!(
            catalog.get(&CardId::from("CS2_102")).unwrap().card_type,
            CardType::HeroPower
        );
    }

    #[test]
    fn test_duplicate_keeps_first() {
        let catalog: Catalog = [
            CardDefinition::new("A", "First", CardType::Minion),
            CardDefinition::new("A", "Second", CardType::Minion),
        ]
        .into_iter()
        .collect();

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(&CardId::from("A")).unwrap().name, "First");
    }

    #[test]
    fn test_bad_shape() {
        assert!(matches!(
            Catalog::from_json_str("42"),
            Err(CatalogError::Shape(_))
        ));
        assert!(matches!(
            Catalog::from_json_str(r#"{"Basic": 1}"#),
            Err(CatalogError::Shape(_))
        ));
        assert!(matches!(
            Catalog::from_json_str("{not json"),
            Err(CatalogError::Json(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = Catalog::load("/nonexistent/AllSets.json").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/AllSets.json"));
    }
}
