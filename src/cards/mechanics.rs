//! Mechanic tags carried by cards ("Taunt", "Charge", ...).
//!
//! The card database lists mechanics as free-form strings. The handful the
//! decision layer reasons about get their own variant; everything else is
//! kept verbatim in `Mechanic::Other` so nothing is lost on load.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// A single capability tag.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Mechanic {
    Taunt,
    Charge,
    Stealth,
    DivineShield,
    Windfury,
    Battlecry,
    Deathrattle,
    Other(String),
}

impl Mechanic {
    /// The database spelling of this tag.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Mechanic::Taunt => "Taunt",
            Mechanic::Charge => "Charge",
            Mechanic::Stealth => "Stealth",
            Mechanic::DivineShield => "Divine Shield",
            Mechanic::Windfury => "Windfury",
            Mechanic::Battlecry => "Battlecry",
            Mechanic::Deathrattle => "Deathrattle",
            Mechanic::Other(s) => s,
        }
    }
}

impl From<&str> for Mechanic {
    fn from(s: &str) -> Self {
        match s {
            "Taunt" => Mechanic::Taunt,
            "Charge" => Mechanic::Charge,
            "Stealth" => Mechanic::Stealth,
            "Divine Shield" => Mechanic::DivineShield,
            "Windfury" => Mechanic::Windfury,
            "Battlecry" => Mechanic::Battlecry,
            "Deathrattle" => Mechanic::Deathrattle,
            other => Mechanic::Other(other.to_string()),
        }
    }
}

impl From<String> for Mechanic {
    fn from(s: String) -> Self {
        Mechanic::from(s.as_str())
    }
}

impl From<Mechanic> for String {
    fn from(m: Mechanic) -> Self {
        m.as_str().to_string()
    }
}

impl std::fmt::Display for Mechanic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set of mechanics on one card. Most cards carry zero to two.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mechanics(SmallVec<[Mechanic; 2]>);

impl Mechanics {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check for a tag.
    #[must_use]
    pub fn has(&self, mechanic: &Mechanic) -> bool {
        self.0.contains(mechanic)
    }

    /// Add a tag (no duplicates).
    pub fn insert(&mut self, mechanic: Mechanic) {
        if !self.has(&mechanic) {
            self.0.push(mechanic);
        }
    }

    /// Iterate over the tags.
    pub fn iter(&self) -> impl Iterator<Item = &Mechanic> {
        self.0.iter()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<M: Into<Mechanic>> FromIterator<M> for Mechanics {
    fn from_iter<I: IntoIterator<Item = M>>(iter: I) -> Self {
        let mut set = Mechanics::new();
        for m in iter {
            set.insert(m.into());
        }
        set
    }
}
