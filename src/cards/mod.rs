//! Card system: definitions, entities, and the reference catalog.
//!
//! ## Key Types
//!
//! - `CardId`: Catalog identifier shared by every copy of a card
//! - `CardDefinition`: Static card data from the database
//! - `Entity`: Runtime state of one copy in a match
//! - `Catalog`: Card definition lookup

pub mod definition;
pub mod instance;
pub mod mechanics;
pub mod registry;

pub use definition::{CardDefinition, CardId, CardType};
pub use instance::{Entity, EntityKind, NumericTag};
pub use mechanics::{Mechanic, Mechanics};
pub use registry::{Catalog, CatalogError};
