//! Card system: definitions, catalog, loaders and the card manager.
//!
//! ## Key Types
//!
//! - `CardData` / `CardChoice`: static card definitions
//! - `DeckId`: deck name; decks are drawn in rotation
//! - `CardCatalog`: read-only decks of cards, built once
//! - `CatalogLoader`: anything that can produce a catalog (JSON string,
//!   JSON directory, the builtin cards)
//! - `CardManager`: rotation, random draws and choice application

pub mod catalog;
pub mod definition;
pub mod loader;
pub mod manager;

pub use catalog::{CardCatalog, CatalogBuilder};
pub use definition::{CardChoice, CardData, DeckId};
pub use loader::{CatalogDocument, CatalogLoader, DeckDocument, JsonCatalogLoader, JsonDirLoader};
pub use manager::{CardManager, DrawResult};
