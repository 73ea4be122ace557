//! Catalog loaders.
//!
//! A loader's only contract is to produce a `CardCatalog` before the
//! first turn. Card files are JSON documents listing decks:
//!
//! ```json
//! { "decks": [ { "name": "Harm", "cards": [
//!     { "id": "drought", "title": "Drought",
//!       "choices": [ { "label": "Ration",
//!         "effects": [ { "type": "Resource", "kind": "Food", "amount": -5 } ] } ] }
//! ] } ] }
//! ```
//!
//! Loading fails closed. A missing card directory yields an empty
//! catalog, an unreadable or malformed file is skipped, and a card whose
//! id already exists in its deck is rejected while the first definition
//! stays. Each of these is logged.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::catalog::{CardCatalog, CatalogBuilder};
use super::definition::{CardData, DeckId};
use crate::core::{GameError, Result};

/// Cards shipped with the crate.
const BUILTIN_CARDS: &str = include_str!("../../cards/default.json");

/// One card file.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CatalogDocument {
    #[serde(default)]
    pub decks: Vec<DeckDocument>,
}

/// One deck inside a card file.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeckDocument {
    pub name: DeckId,
    #[serde(default)]
    pub cards: Vec<CardData>,
}

/// Source of card definitions.
pub trait CatalogLoader {
    /// Build the catalog. Called once, before the turn loop starts.
    fn build_catalog(&self) -> Result<CardCatalog>;
}

/// Loads a catalog from one JSON string.
#[derive(Clone, Debug)]
pub struct JsonCatalogLoader {
    source: String,
}

impl JsonCatalogLoader {
    /// Create a loader over a JSON document.
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// Loader over the cards shipped with the crate.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(BUILTIN_CARDS)
    }
}

impl CatalogLoader for JsonCatalogLoader {
    /// A malformed document is an error here; there is no other file to
    /// fall back on.
    fn build_catalog(&self) -> Result<CardCatalog> {
        let document: CatalogDocument = serde_json::from_str(&self.source)?;
        let mut builder = CardCatalog::builder();
        merge_document(&mut builder, document, "<inline>");
        let catalog = builder.build();
        log::info!("Loaded {} cards in {} decks", catalog.len(), catalog.deck_count());
        Ok(catalog)
    }
}

/// Loads every `*.json` file in a directory, in file-name order.
#[derive(Clone, Debug)]
pub struct JsonDirLoader {
    dir: PathBuf,
}

impl JsonDirLoader {
    /// Create a loader over a card directory.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn card_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}

impl CatalogLoader for JsonDirLoader {
    fn build_catalog(&self) -> Result<CardCatalog> {
        if !self.dir.is_dir() {
            log::warn!("Cards folder not found: {}", self.dir.display());
            return Ok(CardCatalog::empty());
        }

        let mut builder = CardCatalog::builder();
        for path in self.card_files()? {
            match read_document(&path) {
                Ok(document) => merge_document(&mut builder, document, &path.display().to_string()),
                Err(e) => log::error!("Failed to load cards from {}: {}", path.display(), e),
            }
        }

        let catalog = builder.build();
        log::info!(
            "Loaded {} cards in {} decks from {}",
            catalog.len(),
            catalog.deck_count(),
            self.dir.display()
        );
        Ok(catalog)
    }
}

fn read_document(path: &Path) -> Result<CatalogDocument> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

fn merge_document(builder: &mut CatalogBuilder, document: CatalogDocument, source: &str) {
    for deck in document.decks {
        builder.declare_deck(deck.name.clone());
        for card in deck.cards {
            match builder.add_card(deck.name.clone(), card) {
                Ok(()) => {}
                Err(e @ GameError::DuplicateCardId { .. }) => {
                    log::warn!("{e} in {source}; keeping the first definition");
                }
                Err(e) => log::error!("Rejected card in {source}: {e}"),
            }
        }
    }
}
