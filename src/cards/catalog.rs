//! Card catalog: decks of card definitions.
//!
//! The catalog is built once through `CatalogBuilder` and is read-only
//! afterwards. Decks keep their declaration order, which is the order the
//! card manager rotates through.
//!
//! Card ids must be unique within a deck. The builder rejects a second
//! card with an existing id instead of overwriting the first.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::definition::{CardData, DeckId};
use crate::core::{GameError, Result};

#[derive(Clone, Debug)]
struct Deck {
    id: DeckId,
    cards: Vec<Arc<CardData>>,
    index: FxHashMap<String, usize>,
}

impl Deck {
    fn new(id: DeckId) -> Self {
        Self {
            id,
            cards: Vec::new(),
            index: FxHashMap::default(),
        }
    }
}

/// Immutable catalog of decks.
///
/// ## Example
///
/// ```
/// use capital_ccg::cards::{CardCatalog, CardData, DeckId};
///
/// let mut builder = CardCatalog::builder();
/// builder.add_card(DeckId::harm(), CardData::new("drought", "Drought")).unwrap();
/// let catalog = builder.build();
///
/// let found = catalog.get(&DeckId::harm(), "drought").unwrap();
/// assert_eq!(found.title, "Drought");
/// assert!(catalog.all(&DeckId::progression()).is_empty());
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardCatalog {
    decks: Vec<Deck>,
    by_name: FxHashMap<DeckId, usize>,
}

impl CardCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Start building a catalog.
    #[must_use]
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    /// All cards in a deck, in insertion order. Empty for an unknown deck.
    #[must_use]
    pub fn all(&self, deck: &DeckId) -> &[Arc<CardData>] {
        self.deck(deck).map_or(&[], |d| d.cards.as_slice())
    }

    /// Look up a card by deck and id.
    #[must_use]
    pub fn get(&self, deck: &DeckId, id: &str) -> Option<&Arc<CardData>> {
        let deck = self.deck(deck)?;
        deck.index.get(id).map(|&i| &deck.cards[i])
    }

    /// Every deck with its cards, in declared order.
    pub fn decks(&self) -> impl Iterator<Item = (&DeckId, &[Arc<CardData>])> {
        self.decks.iter().map(|d| (&d.id, d.cards.as_slice()))
    }

    /// Deck names in declared order.
    pub fn deck_ids(&self) -> impl Iterator<Item = &DeckId> {
        self.decks.iter().map(|d| &d.id)
    }

    /// Number of decks, including empty ones.
    #[must_use]
    pub fn deck_count(&self) -> usize {
        self.decks.len()
    }

    /// Total number of cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.decks.iter().map(|d| d.cards.len()).sum()
    }

    /// Check if the catalog holds no cards.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn deck(&self, deck: &DeckId) -> Option<&Deck> {
        self.by_name.get(deck).map(|&i| &self.decks[i])
    }
}

/// Builder for `CardCatalog`.
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    catalog: CardCatalog,
}

impl CatalogBuilder {
    /// Declare a deck. Declaring an existing deck is a no-op.
    ///
    /// Decks are also declared implicitly by `add_card`; declare them
    /// up front to fix the rotation order or to keep an empty deck.
    pub fn declare_deck(&mut self, deck: DeckId) -> &mut Self {
        self.deck_index(deck);
        self
    }

    /// Add a card to a deck.
    ///
    /// Returns `DuplicateCardId` and leaves the deck unchanged if the deck
    /// already holds a card with this id.
    pub fn add_card(&mut self, deck: DeckId, card: CardData) -> Result<()> {
        let index = self.deck_index(deck);
        let deck = &mut self.catalog.decks[index];

        if deck.index.contains_key(&card.id) {
            return Err(GameError::DuplicateCardId {
                deck: deck.id.to_string(),
                id: card.id,
            });
        }

        deck.index.insert(card.id.clone(), deck.cards.len());
        deck.cards.push(Arc::new(card));
        Ok(())
    }

    /// Add every card to a deck, stopping at the first duplicate.
    pub fn add_cards(
        &mut self,
        deck: DeckId,
        cards: impl IntoIterator<Item = CardData>,
    ) -> Result<()> {
        for card in cards {
            self.add_card(deck.clone(), card)?;
        }
        Ok(())
    }

    /// Finish building.
    #[must_use]
    pub fn build(self) -> CardCatalog {
        self.catalog
    }

    fn deck_index(&mut self, deck: DeckId) -> usize {
        if let Some(&index) = self.catalog.by_name.get(&deck) {
            return index;
        }
        let index = self.catalog.decks.len();
        self.catalog.by_name.insert(deck.clone(), index);
        self.catalog.decks.push(Deck::new(deck));
        index
    }
}
