//! Card manager: deck rotation, draws and choice application.
//!
//! `draw_next` walks the catalog's decks in declared order, wrapping
//! around, and draws one card uniformly at random from the selected deck.
//! `draw_from` draws from a named deck without moving the rotation.
//!
//! Every draw computes the choices available against the live world and
//! publishes [`GameEvent::CardDrawn`]. `apply_choice` re-validates before
//! mutating and publishes [`GameEvent::ChoiceApplied`].

use std::sync::Arc;

use super::catalog::CardCatalog;
use super::definition::{CardChoice, CardData, DeckId};
use crate::core::{lock_world, GameError, GameRng, Result, SharedWorld};
use crate::effects::{ConditionContext, ConditionEvaluator, EffectResolver};
use crate::events::{EventBus, GameEvent};

/// A drawn card and the choices that were available when it was drawn.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawResult {
    /// Deck the card came from.
    pub deck: DeckId,
    /// The card.
    pub card: Arc<CardData>,
    /// Choices whose conditions held at draw time, in card order.
    pub available: Vec<CardChoice>,
}

impl DrawResult {
    /// Check if at least one choice can be taken.
    #[must_use]
    pub fn has_choices(&self) -> bool {
        !self.available.is_empty()
    }
}

/// Draws cards and applies choices against the shared world.
pub struct CardManager {
    catalog: Arc<CardCatalog>,
    world: SharedWorld,
    events: EventBus,
    rng: GameRng,
    rotation: Option<usize>,
}

impl CardManager {
    /// Create a manager. The rotation starts before the first deck.
    #[must_use]
    pub fn new(
        catalog: Arc<CardCatalog>,
        world: SharedWorld,
        events: EventBus,
        rng: GameRng,
    ) -> Self {
        Self {
            catalog,
            world,
            events,
            rng,
            rotation: None,
        }
    }

    /// The catalog being drawn from.
    #[must_use]
    pub fn catalog(&self) -> &CardCatalog {
        &self.catalog
    }

    /// Deck selected by the most recent `draw_next`.
    #[must_use]
    pub fn current_deck(&self) -> Option<&DeckId> {
        self.rotation.and_then(|i| self.catalog.deck_ids().nth(i))
    }

    /// Advance the rotation and draw from the deck it lands on.
    ///
    /// Returns `None` if the catalog has no decks or the deck is empty;
    /// the rotation still advances past an empty deck.
    pub fn draw_next(&mut self) -> Option<DrawResult> {
        let deck_count = self.catalog.deck_count();
        if deck_count == 0 {
            return None;
        }

        let next = self.rotation.map_or(0, |i| (i + 1) % deck_count);
        self.rotation = Some(next);

        let deck = self.catalog.deck_ids().nth(next)?.clone();
        self.draw_from(&deck)
    }

    /// Draw from a named deck. Does not touch the rotation.
    pub fn draw_from(&mut self, deck: &DeckId) -> Option<DrawResult> {
        let card = match self.rng.choose(self.catalog.all(deck)) {
            Some(card) => Arc::clone(card),
            None => {
                log::debug!("Deck '{deck}' has no cards to draw");
                return None;
            }
        };

        let available = self.available_choices(&card);
        log::debug!(
            "Drew '{}' from {deck}: {}/{} choices available",
            card.id,
            available.len(),
            card.choices.len()
        );

        let draw = DrawResult {
            deck: deck.clone(),
            card,
            available,
        };
        self.events.publish(&GameEvent::CardDrawn(draw.clone()));
        Some(draw)
    }

    /// Choices of a card whose conditions hold right now.
    #[must_use]
    pub fn available_choices(&self, card: &CardData) -> Vec<CardChoice> {
        let world = lock_world(&self.world);
        let ctx = ConditionContext::from(&*world);
        card.choices
            .iter()
            .filter(|choice| ConditionEvaluator::all_met(&choice.conditions, &ctx))
            .cloned()
            .collect()
    }

    /// Apply a choice of a card.
    ///
    /// Fails with `UnknownChoice` if the card does not offer it and with
    /// `ChoiceLocked` if its conditions no longer hold. Either way nothing
    /// is mutated.
    pub fn apply_choice(&self, card: &Arc<CardData>, choice: &CardChoice) -> Result<()> {
        if !card.offers(choice) {
            return Err(GameError::UnknownChoice {
                card_id: card.id.clone(),
                label: choice.label.clone(),
            });
        }

        let outcomes = {
            let mut world = lock_world(&self.world);
            EffectResolver::apply_choice(choice, &mut world)?
        };
        log::info!("Applied '{}' on card '{}': {:?}", choice.label, card.id, outcomes);

        self.events.publish(&GameEvent::ChoiceApplied {
            card: Arc::clone(card),
            choice: choice.clone(),
        });
        Ok(())
    }
}
