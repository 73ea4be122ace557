//! Game orchestrator: turns the turn loop into card decisions.
//!
//! Every `turns_per_card` completed turns the orchestrator pauses the
//! scheduler, draws the next card in rotation and, if any choice is
//! available, waits on the `ChoiceGate` for the player's pick. The choice is
//! applied and the result handed back to the submitter. It runs inline on
//! the loop thread as a `TurnListener`, so no turn can advance while a
//! decision is pending.
//!
//! The pause is held by a guard. The scheduler is resumed exactly once
//! when the guard drops, whether the card resolved, had no available
//! choices, failed to apply, or the wait was cancelled by a stop.

use std::sync::Arc;

use super::gate::ChoiceGate;
use crate::cards::CardManager;
use crate::core::Result;
use crate::turns::{SchedulerHandle, TurnListener};

/// Pauses the scheduler for its lifetime.
struct PauseGuard<'a> {
    scheduler: &'a SchedulerHandle,
}

impl<'a> PauseGuard<'a> {
    fn engage(scheduler: &'a SchedulerHandle) -> Self {
        scheduler.pause();
        Self { scheduler }
    }
}

impl Drop for PauseGuard<'_> {
    fn drop(&mut self) {
        // No-op once stopped.
        self.scheduler.resume();
    }
}

/// Draws a card every few turns and applies the player's choice.
pub struct GameOrchestrator {
    cards: CardManager,
    gate: Arc<ChoiceGate>,
    turns_per_card: u32,
}

impl GameOrchestrator {
    /// Create an orchestrator.
    ///
    /// A `turns_per_card` of 0 never draws.
    #[must_use]
    pub fn new(cards: CardManager, gate: Arc<ChoiceGate>, turns_per_card: u32) -> Self {
        Self {
            cards,
            gate,
            turns_per_card,
        }
    }

    /// Check if a card is due after this turn.
    #[must_use]
    pub fn is_card_turn(&self, turn: u32) -> bool {
        self.turns_per_card > 0 && turn > 0 && turn % self.turns_per_card == 0
    }

    fn resolve_card(&mut self, turn: u32) {
        let Some(draw) = self.cards.draw_next() else {
            log::debug!("Turn {turn}: no card to draw");
            return;
        };

        if !draw.has_choices() {
            log::info!(
                "Turn {turn}: '{}' has no available choices, skipping",
                draw.card.id
            );
            return;
        }

        let card = Arc::clone(&draw.card);
        log::info!("Turn {turn}: waiting for a choice on '{}'", card.id);
        let Some(claim) = self.gate.wait_for_choice(draw) else {
            log::info!("Turn {turn}: choice on '{}' cancelled", card.id);
            return;
        };

        let outcome = self.cards.apply_choice(&card, claim.choice());
        if let Err(e) = &outcome {
            log::warn!("Turn {turn}: {e}");
        }
        claim.resolve(outcome);
    }
}

impl TurnListener for GameOrchestrator {
    fn on_turn_ended(&mut self, turn: u32, scheduler: &SchedulerHandle) -> Result<()> {
        if !self.is_card_turn(turn) || scheduler.is_stopped() {
            return Ok(());
        }

        let _pause = PauseGuard::engage(scheduler);
        self.resolve_card(turn);
        Ok(())
    }
}
