//! Choice gate: hands a pending draw to the player and waits for a pick.
//!
//! The turn loop parks in `wait_for_choice` while the front end reads
//! `pending` and answers with `submit`. There is no timeout; `close`
//! releases the waiter and every later wait returns at once.
//!
//! The loop claims an answer as a [`ClaimedChoice`] and resolves it with
//! the apply result. A submitter on another thread blocks until then, so a
//! choice that became locked after the draw comes back as `ChoiceLocked`.
//!
//! The gate is also a `GameObserver`. Subscribed ahead of the front end,
//! it arms itself on `CardDrawn`, so an observer may answer straight from
//! the event even before the loop starts waiting. Such an answer is
//! accepted without waiting for the apply result.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, ThreadId};

use crate::cards::{CardChoice, DrawResult};
use crate::core::{GameError, Result};
use crate::events::{GameEvent, GameObserver};

#[derive(Debug, Default)]
struct GateState {
    pending: Option<DrawResult>,
    answered: Option<(DrawResult, CardChoice)>,
    /// Thread the pending draw was offered on.
    owner: Option<ThreadId>,
    /// A claimed answer is being applied.
    applying: bool,
    /// A submitter is blocked on the apply result.
    awaiting: bool,
    outcome: Option<Result<()>>,
    closed: bool,
}

/// Rendezvous between the turn loop and the player.
#[derive(Debug, Default)]
pub struct ChoiceGate {
    state: Mutex<GateState>,
    signal: Condvar,
}

/// An answer taken off the gate by the turn loop.
///
/// The blocked submitter is released when the claim is resolved. Dropping
/// it unresolved reports the choice as not applied.
#[derive(Debug)]
pub struct ClaimedChoice<'a> {
    gate: &'a ChoiceGate,
    choice: CardChoice,
    outcome: Option<Result<()>>,
}

impl ClaimedChoice<'_> {
    /// The submitted choice.
    #[must_use]
    pub fn choice(&self) -> &CardChoice {
        &self.choice
    }

    /// Hand the apply result to the submitter.
    pub fn resolve(mut self, outcome: Result<()>) {
        self.outcome = Some(outcome);
    }
}

impl Drop for ClaimedChoice<'_> {
    fn drop(&mut self) {
        self.gate.finish(self.outcome.take());
    }
}

impl ChoiceGate {
    /// Create an open gate with nothing pending.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, GateState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn wait<'a>(&self, state: MutexGuard<'a, GateState>) -> MutexGuard<'a, GateState> {
        self.signal.wait(state).unwrap_or_else(PoisonError::into_inner)
    }

    /// Make a draw answerable. Replaces anything pending or unclaimed.
    pub fn offer(&self, draw: DrawResult) {
        let mut state = self.lock();
        if state.closed {
            return;
        }
        state.pending = Some(draw);
        state.answered = None;
        state.owner = Some(thread::current().id());
        drop(state);
        self.signal.notify_all();
    }

    /// Block until the draw is answered and claim the answer.
    ///
    /// Offers the draw first unless it is already pending or answered.
    /// Returns `None` if the gate is closed before or during the wait.
    pub fn wait_for_choice(&self, draw: DrawResult) -> Option<ClaimedChoice<'_>> {
        let mut state = self.lock();
        if state.closed {
            return None;
        }

        let answered = matches!(&state.answered, Some((answered, _)) if *answered == draw);
        if !answered && state.pending.as_ref() != Some(&draw) {
            state.pending = Some(draw);
            state.answered = None;
        }
        state.owner = Some(thread::current().id());

        while state.answered.is_none() && !state.closed {
            state = self.wait(state);
        }

        state.pending = None;
        let answer = state.answered.take();
        let (_, choice) = answer.filter(|_| !state.closed)?;
        state.applying = true;
        Some(ClaimedChoice {
            gate: self,
            choice,
            outcome: None,
        })
    }

    fn finish(&self, outcome: Option<Result<()>>) {
        let mut state = self.lock();
        state.applying = false;
        if state.awaiting {
            state.outcome = outcome;
        }
        drop(state);
        self.signal.notify_all();
    }

    /// Answer the pending draw.
    ///
    /// Called off the thread that offered the draw, this blocks until the
    /// turn loop has applied the choice and returns its result, such as
    /// `ChoiceLocked` when the choice no longer holds. Returns `Ok(false)`
    /// if nothing is pending or the gate closed before the choice was
    /// applied, and `UnknownChoice` if the choice is not one of the pending
    /// draw's available choices.
    pub fn submit(&self, choice: CardChoice) -> Result<bool> {
        let mut state = self.lock();
        let Some(pending) = state.pending.take() else {
            return Ok(false);
        };

        if !pending.available.contains(&choice) {
            let err = GameError::UnknownChoice {
                card_id: pending.card.id.clone(),
                label: choice.label,
            };
            state.pending = Some(pending);
            return Err(err);
        }

        state.answered = Some((pending, choice));
        self.signal.notify_all();

        // The offering thread is the one that applies; it cannot wait on itself.
        if state.owner == Some(thread::current().id()) {
            return Ok(true);
        }

        state.awaiting = true;
        state.outcome = None;
        let result = loop {
            if let Some(outcome) = state.outcome.take() {
                break outcome.map(|()| true);
            }
            if !state.applying && (state.closed || state.answered.is_none()) {
                break Ok(false);
            }
            state = self.wait(state);
        };
        state.awaiting = false;
        result
    }

    /// Answer the pending draw by index into its available choices.
    ///
    /// Returns `Ok(false)` if nothing is pending or the index is out of range.
    pub fn submit_index(&self, index: usize) -> Result<bool> {
        let choice = {
            let state = self.lock();
            match state.pending.as_ref() {
                Some(pending) => pending.available.get(index).cloned(),
                None => return Ok(false),
            }
        };
        match choice {
            Some(choice) => self.submit(choice),
            None => Ok(false),
        }
    }

    /// The draw currently waiting for an answer.
    #[must_use]
    pub fn pending(&self) -> Option<DrawResult> {
        self.lock().pending.clone()
    }

    /// Release any waiter and refuse future waits.
    pub fn close(&self) {
        let mut state = self.lock();
        state.closed = true;
        state.pending = None;
        drop(state);
        self.signal.notify_all();
    }

    /// Check if the gate was closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }
}

impl GameObserver for ChoiceGate {
    fn on_event(&self, event: &GameEvent) {
        if let GameEvent::CardDrawn(draw) = event {
            if draw.has_choices() {
                self.offer(draw.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardData, DeckId};
    use std::sync::Arc;
    use std::thread::JoinHandle;
    use std::time::Duration;

    fn draw() -> DrawResult {
        let card = CardData::new("fire", "Fire")
            .with_choice(CardChoice::new("Rebuild"))
            .with_choice(CardChoice::new("Flee"));
        DrawResult {
            deck: DeckId::harm(),
            available: card.choices.clone(),
            card: Arc::new(card),
        }
    }

    /// Wait on another thread and resolve the claim with `outcome`.
    fn spawn_waiter(
        gate: &Arc<ChoiceGate>,
        outcome: fn(&CardChoice) -> Result<()>,
    ) -> JoinHandle<Option<CardChoice>> {
        let gate = Arc::clone(gate);
        thread::spawn(move || {
            let claim = gate.wait_for_choice(draw())?;
            let choice = claim.choice().clone();
            claim.resolve(outcome(&choice));
            Some(choice)
        })
    }

    fn applied(_: &CardChoice) -> Result<()> {
        Ok(())
    }

    fn wait_until_pending(gate: &ChoiceGate) {
        while gate.pending().is_none() {
            thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn test_submit_without_wait_is_noop() {
        let gate = ChoiceGate::new();
        assert!(!gate.submit(CardChoice::new("Rebuild")).unwrap());
        assert!(!gate.submit_index(0).unwrap());
    }

    #[test]
    fn test_submit_releases_waiter() {
        let gate = Arc::new(ChoiceGate::new());
        let waiter = spawn_waiter(&gate, applied);

        wait_until_pending(&gate);
        assert!(gate.submit(CardChoice::new("Flee")).unwrap());
        assert_eq!(waiter.join().unwrap(), Some(CardChoice::new("Flee")));
        assert!(gate.pending().is_none());

        // The answer was consumed; a second submit has nobody to reach.
        assert!(!gate.submit(CardChoice::new("Rebuild")).unwrap());
    }

    #[test]
    fn test_apply_error_reaches_submitter() {
        let gate = Arc::new(ChoiceGate::new());
        let waiter = spawn_waiter(&gate, |choice| {
            Err(GameError::ChoiceLocked {
                label: choice.label.clone(),
            })
        });

        wait_until_pending(&gate);
        let err = gate.submit(CardChoice::new("Rebuild")).unwrap_err();
        assert!(matches!(err, GameError::ChoiceLocked { ref label } if label == "Rebuild"));
        assert_eq!(waiter.join().unwrap(), Some(CardChoice::new("Rebuild")));
    }

    #[test]
    fn test_dropped_claim_reports_not_applied() {
        let gate = Arc::new(ChoiceGate::new());
        let waiter = {
            let gate = Arc::clone(&gate);
            thread::spawn(move || gate.wait_for_choice(draw()).is_some())
        };

        wait_until_pending(&gate);
        assert!(!gate.submit(CardChoice::new("Flee")).unwrap());
        assert!(waiter.join().unwrap());
    }

    #[test]
    fn test_answer_before_wait() {
        let gate = ChoiceGate::new();
        gate.on_event(&GameEvent::CardDrawn(draw()));

        // Answered on the offering thread, so nothing blocks.
        assert!(gate.submit_index(1).unwrap());
        let claim = gate.wait_for_choice(draw()).unwrap();
        assert_eq!(claim.choice(), &CardChoice::new("Flee"));
        claim.resolve(Ok(()));
    }

    #[test]
    fn test_draw_without_choices_not_offered() {
        let gate = ChoiceGate::new();
        let mut empty = draw();
        empty.available.clear();
        gate.on_event(&GameEvent::CardDrawn(empty));
        assert!(gate.pending().is_none());
    }

    #[test]
    fn test_unknown_choice_keeps_waiting() {
        let gate = Arc::new(ChoiceGate::new());
        let waiter = spawn_waiter(&gate, applied);

        wait_until_pending(&gate);
        let err = gate.submit(CardChoice::new("Pray")).unwrap_err();
        assert!(matches!(err, GameError::UnknownChoice { .. }));
        assert!(gate.pending().is_some());

        assert!(gate.submit_index(0).unwrap());
        assert_eq!(waiter.join().unwrap(), Some(CardChoice::new("Rebuild")));
    }

    #[test]
    fn test_close_cancels_wait() {
        let gate = Arc::new(ChoiceGate::new());
        let waiter = spawn_waiter(&gate, applied);

        wait_until_pending(&gate);
        gate.close();
        assert_eq!(waiter.join().unwrap(), None);
        assert!(gate.wait_for_choice(draw()).is_none());
        assert!(gate.is_closed());
    }
}
