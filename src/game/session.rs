//! `Game`: one playable session wired from a `GameConfig`.
//!
//! ## Example
//!
//! ```no_run
//! use capital_ccg::cards::JsonCatalogLoader;
//! use capital_ccg::core::GameConfig;
//! use capital_ccg::events::GameEvent;
//! use capital_ccg::game::Game;
//!
//! let config = GameConfig::new().with_seed(7);
//! let mut game = Game::from_loader(config, &JsonCatalogLoader::builtin());
//! let events = game.events();
//! game.start().unwrap();
//!
//! for event in events {
//!     if let GameEvent::CardDrawn(draw) = event {
//!         if let Some(choice) = draw.available.first() {
//!             game.submit_choice(choice.clone()).unwrap();
//!         }
//!         break;
//!     }
//! }
//! game.stop().unwrap();
//! ```

use std::sync::mpsc::Receiver;
use std::sync::Arc;
use std::thread::JoinHandle;

use super::gate::ChoiceGate;
use super::orchestrator::GameOrchestrator;
use crate::cards::{CardCatalog, CardChoice, CardManager, CatalogLoader, DrawResult};
use crate::core::{
    lock_world, GameConfig, GameError, GameRng, GameWorld, Result, SharedWorld, WorldSnapshot,
};
use crate::events::{EventBus, GameEvent, GameObserver};
use crate::turns::{SchedulerHandle, SchedulerState, TurnScheduler};

/// A game session: world, catalog, turn loop and decision gate.
pub struct Game {
    config: GameConfig,
    world: SharedWorld,
    catalog: Arc<CardCatalog>,
    events: EventBus,
    gate: Arc<ChoiceGate>,
    scheduler: TurnScheduler,
    handle: SchedulerHandle,
    thread: Option<JoinHandle<Result<u32>>>,
}

impl Game {
    /// Build a session over a catalog.
    #[must_use]
    pub fn new(config: GameConfig, catalog: CardCatalog) -> Self {
        let world = GameWorld::from_config(&config).into_shared();
        let catalog = Arc::new(catalog);
        let events = EventBus::new();
        let gate = Arc::new(ChoiceGate::new());
        // First subscriber, so the gate is armed before anyone sees `CardDrawn`.
        let gate_observer: Arc<dyn GameObserver> = gate.clone();
        events.subscribe(gate_observer);

        let rng = GameRng::from_seed_or_entropy(config.seed);
        log::info!(
            "New game: {} cards in {} decks, seed {}",
            catalog.len(),
            catalog.deck_count(),
            rng.seed()
        );

        let cards = CardManager::new(Arc::clone(&catalog), Arc::clone(&world), events.clone(), rng);
        let orchestrator = GameOrchestrator::new(cards, Arc::clone(&gate), config.turns_per_card);
        let scheduler = TurnScheduler::new(Arc::clone(&world), events.clone())
            .with_listener(orchestrator);

        let handle = scheduler.handle();
        {
            let gate = Arc::clone(&gate);
            handle.on_stop(move || gate.close());
        }

        Self {
            config,
            world,
            catalog,
            events,
            gate,
            scheduler,
            handle,
            thread: None,
        }
    }

    /// Build a session from a loader.
    ///
    /// A loader error is logged and the game runs with an empty catalog.
    #[must_use]
    pub fn from_loader(config: GameConfig, loader: &dyn CatalogLoader) -> Self {
        let catalog = loader.build_catalog().unwrap_or_else(|e| {
            log::error!("Failed to load cards, continuing without any: {e}");
            CardCatalog::empty()
        });
        Self::new(config, catalog)
    }

    /// Start the turn loop in the background.
    pub fn start(&mut self) -> Result<()> {
        let thread = self.scheduler.start(self.config.tick_interval())?;
        self.thread = Some(thread);
        Ok(())
    }

    /// Stop the turn loop, cancel any pending choice and wait for the loop
    /// to exit. Returns the last turn started.
    pub fn stop(&mut self) -> Result<u32> {
        self.handle.stop();
        match self.thread.take() {
            Some(thread) => thread.join().map_err(|_| GameError::ThreadPanicked)?,
            None => Ok(self.handle.current_turn()),
        }
    }

    /// Pause the turn loop.
    pub fn pause(&self) -> bool {
        self.handle.pause()
    }

    /// Resume the turn loop.
    pub fn resume(&self) -> bool {
        self.handle.resume()
    }

    /// Answer the pending card.
    ///
    /// Blocks until the turn loop has applied the choice, then returns its
    /// result: `ChoiceLocked` if the choice no longer holds against the
    /// world. Returns `Ok(false)` when no card is waiting or the game stopped
    /// first. Answering from an observer on the loop thread does not block.
    pub fn submit_choice(&self, choice: CardChoice) -> Result<bool> {
        self.gate.submit(choice)
    }

    /// Answer the pending card by index into its available choices.
    ///
    /// Blocks like [`Game::submit_choice`].
    pub fn submit_choice_index(&self, index: usize) -> Result<bool> {
        self.gate.submit_index(index)
    }

    /// The card waiting for a choice, if any.
    #[must_use]
    pub fn pending_draw(&self) -> Option<DrawResult> {
        self.gate.pending()
    }

    /// Copy of the resources and capitals.
    #[must_use]
    pub fn snapshot(&self) -> WorldSnapshot {
        lock_world(&self.world).snapshot()
    }

    /// Register an observer.
    pub fn subscribe(&self, observer: Arc<dyn GameObserver>) {
        self.events.subscribe(observer);
    }

    /// Register a channel for every future event.
    #[must_use]
    pub fn events(&self) -> Receiver<GameEvent> {
        self.events.channel()
    }

    /// Handle to the scheduler, for control from other threads.
    #[must_use]
    pub fn scheduler(&self) -> SchedulerHandle {
        self.handle.clone()
    }

    /// Scheduler state.
    #[must_use]
    pub fn state(&self) -> SchedulerState {
        self.handle.state()
    }

    /// Last turn started.
    #[must_use]
    pub fn current_turn(&self) -> u32 {
        self.handle.current_turn()
    }

    /// The card catalog.
    #[must_use]
    pub fn catalog(&self) -> &CardCatalog {
        &self.catalog
    }

    /// The session configuration.
    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }
}

impl Drop for Game {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            log::error!("Turn loop ended with an error: {e}");
        }
    }
}
