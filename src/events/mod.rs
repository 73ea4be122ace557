//! Presentation events.
//!
//! The engine publishes four events for the front end:
//!
//! - [`GameEvent::TurnStarted`] / [`GameEvent::TurnEnded`] from the scheduler
//! - [`GameEvent::CardDrawn`] / [`GameEvent::ChoiceApplied`] from the card manager
//!
//! Events are delivered synchronously on the publishing thread, in
//! publication order. A `TurnEnded` is therefore always observed after
//! that turn's production step has finished.
//!
//! ## Example
//!
//! ```
//! use capital_ccg::events::{EventBus, GameEvent};
//!
//! let bus = EventBus::new();
//! let rx = bus.channel();
//!
//! bus.publish(&GameEvent::TurnStarted { turn: 1 });
//! assert_eq!(rx.try_recv().unwrap(), GameEvent::TurnStarted { turn: 1 });
//! ```

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use crate::cards::{CardChoice, CardData, DrawResult};

/// An event published to presentation observers.
#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    /// A turn began. Fired before production.
    TurnStarted { turn: u32 },
    /// A turn's production step finished.
    TurnEnded { turn: u32 },
    /// A card was drawn, with the choices available right now.
    CardDrawn(DrawResult),
    /// A choice's effects were applied.
    ChoiceApplied { card: Arc<CardData>, choice: CardChoice },
}

impl GameEvent {
    /// Turn number for turn events.
    #[must_use]
    pub fn turn(&self) -> Option<u32> {
        match self {
            GameEvent::TurnStarted { turn } | GameEvent::TurnEnded { turn } => Some(*turn),
            _ => None,
        }
    }
}

/// Receives published events.
///
/// Observers run on the publishing thread, usually the turn loop, so they
/// must return promptly and must not call back into the scheduler's
/// blocking operations.
pub trait GameObserver: Send + Sync {
    /// Called once per published event.
    fn on_event(&self, event: &GameEvent);
}

impl<F> GameObserver for F
where
    F: Fn(&GameEvent) + Send + Sync,
{
    fn on_event(&self, event: &GameEvent) {
        self(event);
    }
}

/// Forwards events into an mpsc channel.
pub struct ChannelObserver {
    tx: Mutex<Sender<GameEvent>>,
}

impl ChannelObserver {
    /// Create an observer and the receiving end of its channel.
    #[must_use]
    pub fn new() -> (Self, Receiver<GameEvent>) {
        let (tx, rx) = mpsc::channel();
        (Self { tx: Mutex::new(tx) }, rx)
    }
}

impl GameObserver for ChannelObserver {
    fn on_event(&self, event: &GameEvent) {
        let tx = self.tx.lock().unwrap_or_else(PoisonError::into_inner);
        // A dropped receiver just means nobody is listening any more.
        let _ = tx.send(event.clone());
    }
}

/// Subscriber list shared by every publisher in a session.
#[derive(Clone, Default)]
pub struct EventBus {
    observers: Arc<RwLock<Vec<Arc<dyn GameObserver>>>>,
}

impl EventBus {
    /// Create a bus with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer.
    pub fn subscribe(&self, observer: Arc<dyn GameObserver>) {
        self.observers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(observer);
    }

    /// Register a closure.
    pub fn subscribe_fn(&self, f: impl Fn(&GameEvent) + Send + Sync + 'static) {
        self.subscribe(Arc::new(f));
    }

    /// Register a channel and return its receiver.
    #[must_use]
    pub fn channel(&self) -> Receiver<GameEvent> {
        let (observer, rx) = ChannelObserver::new();
        self.subscribe(Arc::new(observer));
        rx
    }

    /// Number of subscribers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.observers.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Check if nobody is subscribed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Deliver an event to every observer, in subscription order.
    pub fn publish(&self, event: &GameEvent) {
        // Snapshot the list so observers may subscribe others without deadlocking.
        let observers = self
            .observers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for observer in observers {
            observer.on_event(event);
        }
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus").field("observers", &self.len()).finish()
    }
}
