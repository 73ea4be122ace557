//! # capital-ccg
//!
//! Turn-resolution engine for a three-capital civilization card game.
//!
//! ## Design Principles
//!
//! 1. **One Writer**: The turn loop thread is the only thing that mutates
//!    the world. Production and choice application both run on it.
//!
//! 2. **Data-Driven Cards**: Cards, choices, conditions and effects are
//!    plain data loaded from JSON. Evaluation is an exhaustive `match`.
//!
//! 3. **Fail Closed**: Bad card files are skipped, missing references are
//!    logged no-ops, and a stop always releases every waiter.
//!
//! ## Architecture
//!
//! - **Turn Loop**: A background thread advances turns on a fixed tick.
//!   Each turn every capital produces into its resource.
//!
//! - **Card Decisions**: Every few turns the orchestrator pauses the loop,
//!   draws the next card in deck rotation and waits for the player's
//!   choice before resuming.
//!
//! - **Presentation Events**: `TurnStarted`, `TurnEnded`, `CardDrawn` and
//!   `ChoiceApplied` are published to observers on the loop thread.
//!
//! ## Modules
//!
//! - `core`: Resources, capitals, world, RNG, configuration, errors
//! - `cards`: Card definitions, catalog, loaders, card manager
//! - `effects`: Conditions, effects and their evaluation
//! - `events`: Event bus and observers
//! - `turns`: Turn scheduler
//! - `game`: Orchestrator, choice gate and the `Game` facade

pub mod cards;
pub mod core;
pub mod effects;
pub mod events;
pub mod game;
pub mod turns;

// Re-export commonly used types
pub use crate::core::{
    Capital, CapitalKind, CapitalRegistry, GameConfig, GameError, GameRng, GameWorld, Resource,
    ResourceKind, ResourceLedger, Result, SharedWorld, WorldSnapshot,
};

pub use crate::cards::{
    CardCatalog, CardChoice, CardData, CardManager, CatalogLoader, DeckId, DrawResult,
    JsonCatalogLoader, JsonDirLoader,
};

pub use crate::effects::{Condition, ConditionEvaluator, Effect, EffectResolver};

pub use crate::events::{EventBus, GameEvent, GameObserver};

pub use crate::turns::{SchedulerHandle, SchedulerState, TurnListener, TurnScheduler};

pub use crate::game::{ChoiceGate, ClaimedChoice, Game, GameOrchestrator};
