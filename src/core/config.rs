//! Game configuration.
//!
//! A `GameConfig` fixes everything the engine needs before the first
//! turn: tick pacing, card cadence, the draw seed and the starting values
//! of the ledger and registry. It deserializes from JSON and has builder
//! methods for code-driven setup.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::capital::{CapitalRegistry, MAX_HEALTH};
use super::resource::{ResourceKind, ResourceLedger};

/// Default delay between turns.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 1000;

/// Default number of completed turns between card draws.
pub const DEFAULT_TURNS_PER_CARD: u32 = 3;

/// Complete game configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Delay between turns, in milliseconds.
    pub tick_interval_ms: u64,

    /// A card is drawn after every N completed turns. Zero disables cards.
    pub turns_per_card: u32,

    /// Draw seed. `None` seeds from entropy.
    pub seed: Option<u64>,

    /// Starting resource amounts. Kinds not listed start at zero.
    pub initial_resources: Vec<(ResourceKind, i64)>,

    /// Starting health for every capital.
    pub initial_health: f32,
}

impl GameConfig {
    /// Create a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the tick interval.
    #[must_use]
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Set the card cadence.
    #[must_use]
    pub fn with_turns_per_card(mut self, turns: u32) -> Self {
        self.turns_per_card = turns;
        self
    }

    /// Set the draw seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set a starting resource amount.
    #[must_use]
    pub fn with_resource(mut self, kind: ResourceKind, amount: i64) -> Self {
        self.initial_resources.retain(|(k, _)| *k != kind);
        self.initial_resources.push((kind, amount));
        self
    }

    /// Set the starting capital health.
    #[must_use]
    pub fn with_initial_health(mut self, health: f32) -> Self {
        self.initial_health = health;
        self
    }

    /// Tick interval as a `Duration`.
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Build the starting ledger.
    #[must_use]
    pub fn build_ledger(&self) -> ResourceLedger {
        ResourceLedger::with_amounts(self.initial_resources.iter().copied())
    }

    /// Build the starting registry.
    #[must_use]
    pub fn build_registry(&self) -> CapitalRegistry {
        CapitalRegistry::with_health(self.initial_health)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            turns_per_card: DEFAULT_TURNS_PER_CARD,
            seed: None,
            initial_resources: Vec::new(),
            initial_health: MAX_HEALTH,
        }
    }
}
