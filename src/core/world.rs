//! The mutable game world: resource ledger plus capital registry.
//!
//! Both live behind one lock (`SharedWorld`) so a production step or a
//! choice application sees and leaves a consistent pair. The turn loop is
//! the only writer; presentation code reads through `snapshot`.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

use super::capital::{Capital, CapitalRegistry};
use super::config::GameConfig;
use super::resource::{Resource, ResourceKind, ResourceLedger};

/// Ledger and registry for one session.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GameWorld {
    pub ledger: ResourceLedger,
    pub capitals: CapitalRegistry,
}

/// Shared handle to the world.
pub type SharedWorld = Arc<Mutex<GameWorld>>;

/// What one production step added.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProductionReport {
    pub produced: Vec<(ResourceKind, u64)>,
}

impl ProductionReport {
    /// Amount produced for a kind this step.
    #[must_use]
    pub fn amount(&self, kind: ResourceKind) -> u64 {
        self.produced
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, amount)| amount)
            .sum()
    }
}

/// Read-only copy of the world for display.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub resources: Vec<Resource>,
    pub capitals: Vec<Capital>,
}

impl GameWorld {
    /// Create a world from an existing ledger and registry.
    #[must_use]
    pub fn new(ledger: ResourceLedger, capitals: CapitalRegistry) -> Self {
        Self { ledger, capitals }
    }

    /// Create the starting world for a configuration.
    #[must_use]
    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.build_ledger(), config.build_registry())
    }

    /// Wrap into a shared handle.
    #[must_use]
    pub fn into_shared(self) -> SharedWorld {
        Arc::new(Mutex::new(self))
    }

    /// Run one production step: every capital adds its output to the
    /// matching resource.
    pub fn produce_turn(&mut self) -> ProductionReport {
        let mut report = ProductionReport::default();

        for capital in self.capitals.all() {
            let produced = capital.produce();
            match self.ledger.get_mut(capital.resource()) {
                Some(resource) => {
                    // `produce` is never negative, so `add` cannot reject it.
                    let delta = i64::try_from(produced).unwrap_or(i64::MAX);
                    if resource.add(delta).is_ok() {
                        report.produced.push((capital.resource(), produced));
                    }
                }
                None => log::warn!(
                    "Capital '{}' produces {} but the ledger has no such resource",
                    capital.name(),
                    capital.resource()
                ),
            }
        }

        report
    }

    /// Copy the current state for display.
    #[must_use]
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            resources: self.ledger.all().cloned().collect(),
            capitals: self.capitals.all().cloned().collect(),
        }
    }
}

/// Lock the shared world.
///
/// A panic while holding the lock cannot leave a half-applied mutation
/// (every write is a single-field update), so a poisoned lock is recovered.
pub fn lock_world(world: &SharedWorld) -> MutexGuard<'_, GameWorld> {
    world.lock().unwrap_or_else(PoisonError::into_inner)
}
