//! Capitals and the capital registry.
//!
//! A capital is one entity type parameterized by a `CapitalConfig`
//! preset. The three presets are reached through `CapitalKind::config`.
//!
//! Health is always in `[0, 100]`: `modify_health` clamps any delta.
//! Output per turn is `floor(production_rate * health / 100)`.

use serde::{Deserialize, Serialize};

use super::resource::ResourceKind;

/// Upper bound of capital health.
pub const MAX_HEALTH: f32 = 100.0;

/// The three capital presets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CapitalKind {
    Government,
    Population,
    Military,
}

impl CapitalKind {
    /// All kinds in registry order.
    pub const ALL: [CapitalKind; 3] = [
        CapitalKind::Government,
        CapitalKind::Population,
        CapitalKind::Military,
    ];

    /// The fixed configuration for this kind.
    #[must_use]
    pub const fn config(self) -> CapitalConfig {
        match self {
            CapitalKind::Government => CapitalConfig {
                name: "Government",
                resource: ResourceKind::Money,
                base_rate: 10.0,
            },
            CapitalKind::Population => CapitalConfig {
                name: "Population",
                resource: ResourceKind::Food,
                base_rate: 8.0,
            },
            CapitalKind::Military => CapitalConfig {
                name: "Military",
                resource: ResourceKind::Power,
                base_rate: 6.0,
            },
        }
    }

    /// Registry name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        self.config().name
    }
}

impl std::fmt::Display for CapitalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Fixed parameters of a capital preset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CapitalConfig {
    /// Unique registry name.
    pub name: &'static str,
    /// Resource produced each turn.
    pub resource: ResourceKind,
    /// Output per turn at full health.
    pub base_rate: f32,
}

/// A named producer of one resource kind.
///
/// ```
/// use capital_ccg::core::{Capital, CapitalKind};
///
/// let mut government = Capital::new(CapitalKind::Government);
/// assert_eq!(government.produce(), 10);
///
/// government.modify_health(-150.0);
/// assert_eq!(government.health(), 0.0);
/// assert_eq!(government.produce(), 0);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Capital {
    kind: CapitalKind,
    name: String,
    resource: ResourceKind,
    health: f32,
    production_rate: f32,
}

impl Capital {
    /// Create a capital at full health.
    #[must_use]
    pub fn new(kind: CapitalKind) -> Self {
        Self::with_health(kind, MAX_HEALTH)
    }

    /// Create a capital with a given initial health (clamped).
    #[must_use]
    pub fn with_health(kind: CapitalKind, health: f32) -> Self {
        let config = kind.config();
        let mut capital = Self {
            kind,
            name: config.name.to_string(),
            resource: config.resource,
            health: MAX_HEALTH,
            production_rate: config.base_rate,
        };
        capital.health = clamp_health(health).unwrap_or(MAX_HEALTH);
        capital
    }

    /// Preset this capital was built from.
    #[must_use]
    pub const fn kind(&self) -> CapitalKind {
        self.kind
    }

    /// Unique name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resource this capital produces.
    #[must_use]
    pub const fn resource(&self) -> ResourceKind {
        self.resource
    }

    /// Current health in `[0, 100]`.
    #[must_use]
    pub const fn health(&self) -> f32 {
        self.health
    }

    /// Output per turn at full health.
    #[must_use]
    pub const fn production_rate(&self) -> f32 {
        self.production_rate
    }

    /// This turn's output. Does not mutate.
    #[must_use]
    pub fn produce(&self) -> u64 {
        let output = (self.production_rate * (self.health / MAX_HEALTH)).floor();
        // Both factors are non-negative and bounded, so the cast cannot wrap.
        output.max(0.0) as u64
    }

    /// Add `delta` to health, clamped into `[0, 100]`. NaN is ignored.
    pub fn modify_health(&mut self, delta: f32) {
        if let Some(health) = clamp_health(self.health + delta) {
            self.health = health;
        }
    }
}

fn clamp_health(value: f32) -> Option<f32> {
    if value.is_nan() {
        None
    } else {
        Some(value.clamp(0.0, MAX_HEALTH))
    }
}

/// Registry of capitals, keyed by name.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CapitalRegistry {
    capitals: Vec<Capital>,
}

impl CapitalRegistry {
    /// Create the standard three capitals at full health.
    #[must_use]
    pub fn new() -> Self {
        Self::from_kinds(CapitalKind::ALL)
    }

    /// Create the standard three capitals at the given health.
    #[must_use]
    pub fn with_health(health: f32) -> Self {
        Self {
            capitals: CapitalKind::ALL
                .iter()
                .map(|kind| Capital::with_health(*kind, health))
                .collect(),
        }
    }

    /// Create a registry holding only some presets.
    #[must_use]
    pub fn from_kinds(kinds: impl IntoIterator<Item = CapitalKind>) -> Self {
        let mut registry = Self { capitals: Vec::new() };
        for kind in kinds {
            registry.insert(Capital::new(kind));
        }
        registry
    }

    /// Add a capital. Returns `false` and keeps the existing one if the
    /// name is already registered.
    pub fn insert(&mut self, capital: Capital) -> bool {
        if self.get(capital.name()).is_some() {
            return false;
        }
        self.capitals.push(capital);
        true
    }

    /// All capitals in registration order.
    pub fn all(&self) -> impl Iterator<Item = &Capital> {
        self.capitals.iter()
    }

    /// Look up a capital by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Capital> {
        self.capitals.iter().find(|c| c.name == name)
    }

    /// Look up a capital by name for mutation.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Capital> {
        self.capitals.iter_mut().find(|c| c.name == name)
    }

    /// Number of capitals.
    #[must_use]
    pub fn len(&self) -> usize {
        self.capitals.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.capitals.is_empty()
    }
}

impl Default for CapitalRegistry {
    fn default() -> Self {
        Self::new()
    }
}
