//! Resources and the resource ledger.
//!
//! ## Resource
//!
//! A non-negative counter of one `ResourceKind`. The only mutators are
//! `add` (non-negative deltas, errors otherwise) and `spend` (reports
//! failure instead of going below zero).
//!
//! ## ResourceLedger
//!
//! One `Resource` per kind, iterated in `ResourceKind::ALL` order.

use serde::{Deserialize, Serialize};

use super::error::{GameError, Result};

/// The three fungible resource kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    Money,
    Food,
    Power,
}

impl ResourceKind {
    /// All kinds in ledger order.
    pub const ALL: [ResourceKind; 3] =
        [ResourceKind::Money, ResourceKind::Food, ResourceKind::Power];

    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            ResourceKind::Money => "Money",
            ResourceKind::Food => "Food",
            ResourceKind::Power => "Power",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A counted quantity of one resource kind.
///
/// ```
/// use capital_ccg::core::{Resource, ResourceKind};
///
/// let mut food = Resource::new(ResourceKind::Food, 5);
/// assert!(!food.spend(10));
/// assert_eq!(food.amount(), 5);
///
/// food.add(10).unwrap();
/// assert_eq!(food.amount(), 15);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    kind: ResourceKind,
    amount: u64,
}

impl Resource {
    /// Create a resource. Negative initial amounts are floored at zero.
    #[must_use]
    pub fn new(kind: ResourceKind, initial: i64) -> Self {
        Self {
            kind,
            amount: u64::try_from(initial).unwrap_or(0),
        }
    }

    /// The resource kind.
    #[must_use]
    pub const fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Current amount.
    #[must_use]
    pub const fn amount(&self) -> u64 {
        self.amount
    }

    /// Add a non-negative delta.
    ///
    /// Negative deltas are a caller bug and return `InvalidArgument`
    /// without touching the counter.
    pub fn add(&mut self, delta: i64) -> Result<()> {
        let delta = u64::try_from(delta).map_err(|_| GameError::InvalidArgument {
            kind: self.kind,
            amount: delta,
        })?;
        self.amount = self.amount.saturating_add(delta);
        Ok(())
    }

    /// Spend a positive amount.
    ///
    /// Returns `false` and leaves the amount unchanged if `value <= 0`
    /// or more than the current amount is requested.
    pub fn spend(&mut self, value: i64) -> bool {
        let Ok(value) = u64::try_from(value) else {
            return false;
        };
        if value == 0 || self.amount < value {
            return false;
        }
        self.amount -= value;
        true
    }
}

/// One resource counter per kind.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceLedger {
    resources: Vec<Resource>,
}

impl ResourceLedger {
    /// Create a ledger with every kind at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::with_kinds(ResourceKind::ALL)
    }

    /// Create a ledger with the given initial amount for each kind.
    #[must_use]
    pub fn with_amounts(amounts: impl IntoIterator<Item = (ResourceKind, i64)>) -> Self {
        let mut ledger = Self::new();
        for (kind, amount) in amounts {
            if let Some(resource) = ledger.get_mut(kind) {
                *resource = Resource::new(kind, amount);
            }
        }
        ledger
    }

    /// Create a ledger holding only some kinds, all at zero.
    ///
    /// Lookups for the other kinds return `None`.
    #[must_use]
    pub fn with_kinds(kinds: impl IntoIterator<Item = ResourceKind>) -> Self {
        let mut resources: Vec<Resource> = Vec::with_capacity(ResourceKind::ALL.len());
        for kind in kinds {
            if !resources.iter().any(|r| r.kind == kind) {
                resources.push(Resource::new(kind, 0));
            }
        }
        resources.sort_by_key(|r| ResourceKind::ALL.iter().position(|k| *k == r.kind));
        Self { resources }
    }

    /// All resources, one per kind, in stable order.
    pub fn all(&self) -> impl Iterator<Item = &Resource> {
        self.resources.iter()
    }

    /// Look up a resource by kind.
    #[must_use]
    pub fn get(&self, kind: ResourceKind) -> Option<&Resource> {
        self.resources.iter().find(|r| r.kind == kind)
    }

    /// Look up a resource by kind for mutation.
    pub fn get_mut(&mut self, kind: ResourceKind) -> Option<&mut Resource> {
        self.resources.iter_mut().find(|r| r.kind == kind)
    }

    /// Amount of a kind, zero if the kind is absent.
    #[must_use]
    pub fn amount(&self, kind: ResourceKind) -> u64 {
        self.get(kind).map_or(0, Resource::amount)
    }

    /// Sum of all amounts.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.resources.iter().map(Resource::amount).sum()
    }
}

impl Default for ResourceLedger {
    fn default() -> Self {
        Self::new()
    }
}
