//! Choice conditions.
//!
//! A condition is a read-only guard over the ledger and registry. A
//! choice is available only while every one of its conditions holds.

use serde::{Deserialize, Serialize};

use crate::core::{CapitalKind, CapitalRegistry, GameWorld, ResourceKind, ResourceLedger};

/// A guard that must hold for a choice to be taken.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Condition {
    /// Resource amount must be at least `min_amount`.
    Resource { kind: ResourceKind, min_amount: i64 },

    /// Named capital's health must be at least `min_health`.
    Capital { capital: String, min_health: f32 },
}

impl Condition {
    /// Require at least `min_amount` of a resource.
    pub fn resource_at_least(kind: ResourceKind, min_amount: i64) -> Self {
        Self::Resource { kind, min_amount }
    }

    /// Require a named capital to have at least `min_health`.
    pub fn capital_at_least(capital: impl Into<String>, min_health: f32) -> Self {
        Self::Capital {
            capital: capital.into(),
            min_health,
        }
    }

    /// Require a preset capital to have at least `min_health`.
    pub fn capital_kind_at_least(kind: CapitalKind, min_health: f32) -> Self {
        Self::capital_at_least(kind.name(), min_health)
    }
}

/// State a condition is evaluated against.
#[derive(Clone, Copy)]
pub struct ConditionContext<'a> {
    pub ledger: &'a ResourceLedger,
    pub capitals: &'a CapitalRegistry,
}

impl<'a> ConditionContext<'a> {
    /// Create a new context.
    pub fn new(ledger: &'a ResourceLedger, capitals: &'a CapitalRegistry) -> Self {
        Self { ledger, capitals }
    }
}

impl<'a> From<&'a GameWorld> for ConditionContext<'a> {
    fn from(world: &'a GameWorld) -> Self {
        Self::new(&world.ledger, &world.capitals)
    }
}

/// Evaluator for choice conditions.
pub struct ConditionEvaluator;

impl ConditionEvaluator {
    /// Check if a single condition holds.
    ///
    /// A reference to a resource or capital that does not exist is
    /// false, never a panic.
    pub fn evaluate(condition: &Condition, ctx: &ConditionContext) -> bool {
        match condition {
            Condition::Resource { kind, min_amount } => match ctx.ledger.get(*kind) {
                Some(resource) => {
                    i64::try_from(resource.amount()).unwrap_or(i64::MAX) >= *min_amount
                }
                None => {
                    log::warn!("Condition references resource {kind} missing from the ledger");
                    false
                }
            },

            Condition::Capital { capital, min_health } => match ctx.capitals.get(capital) {
                Some(found) => found.health() >= *min_health,
                None => {
                    log::warn!(
                        "Condition references capital '{capital}' missing from the registry"
                    );
                    false
                }
            },
        }
    }

    /// Check if every condition holds. Stops at the first failure.
    pub fn all_met<'c>(
        conditions: impl IntoIterator<Item = &'c Condition>,
        ctx: &ConditionContext,
    ) -> bool {
        conditions.into_iter().all(|c| Self::evaluate(c, ctx))
    }
}
