//! Effect resolution - applying effects and choices to the world.
//!
//! `EffectResolver::apply_choice` is the only path from a card choice to
//! a mutation. It re-checks the choice's conditions against the live
//! state first and refuses with `ChoiceLocked` without touching anything
//! if they no longer hold.

use crate::cards::CardChoice;
use crate::core::{CapitalRegistry, GameError, GameWorld, ResourceLedger, Result};

use super::condition::{ConditionContext, ConditionEvaluator};
use super::Effect;

/// Result of applying one effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The effect changed state.
    Applied,
    /// A spend asked for more than the resource holds. Nothing changed.
    Insufficient,
    /// The target resource or capital does not exist. Nothing changed.
    MissingTarget,
}

/// Applies effects to the ledger and registry.
pub struct EffectResolver;

impl EffectResolver {
    /// Apply a single effect exactly once.
    pub fn apply(
        effect: &Effect,
        ledger: &mut ResourceLedger,
        capitals: &mut CapitalRegistry,
    ) -> ApplyOutcome {
        match effect {
            Effect::Resource { kind, amount } => {
                let Some(resource) = ledger.get_mut(*kind) else {
                    log::warn!("Effect targets resource {kind} missing from the ledger");
                    return ApplyOutcome::MissingTarget;
                };

                if *amount >= 0 {
                    // Non-negative, so `add` cannot reject it.
                    match resource.add(*amount) {
                        Ok(()) => ApplyOutcome::Applied,
                        Err(_) => ApplyOutcome::Insufficient,
                    }
                } else {
                    let cost = i64::try_from(amount.unsigned_abs()).unwrap_or(i64::MAX);
                    if resource.spend(cost) {
                        ApplyOutcome::Applied
                    } else {
                        log::debug!(
                            "Skipped spending {cost} {kind}: only {} available",
                            resource.amount()
                        );
                        ApplyOutcome::Insufficient
                    }
                }
            }

            Effect::Capital { capital, amount } => match capitals.get_mut(capital) {
                Some(target) => {
                    target.modify_health(*amount);
                    ApplyOutcome::Applied
                }
                None => {
                    log::warn!("Effect targets capital '{capital}' missing from the registry");
                    ApplyOutcome::MissingTarget
                }
            },
        }
    }

    /// Check whether a choice can be taken right now.
    pub fn is_available(
        choice: &CardChoice,
        ledger: &ResourceLedger,
        capitals: &CapitalRegistry,
    ) -> bool {
        ConditionEvaluator::all_met(&choice.conditions, &ConditionContext::new(ledger, capitals))
    }

    /// Re-validate a choice and apply its effects in declared order.
    pub fn apply_choice(choice: &CardChoice, world: &mut GameWorld) -> Result<Vec<ApplyOutcome>> {
        if !Self::is_available(choice, &world.ledger, &world.capitals) {
            return Err(GameError::ChoiceLocked {
                label: choice.label.clone(),
            });
        }

        Ok(choice
            .effects
            .iter()
            .map(|effect| Self::apply(effect, &mut world.ledger, &mut world.capitals))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CapitalKind, ResourceKind};
    use crate::effects::Condition;

    fn world_with(amounts: &[(ResourceKind, i64)]) -> GameWorld {
        GameWorld::new(
            ResourceLedger::with_amounts(amounts.iter().copied()),
            CapitalRegistry::new(),
        )
    }

    #[test]
    fn test_gain_and_cost() {
        let mut world = world_with(&[(ResourceKind::Money, 10)]);

        let outcome = EffectResolver::apply(
            &Effect::gain(ResourceKind::Money, 5),
            &mut world.ledger,
            &mut world.capitals,
        );
        assert_eq!(outcome, ApplyOutcome::Applied);
        assert_eq!(world.ledger.amount(ResourceKind::Money), 15);

        let outcome = EffectResolver::apply(
            &Effect::cost(ResourceKind::Money, 15),
            &mut world.ledger,
            &mut world.capitals,
        );
        assert_eq!(outcome, ApplyOutcome::Applied);
        assert_eq!(world.ledger.amount(ResourceKind::Money), 0);
    }

    #[test]
    fn test_cost_larger_than_amount_is_noop() {
        let mut world = world_with(&[(ResourceKind::Food, 3)]);

        let outcome = EffectResolver::apply(
            &Effect::cost(ResourceKind::Food, 4),
            &mut world.ledger,
            &mut world.capitals,
        );
        assert_eq!(outcome, ApplyOutcome::Insufficient);
        assert_eq!(world.ledger.amount(ResourceKind::Food), 3);

        let outcome = EffectResolver::apply(
            &Effect::gain(ResourceKind::Food, i64::MIN),
            &mut world.ledger,
            &mut world.capitals,
        );
        assert_eq!(outcome, ApplyOutcome::Insufficient);
    }

    #[test]
    fn test_capital_effect_clamps() {
        let mut world = world_with(&[]);

        EffectResolver::apply(
            &Effect::capital_kind(CapitalKind::Government, -1000.0),
            &mut world.ledger,
            &mut world.capitals,
        );
        assert_eq!(world.capitals.get("Government").unwrap().health(), 0.0);
    }

    #[test]
    fn test_missing_targets() {
        let mut ledger = ResourceLedger::with_kinds([ResourceKind::Money]);
        let mut capitals = CapitalRegistry::from_kinds([CapitalKind::Military]);

        let power = Effect::gain(ResourceKind::Power, 1);
        assert_eq!(
            EffectResolver::apply(&power, &mut ledger, &mut capitals),
            ApplyOutcome::MissingTarget
        );
        assert_eq!(
            EffectResolver::apply(&Effect::capital("Senate", 5.0), &mut ledger, &mut capitals),
            ApplyOutcome::MissingTarget
        );
        assert_eq!(ledger.total(), 0);
    }

    #[test]
    fn test_apply_choice_in_order() {
        let mut world = world_with(&[(ResourceKind::Money, 5)]);
        // Gain first, so the later cost succeeds.
        let choice = CardChoice::new("Tax then build")
            .with_effect(Effect::gain(ResourceKind::Money, 10))
            .with_effect(Effect::cost(ResourceKind::Money, 12))
            .with_effect(Effect::capital_kind(CapitalKind::Population, -5.0));

        let outcomes = EffectResolver::apply_choice(&choice, &mut world).unwrap();
        assert_eq!(outcomes, vec![ApplyOutcome::Applied; 3]);
        assert_eq!(world.ledger.amount(ResourceKind::Money), 3);
        assert_eq!(world.capitals.get("Population").unwrap().health(), 95.0);
    }

    #[test]
    fn test_apply_locked_choice_leaves_state() {
        let mut world = world_with(&[(ResourceKind::Food, 5)]);
        let before = world.clone();
        let choice = CardChoice::new("Feast")
            .with_condition(Condition::resource_at_least(ResourceKind::Food, 10))
            .with_effect(Effect::cost(ResourceKind::Food, 5))
            .with_effect(Effect::capital_kind(CapitalKind::Population, 10.0));

        let err = EffectResolver::apply_choice(&choice, &mut world).unwrap_err();
        assert!(matches!(err, GameError::ChoiceLocked { ref label } if label == "Feast"));
        assert_eq!(world, before);
    }
}
