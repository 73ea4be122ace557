//! Resource ledger and capital registry tests.
//!
//! These tests verify the invariants the turn loop relies on:
//! - Resource amounts never go negative
//! - Capital health stays within [0, 100]
//! - Production grows with health

use proptest::prelude::*;

use capital_ccg::core::{
    Capital, CapitalKind, CapitalRegistry, GameError, GameWorld, Resource, ResourceKind,
    ResourceLedger, MAX_HEALTH,
};

/// A spend of more than the balance fails and changes nothing; an add
/// then succeeds.
#[test]
fn test_food_spend_then_add() {
    let mut food = Resource::new(ResourceKind::Food, 5);

    assert!(!food.spend(10));
    assert_eq!(food.amount(), 5);

    food.add(10).unwrap();
    assert_eq!(food.amount(), 15);
}

/// Negative adds are rejected, negative or zero spends fail.
#[test]
fn test_invalid_amounts() {
    let mut money = Resource::new(ResourceKind::Money, 20);

    assert!(matches!(money.add(-1), Err(GameError::InvalidArgument { .. })));
    assert!(!money.spend(0));
    assert!(!money.spend(-5));
    assert_eq!(money.amount(), 20);
}

/// A capital knocked far below zero health stops producing.
#[test]
fn test_capital_destroyed_produces_nothing() {
    let mut government = Capital::new(CapitalKind::Government);
    assert_eq!(government.produce(), 10);

    government.modify_health(-150.0);
    assert_eq!(government.health(), 0.0);
    assert_eq!(government.produce(), 0);

    government.modify_health(1000.0);
    assert_eq!(government.health(), MAX_HEALTH);
}

/// Each preset produces into its own resource.
#[test]
fn test_presets_produce_into_their_resource() {
    let registry = CapitalRegistry::new();
    let pairs: Vec<_> = registry.all().map(|c| (c.kind(), c.resource(), c.produce())).collect();

    assert_eq!(
        pairs,
        vec![
            (CapitalKind::Government, ResourceKind::Money, 10),
            (CapitalKind::Population, ResourceKind::Food, 8),
            (CapitalKind::Military, ResourceKind::Power, 6),
        ]
    );
}

/// Half-health capitals produce half, rounded down.
#[test]
fn test_world_production_at_half_health() {
    let mut world = GameWorld::new(ResourceLedger::new(), CapitalRegistry::with_health(50.0));
    let report = world.produce_turn();

    assert_eq!(report.amount(ResourceKind::Money), 5);
    assert_eq!(report.amount(ResourceKind::Food), 4);
    assert_eq!(report.amount(ResourceKind::Power), 3);
    assert_eq!(world.ledger.total(), 12);
}

/// A capital whose resource is not in the ledger is skipped, not fatal.
#[test]
fn test_production_with_missing_resource() {
    let mut world = GameWorld::new(
        ResourceLedger::with_kinds([ResourceKind::Money]),
        CapitalRegistry::new(),
    );
    let report = world.produce_turn();

    assert_eq!(report.amount(ResourceKind::Money), 10);
    assert_eq!(report.amount(ResourceKind::Food), 0);
    assert!(world.ledger.get(ResourceKind::Food).is_none());
}

proptest! {
    #[test]
    fn prop_spend_succeeds_iff_affordable(initial in 0..10_000i64, value in -100..10_100i64) {
        let mut resource = Resource::new(ResourceKind::Power, initial);
        let affordable = value > 0 && initial >= value;

        prop_assert_eq!(resource.spend(value), affordable);
        let expected = if affordable { initial - value } else { initial };
        prop_assert_eq!(resource.amount(), expected as u64);
    }

    #[test]
    fn prop_amount_never_negative(
        ops in proptest::collection::vec((any::<bool>(), -500..500i64), 1..50)
    ) {
        let mut resource = Resource::new(ResourceKind::Food, 0);
        let mut expected: i64 = 0;

        for (is_add, value) in ops {
            if is_add {
                if resource.add(value).is_ok() {
                    expected += value;
                }
            } else if resource.spend(value) {
                expected -= value;
            }
            prop_assert!(expected >= 0);
            prop_assert_eq!(resource.amount(), expected as u64);
        }
    }

    #[test]
    fn prop_health_stays_in_range(deltas in proptest::collection::vec(-1000.0..1000.0f32, 1..30)) {
        let mut capital = Capital::new(CapitalKind::Population);
        for delta in deltas {
            capital.modify_health(delta);
            prop_assert!((0.0..=MAX_HEALTH).contains(&capital.health()));
        }
    }

    #[test]
    fn prop_production_monotonic_in_health(a in 0.0..=100.0f32, b in 0.0..=100.0f32) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        for kind in CapitalKind::ALL {
            let weak = Capital::with_health(kind, low);
            let strong = Capital::with_health(kind, high);
            prop_assert!(weak.produce() <= strong.produce());
        }
    }
}
