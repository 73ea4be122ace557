//! Effect definitions.
//!
//! Effects are the state changes a choice makes. Each one targets a
//! single cell, either one resource counter or one capital's health, so
//! applying a list of them needs no rollback.

use serde::{Deserialize, Serialize};

use crate::core::{CapitalKind, ResourceKind};

/// A single state change.
///
/// ## Resource
///
/// Non-negative `amount` is added. Negative `amount` is spent; if the
/// resource holds less than that, nothing happens.
///
/// ## Capital
///
/// `amount` is a health delta on the named capital, clamped to `[0, 100]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Effect {
    /// Add to or spend from a resource.
    Resource { kind: ResourceKind, amount: i64 },

    /// Change a capital's health.
    Capital { capital: String, amount: f32 },
}

impl Effect {
    /// Gain `amount` of a resource.
    pub fn gain(kind: ResourceKind, amount: i64) -> Self {
        Self::Resource { kind, amount }
    }

    /// Spend `amount` of a resource. Saturates at `i64::MAX` for `i64::MIN`.
    pub fn cost(kind: ResourceKind, amount: i64) -> Self {
        Self::Resource {
            kind,
            amount: amount.saturating_neg(),
        }
    }

    /// Change a named capital's health.
    pub fn capital(capital: impl Into<String>, amount: f32) -> Self {
        Self::Capital {
            capital: capital.into(),
            amount,
        }
    }

    /// Change a preset capital's health.
    pub fn capital_kind(kind: CapitalKind, amount: f32) -> Self {
        Self::capital(kind.name(), amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cost_is_negative() {
        match Effect::cost(ResourceKind::Money, 4) {
            Effect::Resource { kind, amount } => {
                assert_eq!(kind, ResourceKind::Money);
                assert_eq!(amount, -4);
            }
            _ => panic!("Expected Resource"),
        }
    }

    #[test]
    fn test_capital_kind_uses_preset_name() {
        assert_eq!(
            Effect::capital_kind(CapitalKind::Population, -10.0),
            Effect::capital("Population", -10.0)
        );
    }

    #[test]
    fn test_cost_of_min_saturates() {
        assert_eq!(
            Effect::cost(ResourceKind::Money, i64::MIN),
            Effect::gain(ResourceKind::Money, i64::MAX)
        );
        assert_eq!(
            Effect::cost(ResourceKind::Money, i64::MAX),
            Effect::gain(ResourceKind::Money, -i64::MAX)
        );
    }

    #[test]
    fn test_effect_serialization() {
        let effect = Effect::gain(ResourceKind::Power, 5);
        let json = serde_json::to_string(&effect).unwrap();
        let deserialized: Effect = serde_json::from_str(&json).unwrap();
        assert_eq!(effect, deserialized);

        let json = r#"{"type":"Capital","capital":"Military","amount":-20}"#;
        let parsed: Effect = serde_json::from_str(json).unwrap();
        assert_eq!(parsed, Effect::capital("Military", -20.0));
    }
}
