//! Condition and effect evaluation.
//!
//! - `Condition`: read-only guard on a choice
//! - `Effect`: single-cell state change a choice applies
//! - `EffectResolver`: applies effects and whole choices
//!
//! ## Design Philosophy
//!
//! Both are closed tagged enums evaluated with an exhaustive `match`.
//! A reference to a resource or capital that does not exist is never an
//! error: conditions read it as false and effects skip it, with a warning.

mod condition;
mod effect;
mod resolver;

pub use condition::{Condition, ConditionContext, ConditionEvaluator};
pub use effect::Effect;
pub use resolver::{ApplyOutcome, EffectResolver};
