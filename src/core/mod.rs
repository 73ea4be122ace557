//! Core engine types: resources, capitals, the shared world, RNG,
//! configuration and errors.
//!
//! Everything the turn loop mutates lives here. Cards, effects and the
//! scheduler build on these types without owning any state of their own.

pub mod capital;
pub mod config;
pub mod error;
pub mod resource;
pub mod rng;
pub mod world;

pub use capital::{Capital, CapitalConfig, CapitalKind, CapitalRegistry, MAX_HEALTH};
pub use config::GameConfig;
pub use error::{GameError, Result};
pub use resource::{Resource, ResourceKind, ResourceLedger};
pub use rng::GameRng;
pub use world::{lock_world, GameWorld, ProductionReport, SharedWorld, WorldSnapshot};
