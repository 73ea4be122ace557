//! Session wiring: the orchestrator, the choice gate and the `Game` facade.
//!
//! ## Key Types
//!
//! - `Game`: builds everything from a `GameConfig` and a card loader
//! - `GameOrchestrator`: draws a card every few turns, pausing the loop
//! - `ChoiceGate`: where the loop waits for the player's pick

pub mod gate;
pub mod orchestrator;
pub mod session;

pub use gate::{ChoiceGate, ClaimedChoice};
pub use orchestrator::GameOrchestrator;
pub use session::Game;
