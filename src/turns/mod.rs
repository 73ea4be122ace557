//! Turn loop.
//!
//! `TurnScheduler` owns the loop thread; `SchedulerHandle` pauses,
//! resumes and stops it from anywhere; `TurnListener`s hook into the end
//! of every turn on the loop thread.

pub mod scheduler;

pub use scheduler::{SchedulerHandle, SchedulerState, TurnListener, TurnScheduler};
