//! Engine error type.
//!
//! Only conditions a caller must act on are errors. An insufficient
//! resource is a `false` from `Resource::spend`, a missing capital or
//! resource reference is a logged no-op, and an empty deck draws `None`.

use thiserror::Error;

use super::resource::ResourceKind;

/// Errors surfaced by the engine.
#[derive(Error, Debug)]
pub enum GameError {
    /// Negative amount passed where only non-negative values are legal.
    #[error("Invalid argument: cannot add {amount} to {kind}, use spend for negative values")]
    InvalidArgument { kind: ResourceKind, amount: i64 },

    /// A choice's conditions no longer hold.
    #[error("Choice '{label}' is locked and cannot be applied")]
    ChoiceLocked { label: String },

    /// A choice that does not belong to the card it was applied to.
    #[error("Choice '{label}' is not offered by card '{card_id}'")]
    UnknownChoice { card_id: String, label: String },

    /// Two cards in one deck share an id.
    #[error("Duplicate card id '{id}' in deck '{deck}'")]
    DuplicateCardId { deck: String, id: String },

    /// `start` called on a scheduler that already left `Idle`.
    #[error("Turn scheduler is already running")]
    AlreadyStarted,

    /// `start` called on a stopped scheduler. A fresh one is required.
    #[error("Turn scheduler has been stopped and cannot be restarted")]
    SchedulerStopped,

    /// Card file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Card file could not be parsed.
    #[error("Card definition error: {0}")]
    Json(#[from] serde_json::Error),

    /// The turn loop thread panicked.
    #[error("Turn loop thread panicked")]
    ThreadPanicked,
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, GameError>;
