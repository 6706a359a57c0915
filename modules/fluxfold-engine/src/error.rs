//! Typed errors for store construction and dispatch.

use thiserror::Error;

/// Errors surfaced by the store engine.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A handler failed while its pipeline was being wired at construction.
    #[error("handler setup failed for action '{action}': {source}")]
    HandlerSetup {
        action: String,
        #[source]
        source: anyhow::Error,
    },

    /// Two definitions were registered under the same action name.
    #[error("duplicate action: {0}")]
    DuplicateAction(String),

    /// Dispatch by name to an action that was never registered.
    #[error("unknown action: {0}")]
    UnknownAction(String),

    /// The fold pipeline is no longer running; the payload was not accepted.
    #[error("store halted: action '{0}' no longer accepts payloads")]
    Halted(String),

    /// Stores spawn their fold task on the ambient tokio runtime.
    #[error("no tokio runtime available to drive the store")]
    NoRuntime,
}

/// Result type alias for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
