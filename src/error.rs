//! Error types for call view operations

use thiserror::Error;

use crate::call::CallId;

/// Errors returned by user-intent forwarding and engine capability calls
///
/// The reconciliation projection itself never fails; a malformed or
/// unexpected event simply produces no list mutation. Errors only arise
/// when forwarding an explicit user intent into the engine.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ViewError {
    #[error("Call not found: {call_id}")]
    CallNotFound {
        /// The call that was not found
        call_id: CallId,
    },

    #[error("Local party is not in the conference")]
    NotInConference,

    #[error("Local party is already in the conference")]
    AlreadyInConference,

    #[error("Call engine unavailable: {reason}")]
    EngineUnavailable {
        /// Why the engine could not service the request
        reason: String,
    },

    #[error("Internal error: {message}")]
    InternalError {
        /// Description of the internal error
        message: String,
    },
}

impl ViewError {
    /// Convenience constructor for internal errors
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError { message: message.into() }
    }
}

/// Result type alias for call view operations
pub type ViewResult<T> = std::result::Result<T, ViewError>;
