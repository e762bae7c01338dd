//! Call engine capability interface
//!
//! The reconciler never reaches a process-wide engine singleton. It is
//! handed an explicit [`CallEngine`] capability at construction time, which
//! makes the dependency substitutable with a fake in tests and keeps the
//! ground-truth queries the reconciler relies on in one narrow interface.
//!
//! State-change notifications are not delivered through a registered
//! callback. The engine side pushes [`EngineEvent`]s into an explicit
//! message channel whose sole consumer is the reconciler task, so the
//! single-writer invariant on the derived views is structural rather than
//! assumed.

use crate::call::{CallId, CallSnapshot, CallState};
use crate::error::ViewResult;

/// Ground-truth queries and control operations offered by the call engine
///
/// All query methods are synchronous and safe to call at any point while an
/// event is being applied; they reflect the engine's state as of the call,
/// not as of the event that triggered it. Implementations must be cheap:
/// the reconciler re-queries `current_call` and `is_in_conference` on every
/// event.
pub trait CallEngine: Send + Sync {
    /// The engine-designated active call, if any
    fn current_call(&self) -> Option<CallSnapshot>;

    /// Snapshot of every call the engine currently tracks
    fn calls(&self) -> Vec<CallSnapshot>;

    /// Total number of calls the engine currently tracks
    fn call_count(&self) -> usize;

    /// Whether the local party is currently in the conference
    fn is_in_conference(&self) -> bool;

    /// Whether remote video-enable requests are accepted without asking
    fn video_auto_accept(&self) -> bool;

    /// Hold a pending remote-initiated state transition until an explicit
    /// accept/reject decision is made for the call
    fn defer_update(&self, call: CallId) -> ViewResult<()>;

    /// Answer a previously deferred session update request
    fn accept_update(&self, call: CallId, accept: bool) -> ViewResult<()>;

    /// Join the local party into the conference
    fn enter_conference(&self) -> ViewResult<()>;

    /// Remove the local party from the conference, leaving it running
    fn leave_conference(&self) -> ViewResult<()>;
}

/// Notification pushed by the engine into the reconciler's event channel
#[derive(Debug, Clone)]
pub enum EngineEvent {
    /// A call transitioned to a new state
    CallStateChanged {
        /// Snapshot of the call taken when the transition was reported
        call: CallSnapshot,
        /// The state the call transitioned to
        new_state: CallState,
    },
}

impl EngineEvent {
    /// The call this event concerns
    pub fn call_id(&self) -> CallId {
        match self {
            EngineEvent::CallStateChanged { call, .. } => call.id,
        }
    }
}
