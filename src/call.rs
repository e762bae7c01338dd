//! Call state and snapshot types
//!
//! This module provides the value types the reconciler operates on. The call
//! engine owns call identity and lifecycle; this crate only holds immutable
//! snapshots of engine-reported calls and classifies their states.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a call, assigned by the call engine
pub type CallId = Uuid;

/// Unique identifier for a conference a call may belong to
pub type ConferenceId = Uuid;

/// Engine-reported state of a call
///
/// Only the states that drive list reconciliation are modeled here. The
/// engine may track a richer state machine internally; any state outside
/// this set reaches the reconciler's fallback branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CallState {
    /// Call object exists but no media or signaling activity yet
    Idle,
    /// Call is established and media streams are flowing
    StreamsRunning,
    /// Call has been paused locally
    Paused,
    /// Local pause is in progress (re-INVITE sent, answer pending)
    Pausing,
    /// Local resume is in progress
    Resuming,
    /// Remote party placed the call on hold
    PausedByRemote,
    /// Remote party sent a re-INVITE that changes the session
    UpdatedByRemote,
    /// Call is ending (BYE sent or received)
    End,
    /// Call object has been released by the engine
    Released,
    /// Call failed
    Error,
}

impl CallState {
    /// Check if the call is in a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, CallState::End | CallState::Released | CallState::Error)
    }

    /// Check if the call is paused locally (settled or in progress)
    pub fn is_paused(&self) -> bool {
        matches!(self, CallState::Paused | CallState::Pausing)
    }
}

/// Immutable snapshot of an engine call as of one ground-truth query
///
/// Snapshots are what the derived views hold. Two snapshots describe the
/// same call when their `id` fields match; the remaining fields may differ
/// between queries as the call evolves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallSnapshot {
    /// Engine-assigned call identity
    pub id: CallId,
    /// State the engine reported when the snapshot was taken
    pub state: CallState,
    /// Remote party URI (e.g., "sip:alice@example.com")
    pub remote_uri: String,
    /// Display name of the remote party, if known
    pub remote_display_name: Option<String>,
    /// Conference this call belongs to, if any
    pub conference: Option<ConferenceId>,
    /// Whether the remote party's pending session update requests video
    pub remote_video_requested: bool,
    /// Whether the local leg currently has video enabled
    pub local_video_enabled: bool,
}

impl CallSnapshot {
    /// Create a minimal audio-only snapshot
    pub fn new(id: CallId, state: CallState, remote_uri: impl Into<String>) -> Self {
        Self {
            id,
            state,
            remote_uri: remote_uri.into(),
            remote_display_name: None,
            conference: None,
            remote_video_requested: false,
            local_video_enabled: false,
        }
    }

    /// Whether the engine reports this call as a conference member
    pub fn in_conference(&self) -> bool {
        self.conference.is_some()
    }
}
