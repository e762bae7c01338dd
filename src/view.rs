//! The reconciled call list view
//!
//! [`CallListView`] is the derived state observers render from. It is never
//! independently authoritative: every field is computed from engine ground
//! truth plus the event history the reconciler has applied. The reconciler
//! task is the single writer; observers receive cloned revisions through a
//! `tokio::sync::watch` channel, so a reader always sees the latest
//! published revision and never a stale one after a newer one was delivered.

use serde::{Deserialize, Serialize};

use crate::call::{CallId, CallSnapshot};

/// Derived, observable projection of the engine's call list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallListView {
    /// The engine-designated active call, or `None` when the engine
    /// reports no active call
    pub current_call: Option<CallSnapshot>,
    /// Calls currently paused locally, in detection order
    pub paused_calls: Vec<CallSnapshot>,
    /// Calls currently in the conference, in detection order
    pub conference_calls: Vec<CallSnapshot>,
    /// Whether the local party has left the conference
    pub conference_paused: bool,
    /// Whether the last reported transition put a call on hold remotely
    pub call_paused_by_remote: bool,
}

impl CallListView {
    /// Whether the view tracks the call in its paused list
    pub fn is_paused(&self, call_id: CallId) -> bool {
        self.paused_calls.iter().any(|c| c.id == call_id)
    }

    /// Whether the view tracks the call as a conference member
    pub fn is_in_conference(&self, call_id: CallId) -> bool {
        self.conference_calls.iter().any(|c| c.id == call_id)
    }

    /// Insert into the paused list if absent. Returns true if the view changed.
    pub(crate) fn add_paused(&mut self, call: &CallSnapshot) -> bool {
        if self.is_paused(call.id) {
            return false;
        }
        self.paused_calls.push(call.clone());
        true
    }

    /// Remove from the paused list if present. Returns true if the view changed.
    pub(crate) fn remove_paused(&mut self, call_id: CallId) -> bool {
        let before = self.paused_calls.len();
        self.paused_calls.retain(|c| c.id != call_id);
        self.paused_calls.len() != before
    }

    /// Insert into the conference list if absent, first call wins.
    /// Returns true if the view changed.
    pub(crate) fn add_conference(&mut self, call: &CallSnapshot) -> bool {
        if self.is_in_conference(call.id) {
            return false;
        }
        self.conference_calls.push(call.clone());
        true
    }

    /// Remove from the conference list if present. Returns true if the view changed.
    pub(crate) fn remove_conference(&mut self, call_id: CallId) -> bool {
        let before = self.conference_calls.len();
        self.conference_calls.retain(|c| c.id != call_id);
        self.conference_calls.len() != before
    }

    /// Drop every list entry. Returns true if the view changed.
    pub(crate) fn clear_calls(&mut self) -> bool {
        let changed = !self.paused_calls.is_empty() || !self.conference_calls.is_empty();
        self.paused_calls.clear();
        self.conference_calls.clear();
        changed
    }
}
