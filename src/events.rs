//! One-shot notifications exposed to view observers
//!
//! Besides the continuously published [`CallListView`](crate::view::CallListView),
//! the reconciler emits discrete notifications that must trigger a side
//! effect at most once: refreshing a codec display, opening an accept/reject
//! dialog, dismissing the in-call screen. These are delivered over a
//! single-consumer channel with consume-on-read semantics, so a UI that is
//! torn down and re-created cannot replay an already-consumed emission.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::call::CallId;

/// A one-shot notification from the reconciler
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Notification {
    /// A call's session parameters changed; observers should refresh
    /// codec/capability displays for it
    CallUpdated {
        /// The call whose session changed
        call_id: CallId,
        /// When the notification was emitted
        timestamp: DateTime<Utc>,
    },
    /// The remote party requested a session update that needs an explicit
    /// user decision; the engine is holding the transition
    UpdateNeedsDecision {
        /// The call with the pending update
        call_id: CallId,
        /// When the notification was emitted
        timestamp: DateTime<Utc>,
    },
    /// The engine reports zero remaining calls
    NoCallsRemaining {
        /// When the notification was emitted
        timestamp: DateTime<Utc>,
    },
}

impl Notification {
    pub(crate) fn call_updated(call_id: CallId) -> Self {
        Notification::CallUpdated { call_id, timestamp: Utc::now() }
    }

    pub(crate) fn update_needs_decision(call_id: CallId) -> Self {
        Notification::UpdateNeedsDecision { call_id, timestamp: Utc::now() }
    }

    pub(crate) fn no_calls_remaining() -> Self {
        Notification::NoCallsRemaining { timestamp: Utc::now() }
    }

    /// The call this notification concerns, if any
    pub fn call_id(&self) -> Option<CallId> {
        match self {
            Notification::CallUpdated { call_id, .. } => Some(*call_id),
            Notification::UpdateNeedsDecision { call_id, .. } => Some(*call_id),
            Notification::NoCallsRemaining { .. } => None,
        }
    }
}

/// Single-consumer receiving end of the notification channel
///
/// Not cloneable: exactly one consumer exists per reconciler, and every
/// emission is delivered to it at most once. Dropping the handle discards
/// notifications that have not been consumed.
pub struct Notifications {
    rx: mpsc::UnboundedReceiver<Notification>,
}

impl Notifications {
    pub(crate) fn new(rx: mpsc::UnboundedReceiver<Notification>) -> Self {
        Self { rx }
    }

    /// Wait for the next notification
    ///
    /// Returns `None` once the reconciler has shut down and all pending
    /// notifications have been consumed.
    pub async fn recv(&mut self) -> Option<Notification> {
        self.rx.recv().await
    }

    /// Consume a notification if one is ready, without waiting
    pub fn try_recv(&mut self) -> Option<Notification> {
        self.rx.try_recv().ok()
    }
}
