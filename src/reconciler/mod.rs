//! Call list reconciliation
//!
//! This module keeps the derived call views consistent with the call engine
//! as state-change events arrive. The engine is the single source of truth
//! for membership predicates (is-paused, is-in-conference) but only delivers
//! deltas as discrete events, so the reconciler splits its work in two:
//!
//! - **Always recompute** the cheap global fields (`current_call`,
//!   `conference_paused`, `call_paused_by_remote`) from live ground-truth
//!   queries on every event. Patching these incrementally risks drift when
//!   the transport coalesces or reorders notifications.
//! - **Incrementally patch** the ordered lists (`paused_calls`,
//!   `conference_calls`) with identity scans. List sizes are bounded by the
//!   concurrent call count, so linear scans are fine.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐  EngineEvent   ┌──────────────────┐
//! │   Call Engine    │ ─── mpsc ────► │    Reconciler    │ ◄── This Module
//! │  (SIP/media)     │                │  seed + apply()  │
//! └────────▲─────────┘                └────────┬─────────┘
//!          │ ground-truth queries,             │ watch<CallListView>
//!          │ user intents                      │ mpsc<Notification>
//! ┌────────┴──────────────────────────────────▼─────────┐
//! │                      UI layer                        │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! The reconciler task is the sole consumer of the event channel and the
//! sole writer of the view, so no locking is needed around the derived
//! state. Observers read cloned revisions on their own threads.
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use callview_core::{Reconciler, ReconcilerConfig, CallEngine};
//!
//! # async fn example(engine: Arc<dyn CallEngine>) {
//! let (reconciler, mut handle) = Reconciler::new(engine, ReconcilerConfig::default());
//! let events = handle.event_sender(); // wire this into the engine adapter
//! tokio::spawn(reconciler.run());
//!
//! let mut view = handle.view();
//! while view.changed().await.is_ok() {
//!     let snapshot = view.borrow().clone();
//!     println!("paused calls: {}", snapshot.paused_calls.len());
//! }
//! # }
//! ```

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::call::{CallId, CallSnapshot, CallState};
use crate::engine::{CallEngine, EngineEvent};
use crate::error::{ViewError, ViewResult};
use crate::events::{Notification, Notifications};
use crate::view::CallListView;


/// Configuration for a [`Reconciler`]
#[derive(Debug, Clone)]
pub struct ReconcilerConfig {
    /// Capacity of the engine event channel. The engine side blocks (or
    /// sheds, depending on the adapter) once this many events are queued
    /// unprocessed.
    pub event_capacity: usize,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self { event_capacity: 64 }
    }
}

impl ReconcilerConfig {
    /// Set the engine event channel capacity
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }
}

/// Projects the engine's call-state-change event stream onto [`CallListView`]
///
/// Created together with its observer half via [`Reconciler::new`], then
/// driven by [`Reconciler::run`] on a task. Its lifetime is one call-session
/// UI lifetime: it holds no state that outlives the session, and events
/// still queued when the observers are gone are dropped, not processed.
pub struct Reconciler {
    engine: Arc<dyn CallEngine>,
    events_rx: mpsc::Receiver<EngineEvent>,
    view_tx: watch::Sender<CallListView>,
    notify_tx: mpsc::UnboundedSender<Notification>,
}

impl Reconciler {
    /// Create a reconciler seeded from the engine's current ground truth
    ///
    /// Seeding queries the engine for its current call and full call list
    /// rather than replaying history, so a late-attaching observer converges
    /// to ground truth even if it missed prior events.
    ///
    /// Returns the reconciler (to be driven with [`run`](Self::run)) and the
    /// observer-side [`CallViewHandle`].
    pub fn new(engine: Arc<dyn CallEngine>, config: ReconcilerConfig) -> (Self, CallViewHandle) {
        let (events_tx, events_rx) = mpsc::channel(config.event_capacity);
        let (notify_tx, notify_rx) = mpsc::unbounded_channel();

        let initial = Self::seed(engine.as_ref());
        info!(
            paused = initial.paused_calls.len(),
            conference = initial.conference_calls.len(),
            has_current = initial.current_call.is_some(),
            "seeded call view from engine snapshot"
        );
        let (view_tx, view_rx) = watch::channel(initial);

        let reconciler = Self { engine: engine.clone(), events_rx, view_tx, notify_tx };
        let handle = CallViewHandle {
            engine,
            view_rx,
            notifications: Notifications::new(notify_rx),
            events_tx,
        };
        (reconciler, handle)
    }

    /// Build the initial view from a ground-truth snapshot
    fn seed(engine: &dyn CallEngine) -> CallListView {
        let mut view = CallListView::default();

        let current = engine.current_call();
        view.call_paused_by_remote =
            matches!(current.as_ref().map(|c| c.state), Some(CallState::PausedByRemote));
        view.conference_paused = !engine.is_in_conference();
        view.current_call = current;

        for call in engine.calls() {
            if call.state.is_paused() {
                view.add_paused(&call);
            } else if call.in_conference() {
                view.add_conference(&call);
            }
        }

        view
    }

    /// Consume engine events until the channel closes or all observers are gone
    ///
    /// Events are processed strictly in arrival order, one at a time. Events
    /// still queued when the loop exits are discarded with the receiver.
    pub async fn run(mut self) {
        info!("call view reconciler running");
        loop {
            tokio::select! {
                maybe_event = self.events_rx.recv() => {
                    match maybe_event {
                        Some(EngineEvent::CallStateChanged { call, new_state }) => {
                            self.apply(&call, new_state);
                        }
                        None => break,
                    }
                }
                _ = self.view_tx.closed() => {
                    debug!("all view observers dropped");
                    break;
                }
            }
        }
        info!("call view reconciler stopped");
    }

    /// Apply one call-state-change event to the derived views
    ///
    /// Idempotent under replay: applying the same `(call, state)` pair twice
    /// produces the same view as applying it once, and an application that
    /// changes nothing observable publishes no new view revision.
    pub(crate) fn apply(&mut self, call: &CallSnapshot, new_state: CallState) {
        debug!(call_id = %call.id, state = ?new_state, "applying call state change");

        let mut view = self.view_tx.borrow().clone();
        let mut changed = false;

        // Cheap global fields are recomputed from ground truth on every
        // event, never patched incrementally.
        changed |= set_flag(&mut view.call_paused_by_remote, new_state == CallState::PausedByRemote);
        changed |= set_flag(&mut view.conference_paused, !self.engine.is_in_conference());
        let current = self.engine.current_call();
        if view.current_call != current {
            view.current_call = current;
            changed = true;
        }

        if new_state.is_terminal() {
            if self.engine.call_count() == 0 {
                self.notify(Notification::no_calls_remaining());
                changed |= view.clear_calls();
            } else {
                changed |= view.remove_paused(call.id);
                changed |= view.remove_conference(call.id);
            }
        } else if new_state == CallState::Paused {
            // A call cannot be simultaneously paused and an active
            // conference member.
            changed |= view.add_paused(call);
            changed |= view.remove_conference(call.id);
        } else if new_state == CallState::Resuming {
            // Conference membership is re-derived by the fallback branch on
            // a later event, never here.
            changed |= view.remove_paused(call.id);
        } else if call.state == CallState::UpdatedByRemote {
            // The remote asked to change the session. If it wants to enable
            // video on an audio-only leg and no auto-accept policy is set,
            // hold the engine's transition until the user decides.
            if call.remote_video_requested
                && !call.local_video_enabled
                && !self.engine.video_auto_accept()
            {
                match self.engine.defer_update(call.id) {
                    Ok(()) => self.notify(Notification::update_needs_decision(call.id)),
                    Err(e) => warn!(call_id = %call.id, error = %e, "failed to defer session update"),
                }
            }
        } else {
            if new_state == CallState::StreamsRunning {
                self.notify(Notification::call_updated(call.id));
            }

            if call.in_conference() {
                changed |= view.add_conference(call);
            } else {
                changed |= view.remove_conference(call.id);
            }
        }

        if changed {
            self.view_tx.send_replace(view);
        }
    }

    fn notify(&self, notification: Notification) {
        // The consumer may already be gone during teardown; nothing to do then.
        let _ = self.notify_tx.send(notification);
    }
}

/// Observer half of a [`Reconciler`]: derived views, one-shot notifications,
/// and user-intent forwarding
///
/// Intent methods only talk to the engine; the view itself converges on the
/// engine events those intents trigger, keeping the reconciler task the sole
/// writer of the derived state.
pub struct CallViewHandle {
    engine: Arc<dyn CallEngine>,
    view_rx: watch::Receiver<CallListView>,
    notifications: Notifications,
    events_tx: mpsc::Sender<EngineEvent>,
}

impl CallViewHandle {
    /// Sender the engine adapter uses to deliver state-change events
    pub fn event_sender(&self) -> mpsc::Sender<EngineEvent> {
        self.events_tx.clone()
    }

    /// A receiver tracking the latest published view revision
    ///
    /// Cheap to clone; hand one to each UI thread that renders call state.
    pub fn view(&self) -> watch::Receiver<CallListView> {
        self.view_rx.clone()
    }

    /// The latest published view revision
    pub fn current(&self) -> CallListView {
        self.view_rx.borrow().clone()
    }

    /// The single-consumer notification channel
    pub fn notifications(&mut self) -> &mut Notifications {
        &mut self.notifications
    }

    /// Answer a session update request that was previously deferred
    pub fn answer_update_request(&self, call_id: CallId, accept: bool) -> ViewResult<()> {
        info!(call_id = %call_id, accept, "answering deferred session update");
        self.engine.accept_update(call_id, accept)
    }

    /// Leave the conference, keeping it running without the local party
    pub fn pause_conference(&self) -> ViewResult<()> {
        if !self.engine.is_in_conference() {
            return Err(ViewError::NotInConference);
        }
        info!("leaving conference");
        self.engine.leave_conference()
    }

    /// Re-join a conference the local party previously left
    pub fn resume_conference(&self) -> ViewResult<()> {
        if self.engine.is_in_conference() {
            return Err(ViewError::AlreadyInConference);
        }
        info!("re-entering conference");
        self.engine.enter_conference()
    }
}

fn set_flag(flag: &mut bool, value: bool) -> bool {
    if *flag != value {
        *flag = value;
        true
    } else {
        false
    }
}
