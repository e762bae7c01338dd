//! # callview-core
//!
//! Call list reconciliation layer for SIP client UIs.
//!
//! A softphone UI needs a handful of consistent, observable collections to
//! render an in-call screen: the current call, the paused calls, the calls
//! in a conference, and a signal that no calls remain. The call engine that
//! owns this ground truth only delivers deltas as discrete, asynchronous
//! state-change events. This crate provides the [`Reconciler`] that projects
//! that event stream onto a [`CallListView`] observers can render from,
//! plus the one-shot [`Notification`]s (call updated, update needs a user
//! decision, no calls remaining) that drive discrete UI side effects.
//!
//! It implements no signaling and no media: the engine stays behind the
//! [`CallEngine`] capability trait, injected at construction time.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use callview_core::{CallEngine, Notification, Reconciler, ReconcilerConfig};
//!
//! # async fn example(engine: Arc<dyn CallEngine>) {
//! // Seed from ground truth and start the reconciler task
//! let (reconciler, mut handle) = Reconciler::new(engine, ReconcilerConfig::default());
//! let events = handle.event_sender(); // engine adapter pushes events here
//! tokio::spawn(reconciler.run());
//!
//! // Render loop: re-render whenever a new view revision is published
//! let mut view = handle.view();
//! tokio::spawn(async move {
//!     while view.changed().await.is_ok() {
//!         let snapshot = view.borrow().clone();
//!         println!(
//!             "current: {:?}, paused: {}, in conference: {}",
//!             snapshot.current_call.as_ref().map(|c| &c.remote_uri),
//!             snapshot.paused_calls.len(),
//!             snapshot.conference_calls.len(),
//!         );
//!     }
//! });
//!
//! // Discrete side effects: consume-on-read, delivered at most once
//! while let Some(notification) = handle.notifications().recv().await {
//!     match notification {
//!         Notification::UpdateNeedsDecision { call_id, .. } => {
//!             // ask the user, then:
//!             handle.answer_update_request(call_id, true).ok();
//!         }
//!         Notification::NoCallsRemaining { .. } => break,
//!         Notification::CallUpdated { .. } => { /* refresh codec display */ }
//!     }
//! }
//! # }
//! ```

pub mod call;
pub mod engine;
pub mod error;
pub mod events;
pub mod reconciler;
pub mod view;

pub use call::{CallId, CallSnapshot, CallState, ConferenceId};
pub use engine::{CallEngine, EngineEvent};
pub use error::{ViewError, ViewResult};
pub use events::{Notification, Notifications};
pub use reconciler::{CallViewHandle, Reconciler, ReconcilerConfig};
pub use view::CallListView;
