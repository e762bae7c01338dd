//! Shared test support: a scriptable in-memory call engine

use std::sync::{Arc, Mutex};

use callview_core::{CallEngine, CallId, CallSnapshot, CallState, ViewError, ViewResult};

#[derive(Default)]
struct EngineState {
    calls: Vec<CallSnapshot>,
    current: Option<CallId>,
    in_conference: bool,
    auto_accept_video: bool,
    deferred: Vec<CallId>,
}

/// In-memory stand-in for the call engine, scripted by each test
#[derive(Default)]
pub struct FakeEngine {
    state: Mutex<EngineState>,
}

impl FakeEngine {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn upsert(&self, call: CallSnapshot) {
        let mut state = self.state.lock().unwrap();
        if let Some(existing) = state.calls.iter_mut().find(|c| c.id == call.id) {
            *existing = call;
        } else {
            state.calls.push(call);
        }
    }

    pub fn remove(&self, call_id: CallId) {
        let mut state = self.state.lock().unwrap();
        state.calls.retain(|c| c.id != call_id);
        if state.current == Some(call_id) {
            state.current = None;
        }
    }

    pub fn set_current(&self, call_id: Option<CallId>) {
        self.state.lock().unwrap().current = call_id;
    }

    pub fn set_in_conference(&self, in_conference: bool) {
        self.state.lock().unwrap().in_conference = in_conference;
    }

    pub fn deferred(&self) -> Vec<CallId> {
        self.state.lock().unwrap().deferred.clone()
    }
}

impl CallEngine for FakeEngine {
    fn current_call(&self) -> Option<CallSnapshot> {
        let state = self.state.lock().unwrap();
        let id = state.current?;
        state.calls.iter().find(|c| c.id == id).cloned()
    }

    fn calls(&self) -> Vec<CallSnapshot> {
        self.state.lock().unwrap().calls.clone()
    }

    fn call_count(&self) -> usize {
        self.state.lock().unwrap().calls.len()
    }

    fn is_in_conference(&self) -> bool {
        self.state.lock().unwrap().in_conference
    }

    fn video_auto_accept(&self) -> bool {
        self.state.lock().unwrap().auto_accept_video
    }

    fn defer_update(&self, call: CallId) -> ViewResult<()> {
        let mut state = self.state.lock().unwrap();
        if !state.calls.iter().any(|c| c.id == call) {
            return Err(ViewError::CallNotFound { call_id: call });
        }
        state.deferred.push(call);
        Ok(())
    }

    fn accept_update(&self, call: CallId, _accept: bool) -> ViewResult<()> {
        let state = self.state.lock().unwrap();
        if !state.calls.iter().any(|c| c.id == call) {
            return Err(ViewError::CallNotFound { call_id: call });
        }
        Ok(())
    }

    fn enter_conference(&self) -> ViewResult<()> {
        self.state.lock().unwrap().in_conference = true;
        Ok(())
    }

    fn leave_conference(&self) -> ViewResult<()> {
        self.state.lock().unwrap().in_conference = false;
        Ok(())
    }
}

/// Simple snapshot constructor for tests
pub fn call(id: CallId, state: CallState) -> CallSnapshot {
    CallSnapshot::new(id, state, "sip:remote@example.com")
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
