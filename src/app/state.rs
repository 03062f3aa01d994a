use super::{Orchestrator, RunState};
use tracing::debug;

impl Orchestrator {
    pub(super) fn set_state(&self, state: RunState) {
        *self.state.lock() = state;
        debug!("Service '{}' state changed to: {:?}", self.name, state);
    }

    /// Current state of the most recent run
    pub fn state(&self) -> RunState {
        *self.state.lock()
    }
}
