use parking_lot::{Condvar, Mutex};
use tracing::debug;

use super::WorkerOutcome;

const NUMBER_OF_WORKERS: u32 = 2;

#[derive(Default)]
struct NotifierState {
    completed: u32,
    signalled: bool,
    success: bool,
    notifications: u32,
}

/// Wakes the caller of a search once, either on the first successful worker
/// or after every worker finished.
#[derive(Default)]
pub struct ResultNotifier {
    state: Mutex<NotifierState>,
    condvar: Condvar,
}

impl ResultNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called exactly once by every worker when it terminates.
    pub fn complete(&self, outcome: WorkerOutcome) {
        let mut state = self.state.lock();
        state.completed += 1;
        state.success |= outcome.is_success();

        if !state.signalled && (outcome.is_success() || state.completed >= NUMBER_OF_WORKERS) {
            state.signalled = true;
            state.notifications += 1;
            debug!(?outcome, completed = state.completed, "notifying caller");
            self.condvar.notify_all();
        }
    }

    /// Blocks until the caller was signalled. Returns whether a worker
    /// succeeded at that point.
    pub fn wait(&self) -> bool {
        let mut state = self.state.lock();
        while !state.signalled {
            self.condvar.wait(&mut state);
        }
        state.success
    }

    pub fn completed(&self) -> u32 {
        self.state.lock().completed
    }

    pub fn notifications(&self) -> u32 {
        self.state.lock().notifications
    }
}
