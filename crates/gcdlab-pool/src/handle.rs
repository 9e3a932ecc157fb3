//! Future handles for submitted work items.
//!
//! A `TaskHandle` is created at submission time and shared between the pool
//! (which completes or cancels it) and the aggregator (which blocks on it).
//! State transitions are monotonic: `Pending → Completed` or
//! `Pending → Cancelled`, and terminal states are final.

use std::sync::Arc;

use parking_lot::{Condvar, Mutex};

use gcdlab_core::error::HarnessError;

use crate::prime::PrimeResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TaskState {
    Pending,
    Completed(PrimeResult),
    Cancelled,
}

struct Shared {
    state: Mutex<TaskState>,
    cond: Condvar,
}

/// Handle to the eventual result of one submitted work item.
#[derive(Clone)]
pub struct TaskHandle {
    shared: Arc<Shared>,
}

impl TaskHandle {
    /// Create a pending handle.
    #[must_use]
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(TaskState::Pending),
                cond: Condvar::new(),
            }),
        }
    }

    /// Block until the handle reaches a terminal state.
    ///
    /// Returns the result, or [`HarnessError::Interrupted`] if the item was
    /// cancelled by a pool shutdown. Cancellation also unblocks a waiter
    /// already parked here.
    pub fn wait(&self) -> Result<PrimeResult, HarnessError> {
        let mut state = self.shared.state.lock();
        loop {
            match *state {
                TaskState::Completed(result) => return Ok(result),
                TaskState::Cancelled => return Err(HarnessError::Interrupted),
                TaskState::Pending => self.shared.cond.wait(&mut state),
            }
        }
    }

    /// Non-blocking probe of the terminal state, if any.
    #[must_use]
    pub fn try_result(&self) -> Option<Result<PrimeResult, HarnessError>> {
        match *self.shared.state.lock() {
            TaskState::Completed(result) => Some(Ok(result)),
            TaskState::Cancelled => Some(Err(HarnessError::Interrupted)),
            TaskState::Pending => None,
        }
    }

    /// Complete the handle with a result. No-op if already terminal.
    pub fn complete(&self, result: PrimeResult) {
        let mut state = self.shared.state.lock();
        if *state == TaskState::Pending {
            *state = TaskState::Completed(result);
            self.shared.cond.notify_all();
        }
    }

    /// Cancel the handle. No-op if already terminal; a completed handle
    /// retains its result.
    pub fn cancel(&self) {
        let mut state = self.shared.state.lock();
        if *state == TaskState::Pending {
            *state = TaskState::Cancelled;
            self.shared.cond.notify_all();
        }
    }
}

impl Default for TaskHandle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    fn result(candidate: u64, smallest_factor: u64) -> PrimeResult {
        PrimeResult {
            candidate,
            smallest_factor,
        }
    }

    #[test]
    fn completed_handle_returns_result() {
        let handle = TaskHandle::new();
        handle.complete(result(13, 0));
        assert_eq!(handle.wait().unwrap(), result(13, 0));
    }

    #[test]
    fn cancelled_handle_returns_interrupted() {
        let handle = TaskHandle::new();
        handle.cancel();
        assert_eq!(handle.wait().unwrap_err(), HarnessError::Interrupted);
    }

    #[test]
    fn transitions_are_monotonic() {
        let handle = TaskHandle::new();
        handle.complete(result(12, 2));
        // Neither a second completion nor a cancellation may overwrite
        handle.complete(result(99, 0));
        handle.cancel();
        assert_eq!(handle.wait().unwrap(), result(12, 2));

        let handle = TaskHandle::new();
        handle.cancel();
        handle.complete(result(12, 2));
        assert!(handle.wait().is_err());
    }

    #[test]
    fn try_result_is_none_while_pending() {
        let handle = TaskHandle::new();
        assert!(handle.try_result().is_none());
        handle.complete(result(4, 2));
        assert_eq!(handle.try_result().unwrap().unwrap(), result(4, 2));
    }

    #[test]
    fn wait_unblocks_on_late_completion() {
        let handle = TaskHandle::new();
        let waiter = {
            let handle = handle.clone();
            thread::spawn(move || handle.wait())
        };
        thread::sleep(Duration::from_millis(20));
        handle.complete(result(35, 5));
        assert_eq!(waiter.join().unwrap().unwrap(), result(35, 5));
    }

    #[test]
    fn wait_unblocks_on_late_cancellation() {
        let handle = TaskHandle::new();
        let waiter = {
            let handle = handle.clone();
            thread::spawn(move || handle.wait())
        };
        thread::sleep(Duration::from_millis(20));
        handle.cancel();
        assert!(waiter.join().unwrap().is_err());
    }
}
