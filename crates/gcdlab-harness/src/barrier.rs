//! Reusable cyclic barrier with an optional release action.
//!
//! Condvar plus generation counter. Each generation: parties arrive and
//! block; the last arrival runs the release action (while still holding the
//! barrier lock, so it is mutually exclusive with everything the waiters do
//! afterwards), then the barrier resets itself for the next generation.
//!
//! Waiting parties re-check their cancellation token on a short condvar
//! timeout tick. The first party to observe cancellation breaks the current
//! generation, releasing every other waiter with a broken-barrier failure;
//! no party is ever parked waiting for a partner that will never arrive.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Duration;

use parking_lot::{Condvar, Mutex};
use tracing::warn;

use gcdlab_core::constants::CANCEL_POLL_MILLIS;
use gcdlab_core::error::HarnessError;
use gcdlab_core::progress::CancellationToken;

type ReleaseAction = Box<dyn Fn() + Send + Sync>;

struct BarrierState {
    /// Parties arrived in the current generation.
    arrived: usize,
    /// Completed generation count; bumped on every successful release.
    generation: u64,
    /// Sticky failure flag; set on cancellation or a faulted release action.
    broken: bool,
}

/// A reusable barrier for a fixed number of parties.
pub struct CyclicBarrier {
    parties: usize,
    state: Mutex<BarrierState>,
    cond: Condvar,
    action: Option<ReleaseAction>,
}

impl CyclicBarrier {
    /// Create a barrier for `parties` parties with no release action.
    #[must_use]
    pub fn new(parties: usize) -> Self {
        Self::build(parties, None)
    }

    /// Create a barrier whose last arrival runs `action` exactly once per
    /// generation, before any waiting party resumes.
    #[must_use]
    pub fn with_action(parties: usize, action: impl Fn() + Send + Sync + 'static) -> Self {
        Self::build(parties, Some(Box::new(action)))
    }

    fn build(parties: usize, action: Option<ReleaseAction>) -> Self {
        assert!(parties > 0, "barrier needs at least one party");
        Self {
            parties,
            state: Mutex::new(BarrierState {
                arrived: 0,
                generation: 0,
                broken: false,
            }),
            cond: Condvar::new(),
            action,
        }
    }

    /// Number of parties required to release a generation.
    #[must_use]
    pub fn parties(&self) -> usize {
        self.parties
    }

    /// Arrive at the barrier and wait for the current generation to release.
    ///
    /// Returns the caller's arrival index within the generation. The last
    /// arrival runs the release action and releases everyone; it does not
    /// block. Fails with [`HarnessError::Interrupted`] if `cancel` fires
    /// while waiting (breaking the generation for all other waiters, who get
    /// [`HarnessError::BrokenBarrier`]).
    pub fn wait(&self, cancel: &CancellationToken) -> Result<usize, HarnessError> {
        let mut state = self.state.lock();

        if state.broken {
            return Err(HarnessError::BrokenBarrier);
        }

        let arrival = state.arrived;
        state.arrived += 1;

        if state.arrived == self.parties {
            // Last arrival: run the release action under the lock, then
            // open the next generation.
            if let Some(action) = &self.action {
                if catch_unwind(AssertUnwindSafe(|| action())).is_err() {
                    warn!("barrier release action faulted; breaking generation");
                    state.broken = true;
                    self.cond.notify_all();
                    return Err(HarnessError::Computation(
                        "release action faulted".to_string(),
                    ));
                }
            }
            state.arrived = 0;
            state.generation += 1;
            self.cond.notify_all();
            return Ok(arrival);
        }

        let generation = state.generation;
        loop {
            let timed_out = self
                .cond
                .wait_for(&mut state, Duration::from_millis(CANCEL_POLL_MILLIS))
                .timed_out();

            if state.generation != generation {
                // Our generation released successfully.
                return Ok(arrival);
            }
            if state.broken {
                return Err(HarnessError::BrokenBarrier);
            }
            if timed_out && cancel.is_cancelled() {
                state.broken = true;
                self.cond.notify_all();
                return Err(HarnessError::Interrupted);
            }
        }
    }

    /// Break the current generation from outside, releasing all waiters with
    /// a broken-barrier failure. Subsequent `wait` calls fail until `reset`.
    pub fn break_generation(&self) {
        let mut state = self.state.lock();
        state.broken = true;
        self.cond.notify_all();
    }

    /// Whether the barrier is currently broken.
    #[must_use]
    pub fn is_broken(&self) -> bool {
        self.state.lock().broken
    }

    /// Restore a broken barrier for reuse. Only meaningful once no party is
    /// still waiting on the broken generation.
    pub fn reset(&self) {
        let mut state = self.state.lock();
        state.broken = false;
        state.arrived = 0;
        state.generation += 1;
        self.cond.notify_all();
    }
}
