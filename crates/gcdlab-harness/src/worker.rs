//! Per-algorithm worker.
//!
//! Each worker loops: wait at the entry barrier, snapshot the shared input,
//! compute its algorithm over every pair (reporting progress after each),
//! wait at the exit barrier. The loop ends when the run's cancellation token
//! fires; any other barrier failure is propagated so the whole cycle topples
//! instead of leaving peers stuck.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, error};

use gcdlab_core::error::HarnessError;
use gcdlab_core::progress::{CancellationToken, ProgressUpdate};
use gcdlab_core::registry::AlgorithmEntry;
use gcdlab_core::reporter::ProgressReporter;

use crate::barrier::CyclicBarrier;
use crate::input::SharedCycleInput;

/// Rebindable progress reporter slot, shared by all workers of a run.
///
/// Swapping the inner reporter implements the configuration-refresh
/// operation: a torn-down presentation layer is replaced without restarting
/// in-flight cycles.
pub type ReporterSlot = Arc<RwLock<Arc<dyn ProgressReporter>>>;

/// One long-lived worker bound to a single registered algorithm.
pub struct GcdWorker {
    index: usize,
    algorithm: AlgorithmEntry,
    entry_barrier: Arc<CyclicBarrier>,
    exit_barrier: Arc<CyclicBarrier>,
    input: Arc<SharedCycleInput>,
    reporter: ReporterSlot,
    cancel: CancellationToken,
}

impl GcdWorker {
    /// Create a worker.
    #[must_use]
    pub fn new(
        index: usize,
        algorithm: AlgorithmEntry,
        entry_barrier: Arc<CyclicBarrier>,
        exit_barrier: Arc<CyclicBarrier>,
        input: Arc<SharedCycleInput>,
        reporter: ReporterSlot,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            index,
            algorithm,
            entry_barrier,
            exit_barrier,
            input,
            reporter,
            cancel,
        }
    }

    /// Run cycles until cancelled.
    ///
    /// Returns `Ok(())` on an orderly stop (token cancelled), otherwise the
    /// failure that toppled the cycle.
    pub fn run(&self) -> Result<(), HarnessError> {
        loop {
            if self.cancel.is_cancelled() {
                return Ok(());
            }

            if let Err(e) = self.entry_barrier.wait(&self.cancel) {
                return self.stop_or_propagate(e);
            }

            if let Err(e) = self.run_cycle() {
                if !self.cancel.is_cancelled() {
                    error!(
                        algorithm = %self.algorithm.name,
                        error = %e,
                        "worker faulted; breaking cycle"
                    );
                }
                // A partial result set is unsafe to report; topple the cycle
                // so the driver is not left parked at the exit barrier.
                self.exit_barrier.break_generation();
                return self.stop_or_propagate(e);
            }

            if let Err(e) = self.exit_barrier.wait(&self.cancel) {
                return self.stop_or_propagate(e);
            }
        }
    }

    /// Compute every pair of the current cycle, reporting after each.
    fn run_cycle(&self) -> Result<(), HarnessError> {
        let pairs = self.input.snapshot();
        let total = pairs.len();
        let compute = self.algorithm.compute;

        for (i, pair) in pairs.iter().enumerate() {
            self.cancel.check_cancelled()?;

            let (a, b) = (pair.a, pair.b);
            catch_unwind(AssertUnwindSafe(|| compute(a, b))).map_err(|_| {
                HarnessError::Computation(format!(
                    "{} faulted on ({a}, {b})",
                    self.algorithm.name
                ))
            })?;

            let update = ProgressUpdate::new(self.index, self.algorithm.name, i + 1, total);
            self.reporter.read().report(&update);
        }

        debug!(algorithm = %self.algorithm.name, total, "cycle finished");
        Ok(())
    }

    /// Distinguish an orderly stop from a genuine barrier failure.
    fn stop_or_propagate(&self, err: HarnessError) -> Result<(), HarnessError> {
        if self.cancel.is_cancelled() {
            debug!(algorithm = %self.algorithm.name, "worker stopping");
            Ok(())
        } else {
            Err(err)
        }
    }
}
