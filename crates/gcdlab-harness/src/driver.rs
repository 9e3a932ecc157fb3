//! Driver: orchestrates N complete cycles across all workers.
//!
//! The driver owns both barriers and participates in each as the extra
//! party. Per cycle it notifies the event sink, awaits the entry barrier
//! (whose release action regenerates the shared inputs), then awaits the
//! exit barrier. On any synchronization failure it cancels all workers and
//! reports a cancelled run; otherwise it reports completion after the final
//! cycle. Exactly one terminal notification fires per run.

use std::sync::Arc;
use std::thread;

use parking_lot::RwLock;
use tracing::{info, warn};

use gcdlab_core::error::HarnessError;
use gcdlab_core::progress::CancellationToken;
use gcdlab_core::registry::{default_registry, AlgorithmEntry};
use gcdlab_core::reporter::{HarnessEvents, ProgressReporter};

use crate::barrier::CyclicBarrier;
use crate::input::SharedCycleInput;
use crate::worker::{GcdWorker, ReporterSlot};

/// Terminal state of a harness run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every configured cycle ran to completion.
    Completed,
    /// The run was cancelled or a cycle failed.
    Cancelled,
}

impl RunOutcome {
    /// Whether the run completed all cycles.
    #[must_use]
    pub fn is_completed(self) -> bool {
        matches!(self, Self::Completed)
    }
}

/// Harness configuration: which algorithms to race and the RNG seed for
/// operand generation.
pub struct Harness {
    registry: Vec<AlgorithmEntry>,
    seed: u64,
}

impl Harness {
    /// Create a harness over the default algorithm registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: default_registry(),
            seed: 0,
        }
    }

    /// Use a custom algorithm registry.
    #[must_use]
    pub fn with_registry(mut self, registry: Vec<AlgorithmEntry>) -> Self {
        self.registry = registry;
        self
    }

    /// Seed the operand generator (deterministic inputs for a given seed).
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Start a run of `cycle_count` cycles with `iterations_per_cycle`
    /// operand pairs per cycle.
    ///
    /// Spawns one worker thread per registered algorithm plus a driver
    /// thread, and returns a handle owned by the caller. Fails with
    /// [`HarnessError::InvalidArgument`] before any thread starts if either
    /// parameter is zero or the registry is empty.
    pub fn start(
        &self,
        cycle_count: u32,
        iterations_per_cycle: usize,
        reporter: Arc<dyn ProgressReporter>,
        events: Arc<dyn HarnessEvents>,
    ) -> Result<RunHandle, HarnessError> {
        if cycle_count == 0 {
            return Err(HarnessError::InvalidArgument(
                "cycle count must be positive".to_string(),
            ));
        }
        if iterations_per_cycle == 0 {
            return Err(HarnessError::InvalidArgument(
                "iterations per cycle must be positive".to_string(),
            ));
        }
        if self.registry.is_empty() {
            return Err(HarnessError::InvalidArgument(
                "algorithm registry is empty".to_string(),
            ));
        }

        let workers = self.registry.len();
        let cancel = CancellationToken::new();
        let input = Arc::new(SharedCycleInput::new(iterations_per_cycle, self.seed));
        let reporter_slot: ReporterSlot = Arc::new(RwLock::new(reporter));

        // Both barriers synchronize every worker plus the driver. The entry
        // barrier's release action regenerates the inputs exactly once per
        // cycle, before any party resumes.
        let entry_barrier = {
            let input = Arc::clone(&input);
            Arc::new(CyclicBarrier::with_action(workers + 1, move || {
                input.regenerate();
            }))
        };
        let exit_barrier = Arc::new(CyclicBarrier::new(workers + 1));

        let mut worker_handles = Vec::with_capacity(workers);
        for (index, algorithm) in self.registry.iter().copied().enumerate() {
            let worker = GcdWorker::new(
                index,
                algorithm,
                Arc::clone(&entry_barrier),
                Arc::clone(&exit_barrier),
                Arc::clone(&input),
                Arc::clone(&reporter_slot),
                cancel.clone(),
            );
            let handle = thread::Builder::new()
                .name(format!("gcd-worker-{index}"))
                .spawn(move || worker.run())
                .map_err(|e| HarnessError::Computation(format!("failed to spawn worker: {e}")))?;
            worker_handles.push(handle);
        }

        let driver = {
            let cancel = cancel.clone();
            let entry_barrier = Arc::clone(&entry_barrier);
            let exit_barrier = Arc::clone(&exit_barrier);
            thread::Builder::new()
                .name("gcd-driver".to_string())
                .spawn(move || {
                    drive(
                        cycle_count,
                        &cancel,
                        &entry_barrier,
                        &exit_barrier,
                        worker_handles,
                        events.as_ref(),
                    )
                })
                .map_err(|e| HarnessError::Computation(format!("failed to spawn driver: {e}")))?
        };

        Ok(RunHandle {
            cancel,
            reporter_slot,
            pool_size: workers + 1,
            driver: Some(driver),
        })
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

/// The driver loop. Returns the terminal outcome after joining all workers
/// and firing exactly one terminal notification.
fn drive(
    cycle_count: u32,
    cancel: &CancellationToken,
    entry_barrier: &CyclicBarrier,
    exit_barrier: &CyclicBarrier,
    worker_handles: Vec<thread::JoinHandle<Result<(), HarnessError>>>,
    events: &dyn HarnessEvents,
) -> RunOutcome {
    let mut failure: Option<HarnessError> = None;

    for cycle in 1..=cycle_count {
        if let Err(e) = cancel.check_cancelled() {
            failure = Some(e);
            break;
        }

        events.on_cycle_start(cycle);

        // Entry: blocks until every worker has arrived; the release action
        // regenerates the inputs before anyone resumes.
        if let Err(e) = entry_barrier.wait(cancel) {
            failure = Some(e);
            break;
        }

        // Exit: blocks until every worker has consumed every pair.
        if let Err(e) = exit_barrier.wait(cancel) {
            failure = Some(e);
            break;
        }

        info!(cycle, "cycle complete");
    }

    // Stop the workers. On the success path they are parked at the entry
    // barrier for a cycle that will never run; cancelling first makes the
    // broken barrier an orderly stop rather than a failure.
    cancel.cancel();
    entry_barrier.break_generation();
    exit_barrier.break_generation();

    for handle in worker_handles {
        match handle.join() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                warn!(error = %e, "worker ended with failure");
                failure.get_or_insert(e);
            }
            Err(_) => {
                warn!("worker thread panicked");
                failure.get_or_insert(HarnessError::Computation(
                    "worker thread panicked".to_string(),
                ));
            }
        }
    }

    if let Some(e) = failure {
        info!(error = %e, "run cancelled");
        events.on_cancelled();
        RunOutcome::Cancelled
    } else {
        events.on_all_cycles_complete();
        RunOutcome::Completed
    }
}

/// Caller-owned handle to an in-flight run.
///
/// Replaces the original design's implicit lifecycle coupling: the caller
/// explicitly cancels, rebinds the progress collaborator, or joins.
pub struct RunHandle {
    cancel: CancellationToken,
    reporter_slot: ReporterSlot,
    pool_size: usize,
    driver: Option<thread::JoinHandle<RunOutcome>>,
}

impl std::fmt::Debug for RunHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunHandle")
            .field("pool_size", &self.pool_size)
            .field("cancelled", &self.cancel.is_cancelled())
            .field("joined", &self.driver.is_none())
            .finish_non_exhaustive()
    }
}

impl RunHandle {
    /// Request cancellation. Idempotent; the run terminates with
    /// `on_cancelled` unless it had already completed.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// A clone of the run's cancellation token (e.g. for a Ctrl-C handler).
    #[must_use]
    pub fn token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Rebind the progress reporter without disturbing in-flight cycles.
    ///
    /// This is the configuration-refresh operation: the presentation layer
    /// can be torn down and recreated while the computation continues.
    pub fn rebind_reporter(&self, reporter: Arc<dyn ProgressReporter>) {
        *self.reporter_slot.write() = reporter;
    }

    /// Number of threads backing this run (workers + driver).
    #[must_use]
    pub fn pool_size(&self) -> usize {
        self.pool_size
    }

    /// Wait for the run to reach its terminal state.
    pub fn join(mut self) -> RunOutcome {
        match self.driver.take() {
            Some(driver) => driver.join().unwrap_or(RunOutcome::Cancelled),
            None => RunOutcome::Cancelled,
        }
    }
}

impl Drop for RunHandle {
    fn drop(&mut self) {
        // A dropped handle must not leave threads parked at a barrier.
        if let Some(driver) = self.driver.take() {
            self.cancel.cancel();
            let _ = driver.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gcdlab_core::progress::ProgressUpdate;
    use gcdlab_core::reporter::NoOpReporter;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct CountingEvents {
        cycle_starts: AtomicU32,
        completes: AtomicU32,
        cancels: AtomicU32,
    }

    impl CountingEvents {
        fn new() -> Self {
            Self {
                cycle_starts: AtomicU32::new(0),
                completes: AtomicU32::new(0),
                cancels: AtomicU32::new(0),
            }
        }
    }

    impl HarnessEvents for CountingEvents {
        fn on_cycle_start(&self, _cycle: u32) {
            self.cycle_starts.fetch_add(1, Ordering::SeqCst);
        }
        fn on_all_cycles_complete(&self) {
            self.completes.fetch_add(1, Ordering::SeqCst);
        }
        fn on_cancelled(&self) {
            self.cancels.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct CollectingReporter {
        updates: Mutex<Vec<ProgressUpdate>>,
    }

    impl ProgressReporter for CollectingReporter {
        fn report(&self, update: &ProgressUpdate) {
            self.updates.lock().push(*update);
        }
    }

    #[test]
    fn rejects_zero_cycle_count() {
        let err = Harness::new()
            .start(0, 5, Arc::new(NoOpReporter::new()), Arc::new(NoOpReporter::new()))
            .unwrap_err();
        assert!(matches!(err, HarnessError::InvalidArgument(_)));
    }

    #[test]
    fn rejects_zero_iterations() {
        let err = Harness::new()
            .start(3, 0, Arc::new(NoOpReporter::new()), Arc::new(NoOpReporter::new()))
            .unwrap_err();
        assert!(matches!(err, HarnessError::InvalidArgument(_)));
    }

    #[test]
    fn rejects_empty_registry() {
        let err = Harness::new()
            .with_registry(Vec::new())
            .start(1, 1, Arc::new(NoOpReporter::new()), Arc::new(NoOpReporter::new()))
            .unwrap_err();
        assert!(matches!(err, HarnessError::InvalidArgument(_)));
    }

    #[test]
    fn completes_configured_cycles() {
        let events = Arc::new(CountingEvents::new());
        let reporter = Arc::new(CollectingReporter {
            updates: Mutex::new(Vec::new()),
        });

        let handle = Harness::new()
            .with_seed(7)
            .start(3, 5, reporter.clone(), events.clone())
            .unwrap();

        assert_eq!(handle.pool_size(), 5); // 4 workers + driver
        assert!(handle.join().is_completed());

        assert_eq!(events.cycle_starts.load(Ordering::SeqCst), 3);
        assert_eq!(events.completes.load(Ordering::SeqCst), 1);
        assert_eq!(events.cancels.load(Ordering::SeqCst), 0);

        // 4 workers x 3 cycles x 5 pairs
        assert_eq!(reporter.updates.lock().len(), 60);
    }

    #[test]
    fn cancel_is_idempotent_and_terminal() {
        let events = Arc::new(CountingEvents::new());
        let handle = Harness::new()
            .start(1_000_000, 1_000, Arc::new(NoOpReporter::new()), events.clone())
            .unwrap();

        handle.cancel();
        handle.cancel();
        assert_eq!(handle.join(), RunOutcome::Cancelled);

        assert_eq!(events.cancels.load(Ordering::SeqCst), 1);
        assert_eq!(events.completes.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn faulting_algorithm_cancels_the_run() {
        fn exploding(_a: u64, _b: u64) -> u64 {
            panic!("bad algorithm")
        }

        let events = Arc::new(CountingEvents::new());
        let registry = vec![
            AlgorithmEntry::new("IterativeEuclid", gcdlab_core::gcd::gcd_iterative),
            AlgorithmEntry::new("Exploding", exploding),
        ];

        let handle = Harness::new()
            .with_registry(registry)
            .start(10, 5, Arc::new(NoOpReporter::new()), events.clone())
            .unwrap();

        assert_eq!(handle.join(), RunOutcome::Cancelled);
        assert_eq!(events.cancels.load(Ordering::SeqCst), 1);
        assert_eq!(events.completes.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn dropped_handle_does_not_leak_threads() {
        let handle = Harness::new()
            .start(1_000_000, 1_000, Arc::new(NoOpReporter::new()), Arc::new(NoOpReporter::new()))
            .unwrap();
        drop(handle); // must cancel and join, not hang
    }
}
