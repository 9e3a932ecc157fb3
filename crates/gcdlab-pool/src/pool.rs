//! Fixed-size worker pool executing primality checks.
//!
//! Work items flow through a crossbeam channel to a fixed set of threads.
//! Submission order among the workers is not guaranteed; ordering is the
//! aggregator's concern. `shutdown_now` interrupts in-flight searches via
//! the cancellation token and cancels every still-pending handle, so no
//! waiter is left parked.

use std::thread;

use crossbeam_channel::{Receiver, Sender};
use tracing::debug;

use gcdlab_core::progress::CancellationToken;

use crate::handle::TaskHandle;
use crate::prime::{smallest_factor_cancellable, PrimeResult};

struct Job {
    candidate: u64,
    handle: TaskHandle,
}

/// Bounded executor for primality work items.
pub struct WorkerPool {
    injector: Option<Sender<Job>>,
    workers: Vec<thread::JoinHandle<()>>,
    cancel: CancellationToken,
    pool_size: usize,
}

impl WorkerPool {
    /// Create a pool with `pool_size` worker threads.
    #[must_use]
    pub fn new(pool_size: usize) -> Self {
        let pool_size = pool_size.max(1);
        let (injector, jobs) = crossbeam_channel::unbounded::<Job>();
        let cancel = CancellationToken::new();

        let workers = (0..pool_size)
            .map(|i| {
                let jobs: Receiver<Job> = jobs.clone();
                let cancel = cancel.clone();
                thread::Builder::new()
                    .name(format!("prime-worker-{i}"))
                    .spawn(move || worker_loop(&jobs, &cancel))
                    .expect("failed to spawn pool worker")
            })
            .collect();

        Self {
            injector: Some(injector),
            workers,
            cancel,
            pool_size,
        }
    }

    /// Default pool size: available parallelism plus one. The extra thread
    /// accounts for the aggregator that blocks on results while the others
    /// compute.
    #[must_use]
    pub fn default_size() -> usize {
        thread::available_parallelism().map_or(2, std::num::NonZero::get) + 1
    }

    /// Number of worker threads.
    #[must_use]
    pub fn pool_size(&self) -> usize {
        self.pool_size
    }

    /// A clone of the pool's cancellation token (e.g. for a Ctrl-C handler).
    #[must_use]
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Submit one candidate for primality checking.
    ///
    /// Returns a handle to the eventual result. After shutdown the handle
    /// comes back already cancelled.
    pub fn submit(&self, candidate: u64) -> TaskHandle {
        let handle = TaskHandle::new();
        match &self.injector {
            Some(injector) => {
                let job = Job {
                    candidate,
                    handle: handle.clone(),
                };
                if injector.send(job).is_err() {
                    handle.cancel();
                }
            }
            None => handle.cancel(),
        }
        handle
    }

    /// Graceful shutdown: stop accepting work, drain the queue, join.
    pub fn shutdown(&mut self) {
        self.injector.take();
        self.join_workers();
    }

    /// Immediate shutdown: interrupt in-flight searches, cancel all pending
    /// handles, and unblock any waiting aggregator. Already-completed
    /// handles retain their results.
    pub fn shutdown_now(&mut self) {
        self.cancel.cancel();
        self.injector.take();
        self.join_workers();
    }

    fn join_workers(&mut self) {
        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown_now();
    }
}

/// Worker thread body: drain jobs until the channel closes. With the token
/// cancelled, remaining jobs are drained as cancellations so every handle
/// reaches a terminal state.
fn worker_loop(jobs: &Receiver<Job>, cancel: &CancellationToken) {
    for job in jobs.iter() {
        if cancel.is_cancelled() {
            job.handle.cancel();
            continue;
        }
        match smallest_factor_cancellable(job.candidate, cancel) {
            Some(smallest_factor) => job.handle.complete(PrimeResult {
                candidate: job.candidate,
                smallest_factor,
            }),
            None => {
                debug!(candidate = job.candidate, "search interrupted");
                job.handle.cancel();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_completes_submitted_work() {
        let mut pool = WorkerPool::new(2);
        let prime = pool.submit(13);
        let composite = pool.submit(12);

        assert!(prime.wait().unwrap().is_prime());
        assert_eq!(composite.wait().unwrap().smallest_factor, 2);
        pool.shutdown();
    }

    #[test]
    fn submit_after_shutdown_yields_cancelled_handle() {
        let mut pool = WorkerPool::new(1);
        pool.shutdown();
        let handle = pool.submit(13);
        assert!(handle.wait().is_err());
    }

    #[test]
    fn shutdown_now_cancels_pending_handles() {
        let mut pool = WorkerPool::new(1);
        // A long search keeps the single worker busy while more jobs queue
        let blocker = 4_294_967_291u64; // largest prime below 2^32
        let busy = pool.submit(blocker * blocker);
        let queued: Vec<TaskHandle> = (0..10).map(|i| pool.submit(100 + i)).collect();

        pool.shutdown_now();

        assert!(busy.wait().is_err());
        for handle in queued {
            // Every handle is terminal; none may leave a waiter parked
            assert!(handle.try_result().is_some());
        }
    }

    #[test]
    fn completed_results_survive_shutdown_now() {
        let mut pool = WorkerPool::new(2);
        let handle = pool.submit(35);
        let result = handle.wait().unwrap();
        pool.shutdown_now();
        assert_eq!(handle.wait().unwrap(), result);
    }

    #[test]
    fn default_size_exceeds_parallelism() {
        assert!(WorkerPool::default_size() >= 2);
    }
}
