//! Progress reporters and run-lifecycle event sinks.
//!
//! The harness talks to the outside world only through these traits. The
//! presentation layer is responsible for marshalling updates onto its own
//! thread; implementations here must not block the calling worker for long.

use std::sync::atomic::{AtomicU64, Ordering};

use crossbeam_channel::Sender;
use tracing::{debug, info};

use crate::progress::ProgressUpdate;

/// Callback invoked by a worker after each computed pair.
pub trait ProgressReporter: Send + Sync {
    /// Report a progress update. Called from worker threads.
    fn report(&self, update: &ProgressUpdate);
}

/// Run-lifecycle notifications.
///
/// Exactly one terminal notification (`on_all_cycles_complete` or
/// `on_cancelled`) occurs per harness run.
pub trait HarnessEvents: Send + Sync {
    /// A new cycle is starting.
    fn on_cycle_start(&self, cycle: u32);

    /// All configured cycles completed successfully. Terminal.
    fn on_all_cycles_complete(&self);

    /// The run was cancelled or a cycle failed. Terminal.
    fn on_cancelled(&self);
}

/// Reporter that forwards updates through a channel without blocking.
///
/// Uses `try_send`; if the consumer falls behind, intermediate updates are
/// dropped rather than stalling the worker.
pub struct ChannelReporter {
    sender: Sender<ProgressUpdate>,
}

impl ChannelReporter {
    /// Create a new channel reporter.
    #[must_use]
    pub fn new(sender: Sender<ProgressUpdate>) -> Self {
        Self { sender }
    }
}

impl ProgressReporter for ChannelReporter {
    fn report(&self, update: &ProgressUpdate) {
        let _ = self.sender.try_send(*update);
    }
}

/// Reporter that logs progress via `tracing`, throttled to whole-percent
/// steps so hot loops don't flood the subscriber.
pub struct LoggingReporter {
    last_percent: AtomicU64,
}

impl LoggingReporter {
    /// Create a new logging reporter.
    #[must_use]
    pub fn new() -> Self {
        Self {
            last_percent: AtomicU64::new(u64::MAX),
        }
    }
}

impl Default for LoggingReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for LoggingReporter {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn report(&self, update: &ProgressUpdate) {
        let percent = (update.fraction() * 100.0) as u64;
        let last = self.last_percent.swap(percent, Ordering::Relaxed);
        if percent == last {
            return;
        }
        if update.completed == update.total {
            info!(
                algorithm = %update.algorithm,
                worker = update.worker_index,
                total = update.total,
                "cycle work complete"
            );
        } else {
            debug!(
                algorithm = %update.algorithm,
                worker = update.worker_index,
                completed = update.completed,
                total = update.total,
                "progress"
            );
        }
    }
}

/// Discards all updates and events.
pub struct NoOpReporter;

impl NoOpReporter {
    /// Create a new no-op reporter.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for NoOpReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for NoOpReporter {
    fn report(&self, _update: &ProgressUpdate) {}
}

impl HarnessEvents for NoOpReporter {
    fn on_cycle_start(&self, _cycle: u32) {}
    fn on_all_cycles_complete(&self) {}
    fn on_cancelled(&self) {}
}

/// Event sink that logs lifecycle notifications via `tracing`.
pub struct LoggingEvents;

impl HarnessEvents for LoggingEvents {
    fn on_cycle_start(&self, cycle: u32) {
        info!(cycle, "starting cycle");
    }

    fn on_all_cycles_complete(&self) {
        info!("all cycles complete");
    }

    fn on_cancelled(&self) {
        info!("run cancelled");
    }
}
