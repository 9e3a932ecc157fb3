//! Result aggregation in submission order.
//!
//! The aggregator blocks on each handle in the order the items were
//! submitted, not the order they complete. A slow early item therefore
//! stalls reporting of faster later ones; in exchange the output order is
//! deterministic.

use tracing::info;

use crate::handle::TaskHandle;
use crate::prime::PrimeResult;

/// Consumer of aggregated results.
///
/// Exactly one of `on_finished` / `on_interrupted` fires per aggregation.
pub trait ResultSink: Send + Sync {
    /// One result, delivered in submission order.
    fn on_result(&self, result: &PrimeResult);

    /// Every handle was consumed. Terminal.
    fn on_finished(&self);

    /// A wait was cancelled; remaining handles were discarded. Terminal.
    fn on_interrupted(&self);
}

/// Consumes task handles strictly in submission order.
pub struct Aggregator {
    handles: Vec<TaskHandle>,
}

impl Aggregator {
    /// Create an aggregator over the submitted handles, in submission order.
    #[must_use]
    pub fn new(handles: Vec<TaskHandle>) -> Self {
        Self { handles }
    }

    /// Block on each handle in order, forwarding results to the sink.
    ///
    /// On a cancelled wait, stops immediately: unread handles are discarded
    /// (not waited for) and the sink gets `on_interrupted`. Otherwise the
    /// sink gets `on_finished` after the last result.
    pub fn run(self, sink: &dyn ResultSink) {
        for handle in self.handles {
            match handle.wait() {
                Ok(result) => sink.on_result(&result),
                Err(_) => {
                    sink.on_interrupted();
                    return;
                }
            }
        }
        sink.on_finished();
    }
}

/// Sink that logs each result via `tracing`, mirroring the classic
/// "N is prime" / "N is not prime" output.
pub struct LoggingSink;

impl ResultSink for LoggingSink {
    fn on_result(&self, result: &PrimeResult) {
        if result.is_prime() {
            info!(candidate = result.candidate, "is prime");
        } else {
            info!(
                candidate = result.candidate,
                smallest_factor = result.smallest_factor,
                "is not prime"
            );
        }
    }

    fn on_finished(&self) {
        info!("finished primality computations");
    }

    fn on_interrupted(&self) {
        info!("primality computations interrupted");
    }
}
