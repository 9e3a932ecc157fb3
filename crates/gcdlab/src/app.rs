//! Application entry point and dispatch.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::info;

use gcdlab_core::constants::MAX_PRIME_CANDIDATE;
use gcdlab_core::error::HarnessError;
use gcdlab_core::progress::CancellationToken;
use gcdlab_core::reporter::{LoggingEvents, LoggingReporter, NoOpReporter, ProgressReporter};
use gcdlab_harness::Harness;
use gcdlab_pool::{Aggregator, LoggingSink, PrimeResult, ResultSink, WorkerPool};

use crate::config::{AppConfig, Mode};

/// Run summary written as JSON with `--output`.
#[derive(Serialize)]
pub struct RunSummary {
    pub mode: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gcd: Option<GcdSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primes: Option<PrimeSummary>,
}

/// Summary of the barrier-synchronized GCD races.
#[derive(Serialize)]
pub struct GcdSummary {
    pub cycles: u32,
    pub iterations_per_cycle: usize,
    pub algorithms: Vec<&'static str>,
    pub threads: usize,
    pub duration_ms: u128,
}

/// Summary of the pooled primality checks.
#[derive(Serialize)]
pub struct PrimeSummary {
    pub candidates: usize,
    pub primes_found: usize,
    pub pool_size: usize,
    pub duration_ms: u128,
}

/// Run the application.
pub fn run(config: &AppConfig) -> Result<()> {
    let interrupts = InterruptHub::install();

    let mut summary = RunSummary {
        mode: config.mode.as_str(),
        gcd: None,
        primes: None,
    };

    if matches!(config.mode, Mode::Gcd | Mode::All) {
        summary.gcd = Some(run_gcd(config, &interrupts)?);
    }
    if matches!(config.mode, Mode::Primes | Mode::All) {
        summary.primes = Some(run_primes(config, &interrupts)?);
    }

    if let Some(ref path) = config.output {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, &summary)?;
        info!(path = %path, "wrote run summary");
    }

    Ok(())
}

/// Barrier-synchronized GCD races: every registered algorithm computes the
/// same operand pairs each cycle, fenced by the entry and exit barriers.
fn run_gcd(config: &AppConfig, interrupts: &InterruptHub) -> Result<GcdSummary> {
    let reporter: Arc<dyn ProgressReporter> = if config.quiet {
        Arc::new(NoOpReporter::new())
    } else {
        Arc::new(LoggingReporter::new())
    };

    let handle = Harness::new().with_seed(config.seed).start(
        config.cycles,
        config.iterations,
        reporter,
        Arc::new(LoggingEvents),
    )?;
    interrupts.register(handle.token());

    let algorithms: Vec<&'static str> = gcdlab_core::default_registry()
        .iter()
        .map(|entry| entry.name)
        .collect();
    let threads = handle.pool_size();

    let start = Instant::now();
    let outcome = handle.join();
    let duration = start.elapsed();

    if !outcome.is_completed() {
        if interrupts.fired() {
            return Err(HarnessError::Interrupted.into());
        }
        return Err(HarnessError::Computation("gcd run did not complete".to_string()).into());
    }

    Ok(GcdSummary {
        cycles: config.cycles,
        iterations_per_cycle: config.iterations,
        algorithms,
        threads,
        duration_ms: duration.as_millis(),
    })
}

/// Pooled primality checks: candidates go to a fixed-size worker pool, the
/// aggregator consumes results strictly in submission order.
fn run_primes(config: &AppConfig, interrupts: &InterruptHub) -> Result<PrimeSummary> {
    if config.count == 0 {
        return Err(
            HarnessError::InvalidArgument("candidate count must be positive".to_string()).into(),
        );
    }

    let mut pool = WorkerPool::new(config.pool_size.unwrap_or_else(WorkerPool::default_size));
    interrupts.register(pool.cancel_token());

    let mut rng = StdRng::seed_from_u64(config.seed);
    let handles = (0..config.count)
        .map(|_| pool.submit(rng.random_range(2..MAX_PRIME_CANDIDATE)))
        .collect();

    let sink = TallySink::new(!config.quiet);
    let start = Instant::now();
    Aggregator::new(handles).run(&sink);
    let duration = start.elapsed();

    let pool_size = pool.pool_size();
    pool.shutdown();

    if sink.interrupted.load(Ordering::SeqCst) {
        return Err(HarnessError::Interrupted.into());
    }

    Ok(PrimeSummary {
        candidates: config.count,
        primes_found: sink.primes.load(Ordering::SeqCst),
        pool_size,
        duration_ms: duration.as_millis(),
    })
}

/// Sink that tallies primes for the run summary, optionally delegating to
/// [`LoggingSink`] for per-result output.
struct TallySink {
    log: bool,
    primes: AtomicUsize,
    interrupted: AtomicBool,
}

impl TallySink {
    fn new(log: bool) -> Self {
        Self {
            log,
            primes: AtomicUsize::new(0),
            interrupted: AtomicBool::new(false),
        }
    }
}

impl ResultSink for TallySink {
    fn on_result(&self, result: &PrimeResult) {
        if result.is_prime() {
            self.primes.fetch_add(1, Ordering::SeqCst);
        }
        if self.log {
            LoggingSink.on_result(result);
        }
    }

    fn on_finished(&self) {
        if self.log {
            LoggingSink.on_finished();
        }
    }

    fn on_interrupted(&self) {
        self.interrupted.store(true, Ordering::SeqCst);
        if self.log {
            LoggingSink.on_interrupted();
        }
    }
}

/// Single process-wide Ctrl-C handler fanning out to per-workload tokens.
///
/// `ctrlc::set_handler` can only be installed once, but mode `all` runs two
/// workloads whose cancellation tokens are created at different times. Tokens
/// registered after the signal fired are cancelled immediately.
struct InterruptHub {
    tokens: Mutex<Vec<CancellationToken>>,
    fired: AtomicBool,
}

impl InterruptHub {
    fn install() -> Arc<Self> {
        let hub = Arc::new(Self {
            tokens: Mutex::new(Vec::new()),
            fired: AtomicBool::new(false),
        });
        let handler = Arc::clone(&hub);
        ctrlc::set_handler(move || {
            handler.fired.store(true, Ordering::SeqCst);
            for token in handler.tokens.lock().iter() {
                token.cancel();
            }
        })
        .expect("Error setting Ctrl+C handler");
        hub
    }

    fn register(&self, token: CancellationToken) {
        if self.fired() {
            token.cancel();
        }
        self.tokens.lock().push(token);
    }

    fn fired(&self) -> bool {
        self.fired.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tally_sink_counts_primes_and_interruption() {
        let sink = TallySink::new(false);
        sink.on_result(&PrimeResult {
            candidate: 13,
            smallest_factor: 0,
        });
        sink.on_result(&PrimeResult {
            candidate: 12,
            smallest_factor: 2,
        });
        sink.on_result(&PrimeResult {
            candidate: 17,
            smallest_factor: 0,
        });
        sink.on_interrupted();

        assert_eq!(sink.primes.load(Ordering::SeqCst), 2);
        assert!(sink.interrupted.load(Ordering::SeqCst));
    }

    #[test]
    fn summary_omits_absent_sections() {
        let summary = RunSummary {
            mode: "primes",
            gcd: None,
            primes: Some(PrimeSummary {
                candidates: 5,
                primes_found: 2,
                pool_size: 3,
                duration_ms: 12,
            }),
        };
        let json = serde_json::to_string(&summary).unwrap();
        assert!(!json.contains("\"gcd\""));
        assert!(json.contains("\"primes_found\":2"));
    }
}
