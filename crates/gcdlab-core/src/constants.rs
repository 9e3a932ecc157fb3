//! Constants for harness and pool configuration defaults.

/// Default number of barrier cycles to run.
pub const DEFAULT_CYCLE_COUNT: u32 = 10;

/// Default number of operand pairs generated per cycle.
pub const DEFAULT_ITERATIONS_PER_CYCLE: usize = 100_000;

/// Default number of primality candidates submitted to the worker pool.
pub const DEFAULT_PRIME_CANDIDATES: usize = 50;

/// Upper bound (inclusive) for generated GCD operands.
///
/// Keeping operands within u32 range means every intermediate value of every
/// registered variant fits comfortably in u64.
pub const MAX_OPERAND: u64 = u32::MAX as u64;

/// Upper bound (exclusive) for generated primality candidates.
pub const MAX_PRIME_CANDIDATE: u64 = i32::MAX as u64;

/// Tick used by barrier and future waits to re-check cancellation.
pub const CANCEL_POLL_MILLIS: u64 = 10;

/// Exit codes used by the CLI binary.
pub mod exit_codes {
    /// Successful execution.
    pub const SUCCESS: i32 = 0;
    /// Generic error.
    pub const ERROR_GENERIC: i32 = 1;
    /// A barrier generation was broken before all parties arrived.
    pub const ERROR_BROKEN_BARRIER: i32 = 2;
    /// An algorithm implementation faulted during a cycle.
    pub const ERROR_COMPUTATION: i32 = 3;
    /// Invalid configuration.
    pub const ERROR_CONFIG: i32 = 4;
    /// Run cancelled by user (Ctrl+C).
    pub const ERROR_CANCELED: i32 = 130;
}
