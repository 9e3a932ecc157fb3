//! # gcdlab-core
//!
//! Core library for the gcdlab concurrency lab. Provides the GCD algorithm
//! variants and their registry, the progress/cancellation types shared by the
//! barrier harness and the worker pool, and the error taxonomy.

pub mod constants;
pub mod error;
pub mod gcd;
pub mod progress;
pub mod registry;
pub mod reporter;

// Re-exports
pub use constants::exit_codes;
pub use error::HarnessError;
pub use progress::{CancellationToken, ProgressUpdate};
pub use registry::{default_registry, AlgorithmEntry, GcdFn};
pub use reporter::{
    ChannelReporter, HarnessEvents, LoggingEvents, LoggingReporter, NoOpReporter, ProgressReporter,
};

/// Compute the greatest common divisor of two numbers.
///
/// This is a convenience function for simple use cases; it uses the iterative
/// Euclid variant. For racing all registered variants under identical inputs,
/// use the harness crate.
///
/// # Example
/// ```
/// assert_eq!(gcdlab_core::gcd(48, 18), 6);
/// assert_eq!(gcdlab_core::gcd(17, 5), 1);
/// ```
#[must_use]
pub fn gcd(a: u64, b: u64) -> u64 {
    gcd::gcd_iterative(a, b)
}
