//! # gcdlab-pool
//!
//! Bounded worker pool with cancellable future aggregation. A fixed-size
//! pool executes independent primality checks; a dedicated aggregator
//! consumes result handles strictly in submission order, tolerating
//! cancellation mid-wait.

pub mod aggregator;
pub mod handle;
pub mod pool;
pub mod prime;

// Re-exports
pub use aggregator::{Aggregator, LoggingSink, ResultSink};
pub use handle::TaskHandle;
pub use pool::WorkerPool;
pub use prime::{smallest_factor, PrimeResult};
