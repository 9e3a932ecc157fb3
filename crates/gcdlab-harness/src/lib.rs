//! # gcdlab-harness
//!
//! The cyclic-barrier test harness. One long-lived worker per registered GCD
//! variant, an entry barrier whose release action regenerates the shared
//! cycle inputs exactly once per cycle, an exit barrier that holds the driver
//! back until every worker has finished, and a driver that repeats the cycle
//! a configured number of times.

pub mod barrier;
pub mod driver;
pub mod input;
pub mod worker;

// Re-exports
pub use barrier::CyclicBarrier;
pub use driver::{Harness, RunHandle, RunOutcome};
pub use input::{CyclePair, SharedCycleInput};
pub use worker::GcdWorker;
