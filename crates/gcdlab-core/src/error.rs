//! Error taxonomy shared by the harness and the worker pool.

/// Error type for harness and pool operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HarnessError {
    /// A barrier party failed to arrive; all waiters were released with this
    /// failure instead of a successful generation.
    #[error("barrier broken before all parties arrived")]
    BrokenBarrier,

    /// A cooperative cancellation signal was received while blocked.
    #[error("wait interrupted by cancellation")]
    Interrupted,

    /// Bad configuration, rejected before any thread starts.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An algorithm implementation faulted mid-cycle.
    #[error("computation fault: {0}")]
    Computation(String),
}

impl HarnessError {
    /// Whether this error represents an orderly cancellation rather than a
    /// genuine fault.
    #[must_use]
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::BrokenBarrier | Self::Interrupted)
    }
}
