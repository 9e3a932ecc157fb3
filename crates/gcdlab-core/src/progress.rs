//! Progress tracking and cooperative cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::HarnessError;

/// Progress update sent from workers to reporters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressUpdate {
    /// Stable worker index (matches the registry order).
    pub worker_index: usize,
    /// Name of the algorithm producing this update.
    pub algorithm: &'static str,
    /// Number of pairs computed so far in the current cycle.
    pub completed: usize,
    /// Total number of pairs in the current cycle.
    pub total: usize,
}

impl ProgressUpdate {
    /// Create a new progress update.
    #[must_use]
    pub fn new(worker_index: usize, algorithm: &'static str, completed: usize, total: usize) -> Self {
        Self {
            worker_index,
            algorithm,
            completed,
            total,
        }
    }

    /// Progress as a fraction in [0.0, 1.0].
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.completed as f64 / self.total as f64
    }
}

/// Cooperative cancellation token using an atomic bool.
///
/// # Example
/// ```
/// use gcdlab_core::progress::CancellationToken;
///
/// let token = CancellationToken::new();
/// assert!(!token.is_cancelled());
///
/// token.cancel();
/// assert!(token.is_cancelled());
/// assert!(token.check_cancelled().is_err());
/// ```
#[derive(Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a new cancellation token.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Check if cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Check for cancellation, returning an error if cancelled.
    ///
    /// Use this as a checkpoint in worker loops.
    pub fn check_cancelled(&self) -> Result<(), HarnessError> {
        if self.is_cancelled() {
            Err(HarnessError::Interrupted)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_update_fraction() {
        let update = ProgressUpdate::new(0, "IterativeEuclid", 5, 10);
        assert!((update.fraction() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn progress_update_zero_total() {
        let update = ProgressUpdate::new(0, "IterativeEuclid", 0, 0);
        assert!(update.fraction().abs() < f64::EPSILON);
    }

    #[test]
    fn cancellation_token() {
        let token = CancellationToken::new();
        assert!(!token.is_cancelled());
        token.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn cancel_is_idempotent() {
        let token = CancellationToken::new();
        token.cancel();
        token.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn check_cancelled_err() {
        let token = CancellationToken::new();
        assert!(token.check_cancelled().is_ok());
        token.cancel();
        assert!(matches!(
            token.check_cancelled(),
            Err(HarnessError::Interrupted)
        ));
    }

    #[test]
    fn cancellation_propagates_through_clone() {
        let token1 = CancellationToken::new();
        let token2 = token1.clone();
        token1.cancel();
        assert!(token2.is_cancelled());
    }
}
