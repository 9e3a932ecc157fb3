//! Primality work items: trial-division factor search.

use gcdlab_core::progress::CancellationToken;

/// How many candidate factors to try between cancellation checks.
const CANCEL_CHECK_STRIDE: u64 = 1024;

/// Result of checking one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrimeResult {
    /// The number that was checked.
    pub candidate: u64,
    /// Smallest factor found in `[2, sqrt(candidate)]`, or 0 if none exists.
    pub smallest_factor: u64,
}

impl PrimeResult {
    /// Whether no factor was found.
    #[must_use]
    pub fn is_prime(&self) -> bool {
        self.smallest_factor == 0
    }
}

/// Find the smallest factor of `n` by trial division, or 0 if `n` has none.
#[must_use]
pub fn smallest_factor(n: u64) -> u64 {
    // A fresh token is never cancelled, so the search runs to completion.
    smallest_factor_cancellable(n, &CancellationToken::new()).unwrap_or(0)
}

/// Cancellable trial division.
///
/// Checks the token every [`CANCEL_CHECK_STRIDE`] candidate factors so a
/// pool shutdown interrupts even a long search promptly. Returns `None` if
/// cancelled before the search finished.
#[must_use]
pub fn smallest_factor_cancellable(n: u64, cancel: &CancellationToken) -> Option<u64> {
    if n % 2 == 0 && n >= 4 {
        return Some(2);
    }

    let mut factor = 3u64;
    let mut since_check = 0u64;
    // factor <= n / factor avoids overflow of factor * factor near u64::MAX
    while factor <= n / factor {
        if n % factor == 0 {
            return Some(factor);
        }
        factor += 2;
        since_check += 1;
        if since_check == CANCEL_CHECK_STRIDE {
            since_check = 0;
            if cancel.is_cancelled() {
                return None;
            }
        }
    }
    Some(0)
}
