//! Shared cycle input: the operand pairs every worker computes over.
//!
//! Written exclusively by the entry barrier's release action, read
//! concurrently by all workers. Regeneration swaps in a fresh vector; a
//! worker's snapshot from the previous cycle stays valid but is no longer
//! current.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use gcdlab_core::constants::MAX_OPERAND;

/// One operand pair for a single iteration slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CyclePair {
    pub a: u64,
    pub b: u64,
}

/// Process-wide state holding the current cycle's generated operand pairs.
pub struct SharedCycleInput {
    pairs: RwLock<Arc<Vec<CyclePair>>>,
    rng: Mutex<StdRng>,
    iterations: usize,
}

impl SharedCycleInput {
    /// Create the shared input with the given per-cycle length and RNG seed.
    #[must_use]
    pub fn new(iterations: usize, seed: u64) -> Self {
        Self {
            pairs: RwLock::new(Arc::new(Vec::new())),
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            iterations,
        }
    }

    /// Number of pairs generated per cycle.
    #[must_use]
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Regenerate the operand pairs for a new cycle.
    ///
    /// Called only by the entry barrier's release action, which guarantees
    /// no worker is reading while the swap happens.
    pub fn regenerate(&self) {
        let mut rng = self.rng.lock();
        let fresh: Vec<CyclePair> = (0..self.iterations)
            .map(|_| CyclePair {
                a: rng.random_range(1..=MAX_OPERAND),
                b: rng.random_range(1..=MAX_OPERAND),
            })
            .collect();
        *self.pairs.write() = Arc::new(fresh);
    }

    /// A stable read-only view of the current cycle's pairs.
    #[must_use]
    pub fn snapshot(&self) -> Arc<Vec<CyclePair>> {
        Arc::clone(&self.pairs.read())
    }
}
