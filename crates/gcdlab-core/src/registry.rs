//! Algorithm registry.
//!
//! A fixed, deterministically ordered list of (name, function) pairs. The
//! harness spawns one worker per entry and uses the stable index to correlate
//! workers with their progress-report targets.

use crate::gcd;

/// A plain function computing the GCD of two operands.
pub type GcdFn = fn(u64, u64) -> u64;

/// One registered algorithm variant.
#[derive(Debug, Clone, Copy)]
pub struct AlgorithmEntry {
    /// Display name of the variant.
    pub name: &'static str,
    /// The pure compute function.
    pub compute: GcdFn,
}

impl AlgorithmEntry {
    /// Create a new entry.
    #[must_use]
    pub const fn new(name: &'static str, compute: GcdFn) -> Self {
        Self { name, compute }
    }
}

/// Return the default registry: all four GCD variants, in fixed order.
#[must_use]
pub fn default_registry() -> Vec<AlgorithmEntry> {
    vec![
        AlgorithmEntry::new("IterativeEuclid", gcd::gcd_iterative),
        AlgorithmEntry::new("RecursiveEuclid", gcd::gcd_recursive),
        AlgorithmEntry::new("BigIntegerEuclid", gcd::gcd_biguint),
        AlgorithmEntry::new("BinaryGcd", gcd::gcd_binary),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_has_four_variants_in_stable_order() {
        let registry = default_registry();
        let names: Vec<&str> = registry.iter().map(|e| e.name).collect();
        assert_eq!(
            names,
            vec![
                "IterativeEuclid",
                "RecursiveEuclid",
                "BigIntegerEuclid",
                "BinaryGcd"
            ]
        );
    }

    #[test]
    fn registry_entries_compute() {
        for entry in default_registry() {
            assert_eq!((entry.compute)(48, 18), 6, "{}", entry.name);
        }
    }

    #[test]
    fn registry_order_is_deterministic_across_calls() {
        let a = default_registry();
        let b = default_registry();
        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!(x.name, y.name);
        }
    }
}
