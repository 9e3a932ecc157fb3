//! GCD algorithm variants.
//!
//! Four independent strategies over the same contract, raced against each
//! other by the barrier harness: iterative Euclid, recursive Euclid,
//! big-integer Euclid, and binary (Stein's algorithm).

use num_bigint::BigUint;

/// Iterative Euclid: repeated remainder until the divisor reaches zero.
#[must_use]
pub fn gcd_iterative(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a
}

/// Recursive Euclid.
///
/// Depth is bounded by O(log min(a, b)), so u64 operands cannot approach
/// stack limits.
#[must_use]
pub fn gcd_recursive(a: u64, b: u64) -> u64 {
    if b == 0 {
        a
    } else {
        gcd_recursive(b, a % b)
    }
}

/// Euclid via arbitrary-precision integers.
///
/// Deliberately pays the `BigUint` allocation cost on every call; the point
/// of this variant is to benchmark that overhead against the machine-word
/// implementations.
#[must_use]
pub fn gcd_biguint(a: u64, b: u64) -> u64 {
    let mut a = BigUint::from(a);
    let mut b = BigUint::from(b);
    let zero = BigUint::from(0u32);
    while b != zero {
        let r = &a % &b;
        a = b;
        b = r;
    }
    // The result of gcd over u64 inputs always fits back in a u64.
    a.iter_u64_digits().next().unwrap_or(0)
}

/// Binary GCD (Stein's algorithm): shifts and subtraction, no division.
#[must_use]
pub fn gcd_binary(mut a: u64, mut b: u64) -> u64 {
    if a == 0 {
        return b;
    }
    if b == 0 {
        return a;
    }

    let shift = (a | b).trailing_zeros();
    a >>= a.trailing_zeros();

    loop {
        b >>= b.trailing_zeros();
        if a > b {
            std::mem::swap(&mut a, &mut b);
        }
        b -= a;
        if b == 0 {
            return a << shift;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const VARIANTS: [(&str, fn(u64, u64) -> u64); 4] = [
        ("iterative", gcd_iterative),
        ("recursive", gcd_recursive),
        ("biguint", gcd_biguint),
        ("binary", gcd_binary),
    ];

    #[test]
    fn known_values() {
        for (name, f) in VARIANTS {
            assert_eq!(f(48, 18), 6, "{name}");
            assert_eq!(f(18, 48), 6, "{name}");
            assert_eq!(f(17, 5), 1, "{name}");
            assert_eq!(f(100, 100), 100, "{name}");
            assert_eq!(f(1, 999_999_937), 1, "{name}");
        }
    }

    #[test]
    fn zero_operands() {
        for (name, f) in VARIANTS {
            assert_eq!(f(0, 7), 7, "{name}");
            assert_eq!(f(7, 0), 7, "{name}");
            assert_eq!(f(0, 0), 0, "{name}");
        }
    }

    #[test]
    fn large_operands() {
        // 2^32 * 3 and 2^32 * 5 share a factor of 2^32
        let a = (1u64 << 32) * 3;
        let b = (1u64 << 32) * 5;
        for (name, f) in VARIANTS {
            assert_eq!(f(a, b), 1u64 << 32, "{name}");
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        /// All variants agree for arbitrary operand pairs.
        #[test]
        fn variants_agree(a in any::<u64>(), b in any::<u64>()) {
            let expected = gcd_iterative(a, b);
            prop_assert_eq!(gcd_recursive(a, b), expected);
            prop_assert_eq!(gcd_biguint(a, b), expected);
            prop_assert_eq!(gcd_binary(a, b), expected);
        }

        /// The result divides both operands.
        #[test]
        fn result_divides_operands(a in 1u64..=u64::MAX, b in 1u64..=u64::MAX) {
            let g = gcd_iterative(a, b);
            prop_assert!(g > 0);
            prop_assert_eq!(a % g, 0);
            prop_assert_eq!(b % g, 0);
        }

        /// gcd(a, b) == gcd(b, a)
        #[test]
        fn commutative(a in any::<u64>(), b in any::<u64>()) {
            prop_assert_eq!(gcd_binary(a, b), gcd_binary(b, a));
        }

        /// gcd(ka, kb) == k * gcd(a, b)
        #[test]
        fn distributive_over_scaling(a in 1u64..1 << 20, b in 1u64..1 << 20, k in 1u64..1 << 20) {
            prop_assert_eq!(gcd_iterative(k * a, k * b), k * gcd_iterative(a, b));
        }
    }
}
