#![no_main]

use libfuzzer_sys::fuzz_target;

use gcdlab_core::registry::default_registry;

fuzz_target!(|data: &[u8]| {
    if data.len() < 16 {
        return;
    }
    let a = u64::from_le_bytes([
        data[0], data[1], data[2], data[3], data[4], data[5], data[6], data[7],
    ]);
    let b = u64::from_le_bytes([
        data[8], data[9], data[10], data[11], data[12], data[13], data[14], data[15],
    ]);

    let registry = default_registry();
    let reference = (registry[0].compute)(a, b);
    for entry in &registry[1..] {
        let result = (entry.compute)(a, b);
        assert_eq!(reference, result, "{} disagrees at gcd({a}, {b})", entry.name);
    }

    // Euclid's invariant: the result divides both operands
    if reference != 0 {
        assert_eq!(a % reference, 0);
        assert_eq!(b % reference, 0);
    }
});
