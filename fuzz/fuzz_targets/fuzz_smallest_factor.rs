#![no_main]

use libfuzzer_sys::fuzz_target;

use gcdlab_pool::smallest_factor;

fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }
    // 32-bit candidates keep the trial division fast enough to fuzz
    let n = u64::from(u32::from_le_bytes([data[0], data[1], data[2], data[3]]));

    let factor = smallest_factor(n);
    if factor == 0 {
        return;
    }

    assert!(factor >= 2);
    assert_eq!(n % factor, 0, "{factor} does not divide {n}");
    // Nothing smaller divides n
    for smaller in 2..factor {
        assert_ne!(n % smaller, 0, "{smaller} < {factor} divides {n}");
    }
});
