//! Criterion benchmarks for the GCD algorithm variants.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use gcdlab_core::registry::default_registry;

/// Fixed operand pairs spanning small, coprime, and shared-power-of-two cases.
const PAIRS: [(u64, u64); 4] = [
    (48, 18),
    (999_999_937, 999_999_893),
    (1 << 40, (1 << 40) - 1),
    ((1u64 << 32) * 3, (1u64 << 32) * 5),
];

fn bench_variants(c: &mut Criterion) {
    for entry in default_registry() {
        let mut group = c.benchmark_group(entry.name);
        for &(a, b) in &PAIRS {
            group.bench_with_input(
                BenchmarkId::from_parameter(format!("{a}_{b}")),
                &(a, b),
                |bencher, &(a, b)| {
                    bencher.iter(|| (entry.compute)(std::hint::black_box(a), std::hint::black_box(b)));
                },
            );
        }
        group.finish();
    }
}

criterion_group!(benches, bench_variants);
criterion_main!(benches);
