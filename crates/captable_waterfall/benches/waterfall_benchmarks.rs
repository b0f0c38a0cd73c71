//! Criterion benchmarks for the waterfall engine.
//!
//! Measures a single detailed waterfall against cap table size, and the
//! exit-value sweep sequentially versus in parallel.

use captable_core::presets::default_cap_table;
use captable_core::{CapTable, ExitAmount, PreferenceType, ShareClass, Transaction};
use captable_waterfall::{SweepConfig, WaterfallEngine};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

/// Build a cap table with `n` preferred series and one common class.
fn generate_cap_table(n: usize) -> CapTable {
    let mut classes = Vec::with_capacity(n + 1);
    let mut transactions = Vec::with_capacity(n + 1);
    for i in 0..n {
        let id = i as u64 + 1;
        let name = format!("Series {}", id);
        let pref_type = if i % 2 == 0 {
            PreferenceType::Participating
        } else {
            PreferenceType::NonParticipating
        };
        classes.push(
            ShareClass::preferred(id, name.clone(), (n - i) as i64, 1.0 + (i % 3) as f64 * 0.5, pref_type)
                .with_cap(3.0),
        );
        transactions.push(Transaction::new(id, name, 1_000_000.0, 1_000_000.0 * id as f64));
    }
    let common_id = n as u64 + 1;
    classes.push(ShareClass::common(common_id, "Common", n as i64 + 1));
    transactions.push(Transaction::new(common_id, "Common", 5_000_000.0, 0.0));
    CapTable::new(classes, transactions).expect("generated cap table is valid")
}

/// Benchmark one detailed waterfall against the number of share classes.
fn bench_detailed_waterfall(c: &mut Criterion) {
    let mut group = c.benchmark_group("detailed_waterfall");
    let engine = WaterfallEngine::default();

    for size in [3, 10, 50] {
        let table = generate_cap_table(size);
        let exit = ExitAmount::new(1e9).expect("valid exit");
        group.bench_with_input(BenchmarkId::new("classes", size), &table, |b, table| {
            b.iter(|| engine.compute_detailed(black_box(table), black_box(exit)));
        });
    }

    group.finish();
}

/// Benchmark the exit sweep with and without parallel evaluation.
fn bench_exit_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("exit_sweep");
    let engine = WaterfallEngine::default();
    let table = default_cap_table().expect("default cap table is valid");
    let max_exit = ExitAmount::new(20_000_000.0).expect("valid exit");

    for points in [20, 200, 2000] {
        let sequential = SweepConfig::with_points(points).with_parallel_threshold(usize::MAX);
        group.bench_with_input(
            BenchmarkId::new("sequential", points),
            &sequential,
            |b, config| {
                b.iter(|| engine.compute_exit_distribution(black_box(&table), max_exit, config));
            },
        );

        let parallel = SweepConfig::with_points(points).with_parallel_threshold(1);
        group.bench_with_input(BenchmarkId::new("parallel", points), &parallel, |b, config| {
            b.iter(|| engine.compute_exit_distribution(black_box(&table), max_exit, config));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_detailed_waterfall, bench_exit_sweep);
criterion_main!(benches);
