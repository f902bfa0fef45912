use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use sabi_tree::OSAvlTree;
use std::collections::BTreeSet;

const N: usize = 10_000;

// ─── Helper functions to generate key sequences ─────────────────────────────

fn ordered_keys(n: usize) -> Vec<i64> {
    (0..n as i64).collect()
}

fn reverse_ordered_keys(n: usize) -> Vec<i64> {
    (0..n as i64).rev().collect()
}

fn random_keys(n: usize) -> Vec<i64> {
    // Use a simple LCG for deterministic pseudo-random sequence
    let mut keys = Vec::with_capacity(n);
    let mut x: u64 = 12345;
    for _ in 0..n {
        x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
        keys.push((x >> 33) as i64);
    }
    keys
}

// ─── Insertion benchmarks ───────────────────────────────────────────────────

fn bench_insert(c: &mut Criterion) {
    for (name, keys) in [
        ("insert_ordered", ordered_keys(N)),
        ("insert_reverse", reverse_ordered_keys(N)),
        ("insert_random", random_keys(N)),
    ] {
        let mut group = c.benchmark_group(name);

        group.bench_function(BenchmarkId::new("OSAvlTree", N), |b| {
            b.iter(|| {
                let mut tree = OSAvlTree::new();
                for &key in &keys {
                    tree.insert(key);
                }
                tree
            });
        });

        group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
            b.iter(|| {
                let mut set = BTreeSet::new();
                for &key in &keys {
                    set.insert(key);
                }
                set
            });
        });

        group.finish();
    }
}

// ─── Lookup benchmarks ──────────────────────────────────────────────────────

fn bench_contains(c: &mut Criterion) {
    let keys = random_keys(N);
    let tree: OSAvlTree<i64> = keys.iter().copied().collect();
    let set: BTreeSet<i64> = keys.iter().copied().collect();

    let mut group = c.benchmark_group("contains_random");

    group.bench_function(BenchmarkId::new("OSAvlTree", N), |b| {
        b.iter(|| {
            let mut hits = 0usize;
            for key in &keys {
                if tree.contains(key) {
                    hits += 1;
                }
            }
            hits
        });
    });

    group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
        b.iter(|| {
            let mut hits = 0usize;
            for key in &keys {
                if set.contains(key) {
                    hits += 1;
                }
            }
            hits
        });
    });

    group.finish();
}

// ─── Removal benchmarks ─────────────────────────────────────────────────────

fn bench_remove(c: &mut Criterion) {
    let keys = random_keys(N);

    let mut group = c.benchmark_group("remove_random");

    group.bench_function(BenchmarkId::new("OSAvlTree", N), |b| {
        b.iter_batched(
            || keys.iter().copied().collect::<OSAvlTree<i64>>(),
            |mut tree| {
                for key in &keys {
                    tree.remove(key);
                }
                tree
            },
            criterion::BatchSize::SmallInput,
        );
    });

    group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
        b.iter_batched(
            || keys.iter().copied().collect::<BTreeSet<i64>>(),
            |mut set| {
                for key in &keys {
                    set.remove(key);
                }
                set
            },
            criterion::BatchSize::SmallInput,
        );
    });

    group.finish();
}

// ─── Order-statistic benchmarks ─────────────────────────────────────────────

fn bench_find_kth(c: &mut Criterion) {
    let keys = random_keys(N);
    let tree: OSAvlTree<i64> = keys.iter().copied().collect();
    let set: BTreeSet<i64> = keys.iter().copied().collect();
    let len = tree.len();

    let mut group = c.benchmark_group("find_kth");

    group.bench_function(BenchmarkId::new("OSAvlTree", N), |b| {
        b.iter(|| {
            let mut sum = 0i64;
            for k in (1..=len).step_by(97) {
                sum += *tree.find_kth(k).unwrap().key();
            }
            sum
        });
    });

    // BTreeSet has no rank support; linear iteration is the best it can do.
    group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
        b.iter(|| {
            let mut sum = 0i64;
            for k in (1..=len).step_by(97) {
                sum += *set.iter().nth(k - 1).unwrap();
            }
            sum
        });
    });

    group.finish();
}

criterion_group!(benches, bench_insert, bench_contains, bench_remove, bench_find_kth);
criterion_main!(benches);
