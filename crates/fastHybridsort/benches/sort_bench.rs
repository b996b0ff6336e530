//! Sorting benchmarks using Criterion.
//!
//! Benchmarks cover:
//! - CPU tiers (insertion, hybrid, platform) against `slice::sort`
//! - Copy-element merges on inline scratch
//! - Radix pipeline on host devices, single and multi-device
//! - Dispatcher overhead including fallback
//!
//! For the GPU backend on real hardware, use `HYBRIDSORT_BACKEND=gpu cargo bench`.

use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use fastHybridsort::prelude::*;
use hybridsort::prelude::Sort;
use rand::prelude::*;
use std::env;
use std::hint::black_box;
use std::sync::Arc;

// ============================================================================
// Helper Functions
// ============================================================================

fn get_pool() -> (Arc<AcceleratorPool>, &'static str) {
    match env::var("HYBRIDSORT_BACKEND").ok().as_deref() {
        Some("gpu") => (
            Arc::new(AcceleratorPool::discover(&DiscoveryOptions::default())),
            "gpu",
        ),
        _ => (Arc::new(host_pool(1)), "host"),
    }
}

fn host_pool(devices: usize) -> AcceleratorPool {
    AcceleratorPool::from_handles(
        (0..devices).map(|i| HostAccelerator::new(format!("bench{i}"), 0).unwrap()),
    )
}

// ============================================================================
// Data Generation with Reproducible RNG
// ============================================================================

fn random_i32(size: usize, seed: u64) -> Vec<i32> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..size).map(|_| rng.random()).collect()
}

/// Mostly sorted data: ascending with 1% random swaps.
fn nearly_sorted(size: usize, seed: u64) -> Vec<i32> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut v: Vec<i32> = (0..size as i32).collect();
    for _ in 0..size / 100 {
        let a = rng.random_range(0..size);
        let b = rng.random_range(0..size);
        v.swap(a, b);
    }
    v
}

// ============================================================================
// CPU Engine
// ============================================================================

fn bench_cpu_tiers(c: &mut Criterion) {
    let mut group = c.benchmark_group("cpu_tiers");
    group.sample_size(50);

    for size in [16, 1_000, 50_000, 200_000] {
        group.throughput(Throughput::Elements(size as u64));
        let data = random_i32(size, 42);

        group.bench_with_input(BenchmarkId::new("adaptive_sort", size), &data, |b, data| {
            b.iter_batched_ref(
                || data.clone(),
                |v| adaptive_sort(black_box(v)),
                BatchSize::LargeInput,
            )
        });
        group.bench_with_input(BenchmarkId::new("slice_sort", size), &data, |b, data| {
            b.iter_batched_ref(|| data.clone(), |v| v.sort(), BatchSize::LargeInput)
        });
    }
    group.finish();
}

fn bench_nearly_sorted(c: &mut Criterion) {
    let mut group = c.benchmark_group("nearly_sorted");
    group.sample_size(50);

    for size in [10_000, 100_000] {
        group.throughput(Throughput::Elements(size as u64));
        let data = nearly_sorted(size, 7);

        group.bench_with_input(BenchmarkId::new("adaptive_sort", size), &data, |b, data| {
            b.iter_batched_ref(
                || data.clone(),
                |v| adaptive_sort(black_box(v)),
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

fn bench_inline_scratch(c: &mut Criterion) {
    let mut group = c.benchmark_group("inline_scratch");
    let data = random_i32(512, 3);

    group.bench_function("heap_scratch", |b| {
        let sorter = Sort::new().build().unwrap();
        b.iter_batched_ref(|| data.clone(), |v| sorter.sort(v), BatchSize::SmallInput)
    });
    group.bench_function("inline_scratch", |b| {
        let sorter = Sort::new().build().unwrap();
        b.iter_batched_ref(|| data.clone(), |v| sorter.sort_copy(v), BatchSize::SmallInput)
    });
    group.finish();
}

// ============================================================================
// Radix Pipeline
// ============================================================================

fn bench_radix(c: &mut Criterion) {
    let (pool, mode_name) = get_pool();
    let mut group = c.benchmark_group(format!("radix_{mode_name}"));
    group.sample_size(20);

    let sorter = SmartSort::new().pool(pool).build().unwrap();

    for size in [4_096, 65_536] {
        group.throughput(Throughput::Elements(size as u64));
        let data = random_i32(size, 11);

        group.bench_with_input(BenchmarkId::new("smart_sort", size), &data, |b, data| {
            b.iter_batched_ref(
                || data.clone(),
                |v| sorter.sort(black_box(v)).unwrap(),
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

fn bench_multi_device(c: &mut Criterion) {
    let mut group = c.benchmark_group("multi_device_host");
    group.sample_size(20);
    let data = random_i32(65_536, 13);
    group.throughput(Throughput::Elements(data.len() as u64));

    for devices in [1, 2, 4] {
        let sorter = SmartSort::new()
            .pool(Arc::new(host_pool(devices)))
            .backend(GPU)
            .build()
            .unwrap();

        group.bench_with_input(BenchmarkId::new("devices", devices), &data, |b, data| {
            b.iter_batched_ref(
                || data.clone(),
                |v| sorter.sort(black_box(v)).unwrap(),
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

// ============================================================================
// Dispatcher
// ============================================================================

fn bench_fallback(c: &mut Criterion) {
    let mut group = c.benchmark_group("fallback");
    let data = random_i32(10_000, 17);

    let empty = SmartSort::new()
        .pool(Arc::new(AcceleratorPool::empty()))
        .build()
        .unwrap();
    let cpu = SmartSort::new().backend(CPU).build().unwrap();

    group.bench_function("empty_pool", |b| {
        b.iter_batched_ref(|| data.clone(), |v| empty.sort(v).unwrap(), BatchSize::LargeInput)
    });
    group.bench_function("cpu_backend", |b| {
        b.iter_batched_ref(|| data.clone(), |v| cpu.sort(v).unwrap(), BatchSize::LargeInput)
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_cpu_tiers,
    bench_nearly_sorted,
    bench_inline_scratch,
    bench_radix,
    bench_multi_device,
    bench_fallback,
);
criterion_main!(benches);
