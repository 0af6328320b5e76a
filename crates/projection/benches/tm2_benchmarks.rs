//! Benchmarks for grid cell conversion.
//!
//! Run with: cargo bench --package projection
//! Or: cargo bench --package projection --bench tm2_benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use heatmap_common::GridCell;
use projection::{CellCoordinateCache, Tm2Grid, TransverseMercator};

// =============================================================================
// SCALAR CONVERSION BENCHMARKS
// =============================================================================

fn bench_scalar(c: &mut Criterion) {
    let mut group = c.benchmark_group("scalar");
    let grid = Tm2Grid::twd97();
    let tm = TransverseMercator::twd97_tm2();

    group.bench_function("footpoint_latitude", |b| {
        b.iter(|| tm.footpoint_latitude(black_box(2_769_577.3)))
    });

    group.bench_function("to_geo", |b| {
        b.iter(|| grid.to_geo(black_box(GridCell::new(7165, 7152))))
    });

    group.finish();
}

// =============================================================================
// BATCH CONVERSION BENCHMARKS
// =============================================================================

fn bench_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch");
    let grid = Tm2Grid::twd97();

    for size in [100usize, 1_000, 10_000] {
        let cells: Vec<GridCell> = (0..size as u32)
            .map(|i| GridCell::new(6800 + i % 500, 6500 + i / 500))
            .collect();

        group.bench_with_input(BenchmarkId::new("batch_to_geo", size), &cells, |b, cells| {
            b.iter(|| grid.batch_to_geo(black_box(cells)))
        });
    }

    group.finish();
}

// =============================================================================
// CACHE BENCHMARKS
// =============================================================================

fn bench_cache(c: &mut Criterion) {
    let mut group = c.benchmark_group("cell_cache");
    let cells: Vec<GridCell> = (0..600u32)
        .map(|i| GridCell::new(7000 + i % 30, 7000 + i / 30))
        .collect();

    let cache = CellCoordinateCache::new(Tm2Grid::twd97(), 1_000);
    cache.prefill(&cells);

    group.bench_function("hit", |b| {
        b.iter(|| {
            for &cell in &cells {
                black_box(cache.get_or_convert(cell));
            }
        })
    });

    group.finish();
}

criterion_group!(benches, bench_scalar, bench_batch, bench_cache);
criterion_main!(benches);
