//! Convert TM2 grid cells to latitude/longitude and measure throughput.
//!
//! Usage:
//!   convert-cells 7165,7152 7027,6850     convert the given cells
//!   convert-cells                         run the throughput comparison only
//!
//! Run with: cargo run --release --bin convert-cells -- 7165,7152

use heatmap_common::{GeoBounds, GridCell};
use projection::{CellCoordinateCache, Tm2Grid};
use std::time::Instant;

fn main() {
    let grid = Tm2Grid::twd97();

    let mut cells = Vec::new();
    for arg in std::env::args().skip(1) {
        match parse_cell(&arg) {
            Some(cell) => cells.push(cell),
            None => {
                eprintln!("Invalid cell '{}': expected GX,GY", arg);
                std::process::exit(2);
            }
        }
    }

    if !cells.is_empty() {
        println!("Cell                   Latitude      Longitude  Region");
        print_rule();
        for cell in &cells {
            let p = grid.to_geo(*cell);
            let region = if GeoBounds::TAIWAN.contains(&p) {
                "ok"
            } else {
                "outside"
            };
            println!(
                "{:<16} {:>14.6} {:>14.6}  {}",
                cell.to_string(),
                p.lat,
                p.lng,
                region
            );
        }
        println!();
    }

    run_throughput(&grid);
}

fn parse_cell(s: &str) -> Option<GridCell> {
    let (gx, gy) = s.split_once(',')?;
    Some(GridCell::new(gx.trim().parse().ok()?, gy.trim().parse().ok()?))
}

/// Compare scalar, batch and cached conversion over a synthetic workload.
///
/// The workload mimics the dataset: ~600 distinct cells, each repeated for
/// every hour of the day across several months.
fn run_throughput(grid: &Tm2Grid) {
    let distinct: Vec<GridCell> = (0..600u32)
        .map(|i| GridCell::new(7000 + i % 30, 7000 + i / 30))
        .collect();
    let workload: Vec<GridCell> = (0..24 * 8)
        .flat_map(|_| distinct.iter().copied())
        .collect();

    println!("Throughput ({} lookups, {} distinct cells)", workload.len(), distinct.len());
    print_rule();

    let start = Instant::now();
    let scalar: Vec<_> = workload.iter().map(|&c| grid.to_geo(c)).collect();
    let scalar_us = start.elapsed().as_micros().max(1);

    let start = Instant::now();
    let batch = grid.batch_to_geo(&workload);
    let batch_us = start.elapsed().as_micros().max(1);

    let cache = CellCoordinateCache::new(*grid, distinct.len());
    let start = Instant::now();
    let cached: Vec<_> = workload.iter().map(|&c| cache.get_or_convert(c)).collect();
    let cached_us = start.elapsed().as_micros().max(1);

    for (name, us) in [("scalar", scalar_us), ("batch", batch_us), ("cached", cached_us)] {
        let per_sec = workload.len() as f64 / (us as f64 / 1_000_000.0);
        println!("{:<16} {:>10} µs {:>14.0} conv/s", name, us, per_sec);
    }
    print_rule();

    let stats = cache.stats();
    println!("  Cache hit rate: {:.1}%", stats.hit_rate());

    if scalar != batch || scalar != cached {
        println!("\n✗ FAIL: batch or cached results differ from scalar conversion");
        std::process::exit(1);
    }
    println!("\n✓ PASS: scalar, batch and cached results are identical");
}

fn print_rule() {
    println!("{}", "-".repeat(60));
}
