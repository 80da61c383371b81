use std::collections::HashSet;

use rand::RngCore;
use rand::SeedableRng;
use torus_life::{EngineConfig, Grid, ReferenceLife, SimulationEngine, SnapshotPolicy};

fn step_naive(cells: &HashSet<(i64, i64)>, width: i64, height: i64) -> HashSet<(i64, i64)> {
    let mut next = HashSet::new();
    for y in 0..height {
        for x in 0..width {
            let mut neighbors = 0;
            for dy in -1..=1 {
                for dx in -1..=1 {
                    if dx == 0 && dy == 0 {
                        continue;
                    }
                    let nx = (x + dx).rem_euclid(width);
                    let ny = (y + dy).rem_euclid(height);
                    if cells.contains(&(nx, ny)) {
                        neighbors += 1;
                    }
                }
            }
            let alive = cells.contains(&(x, y));
            let next_alive = if alive {
                neighbors == 2 || neighbors == 3
            } else {
                neighbors == 3
            };
            if next_alive {
                next.insert((x, y));
            }
        }
    }
    next
}

fn seed_grid(width: usize, height: usize, density: f64, seed: u64) -> Grid {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let threshold = (u64::MAX as f64 * density) as u64;
    let mut grid = Grid::new(width, height);
    for y in 0..height {
        for x in 0..width {
            if rng.next_u64() <= threshold {
                grid.set(x, y, true);
            }
        }
    }
    grid
}

fn collect_live(grid: &Grid) -> HashSet<(i64, i64)> {
    grid.live_cells().map(|(x, y)| (x as i64, y as i64)).collect()
}

fn run_parity_case(width: usize, height: usize, density: f64, iterations: u64, seed: u64) {
    let grid = seed_grid(width, height, density, seed);
    let transitions = iterations + 1;

    let mut naive = collect_live(&grid);
    for _ in 0..transitions {
        naive = step_naive(&naive, width as i64, height as i64);
    }

    let mut reference = ReferenceLife::with_threads(grid.clone(), 4).unwrap();
    reference.step_n(transitions);
    assert_eq!(
        collect_live(reference.grid()),
        naive,
        "reference mismatch for density {density} seed {seed}"
    );

    for workers in [1, 3, height].into_iter().filter(|&w| w <= height) {
        for policy in [SnapshotPolicy::PerWorker, SnapshotPolicy::Shared] {
            let config = EngineConfig::default()
                .worker_count(workers)
                .snapshot_policy(policy);
            let report = SimulationEngine::new(grid.clone(), iterations, &config)
                .unwrap()
                .run()
                .unwrap();
            assert_eq!(
                report.grid.population(),
                reference.population(),
                "population mismatch for density {density} seed {seed} workers {workers}"
            );
            assert_eq!(
                &report.grid,
                reference.grid(),
                "live-set mismatch for density {density} seed {seed} workers {workers} {policy:?}"
            );
        }
    }
}

#[test]
fn parity_sparse_mid_dense() {
    run_parity_case(40, 30, 0.10, 6, 0xA1);
    run_parity_case(40, 30, 0.42, 6, 0xB2);
    run_parity_case(40, 30, 0.83, 4, 0xC3);
}

#[test]
fn parity_multiple_seeds() {
    for seed in [11u64, 22, 33, 44] {
        run_parity_case(21, 17, 0.35, 9, seed);
    }
}

#[test]
fn parity_on_thin_grids() {
    run_parity_case(1, 9, 0.5, 3, 0x51);
    run_parity_case(13, 1, 0.5, 3, 0x52);
    run_parity_case(2, 2, 0.5, 3, 0x53);
}
