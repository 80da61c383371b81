use std::collections::HashSet;

use rand::Rng;
use rand::SeedableRng;
use torus_life::parallel::partition;
use torus_life::{EngineConfig, Grid, SimulationEngine, SnapshotPolicy};

const POLICIES: [SnapshotPolicy; 2] = [SnapshotPolicy::PerWorker, SnapshotPolicy::Shared];

fn run(grid: &Grid, iterations: u64, workers: usize, policy: SnapshotPolicy) -> Grid {
    let config = EngineConfig::default()
        .worker_count(workers)
        .snapshot_policy(policy);
    SimulationEngine::new(grid.clone(), iterations, &config)
        .expect("valid configuration")
        .run()
        .expect("run completes")
        .grid
}

fn live_set(grid: &Grid) -> HashSet<(usize, usize)> {
    grid.live_cells().collect()
}

fn random_grid(width: usize, height: usize, density: f64, seed: u64) -> Grid {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let mut grid = Grid::new(width, height);
    for y in 0..height {
        for x in 0..width {
            if rng.random::<f64>() < density {
                grid.set(x, y, true);
            }
        }
    }
    grid
}

#[test]
fn blinker_oscillates() {
    let horizontal = Grid::from_live_cells(5, 5, [(1, 2), (2, 2), (3, 2)]);
    let vertical: HashSet<_> = [(2, 1), (2, 2), (2, 3)].into_iter().collect();

    for workers in [1, 2, 5] {
        for policy in POLICIES {
            // Zero configured iterations still applies one transition.
            let once = run(&horizontal, 0, workers, policy);
            assert_eq!(live_set(&once), vertical, "workers={workers} {policy:?}");

            let twice = run(&horizontal, 1, workers, policy);
            assert_eq!(twice, horizontal, "workers={workers} {policy:?}");
        }
    }
}

#[test]
fn block_is_a_still_life() {
    let block = [(1, 1), (1, 2), (2, 1), (2, 2)];
    for (w, h) in [(4, 4), (6, 5), (9, 7)] {
        let grid = Grid::from_live_cells(w, h, block);
        for iterations in [0, 1, 7, 20] {
            for workers in [1, h] {
                let after = run(&grid, iterations, workers, SnapshotPolicy::PerWorker);
                assert_eq!(
                    after, grid,
                    "{w}x{h} after {iterations} iterations on {workers} workers"
                );
            }
        }
    }
}

#[test]
fn glider_circles_the_torus() {
    // A glider moves one cell diagonally every four generations, so on an
    // 8x8 torus it is back where it started after 32 transitions.
    let glider = Grid::from_live_cells(8, 8, [(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)]);
    for workers in [1, 3, 8] {
        let after = run(&glider, 31, workers, SnapshotPolicy::PerWorker);
        assert_eq!(after, glider, "workers={workers}");

        let halfway = run(&glider, 15, workers, SnapshotPolicy::Shared);
        assert_ne!(halfway, glider);
        assert_eq!(halfway.population(), 5);
    }
}

#[test]
fn result_is_independent_of_worker_count() {
    let (width, height) = (24, 18);
    let grid = random_grid(width, height, 0.35, 0xD37E_A515);
    let expected = run(&grid, 20, 1, SnapshotPolicy::PerWorker);

    for workers in [2, 3, 4, 5, 6, 7, 9, 18] {
        for policy in POLICIES {
            assert_eq!(
                run(&grid, 20, workers, policy),
                expected,
                "workers={workers} {policy:?}"
            );
        }
    }
}

#[test]
fn repeated_runs_are_deterministic() {
    let grid = random_grid(32, 32, 0.4, 0xBADC0FFEE);
    let first = run(&grid, 40, 8, SnapshotPolicy::PerWorker);
    for _ in 0..5 {
        assert_eq!(run(&grid, 40, 8, SnapshotPolicy::PerWorker), first);
    }
}

#[test]
fn report_carries_partitions_and_transition_count() {
    let grid = random_grid(7, 10, 0.3, 0xA1);
    let config = EngineConfig::default().worker_count(4);
    let engine = SimulationEngine::new(grid, 3, &config).unwrap();
    assert_eq!(engine.partitions(), partition(10, 4).unwrap().as_slice());

    let report = engine.run().unwrap();
    assert_eq!(report.transitions, 4);
    let lines: Vec<_> = report.partitions.iter().map(ToString::to_string).collect();
    assert_eq!(
        lines,
        vec![
            "tid 0, rows: 0 -> 2 (3)",
            "tid 1, rows: 3 -> 5 (3)",
            "tid 2, rows: 6 -> 7 (2)",
            "tid 3, rows: 8 -> 9 (2)",
        ]
    );
}

#[test]
fn empty_world_stays_empty() {
    let grid = Grid::new(12, 12);
    let config = EngineConfig::default().worker_count(4);
    let report = SimulationEngine::new(grid.clone(), 10, &config)
        .unwrap()
        .run()
        .unwrap();
    assert_eq!(report.grid, grid);
    assert_eq!(report.stats.writes(), 0);
}
