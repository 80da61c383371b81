#[cfg(feature = "mimalloc-global")]
#[global_allocator]
static GLOBAL_ALLOCATOR: mimalloc::MiMalloc = mimalloc::MiMalloc;

use rand::RngCore;
use rand::SeedableRng;
use std::time::Instant;
use torus_life::{EngineConfig, Grid, ReferenceLife, SimulationEngine, SnapshotPolicy};

const LIVE_DENSITY: f64 = 0.42;

fn seed_world(size: usize, density: f64) -> Grid {
    let mut rng = rand::rngs::StdRng::seed_from_u64(0x5EED_1234_ABCD_EF01);
    let threshold = (u64::MAX as f64 * density) as u64;
    let mut grid = Grid::new(size, size);
    for y in 0..size {
        for x in 0..size {
            if rng.next_u64() <= threshold {
                grid.set(x, y, true);
            }
        }
    }
    grid
}

fn bench_barrier(world: &Grid, iterations: u64, config: &EngineConfig) -> (f64, u64) {
    let engine = SimulationEngine::new(world.clone(), iterations, config)
        .expect("benchmark configuration is valid");
    let start = Instant::now();
    let report = engine.run().expect("benchmark run completes");
    let total_ms = start.elapsed().as_secs_f64() * 1000.0;
    (total_ms, report.grid.population())
}

fn bench_reference(world: &Grid, transitions: u64) -> (f64, u64) {
    let mut reference = ReferenceLife::new(world.clone()).expect("reference pool builds");
    let start = Instant::now();
    reference.step_n(transitions);
    let total_ms = start.elapsed().as_secs_f64() * 1000.0;
    (total_ms, reference.population())
}

fn main() {
    let scales: &[(usize, u64)] = &[(128, 200), (512, 50), (1024, 20)];
    let workers: &[usize] = &[1, 2, 4, 8];

    println!(
        "{:<10} {:<16} {:>8} {:>12} {:>10} {:>10}",
        "Grid", "Engine", "Iters", "Total(ms)", "Avg(ms)", "Pop"
    );
    println!("{}", "-".repeat(72));

    for &(size, iters) in scales {
        let world = seed_world(size, LIVE_DENSITY);
        let transitions = iters + 1;
        let label = format!("{size}x{size}");

        for &n in workers {
            for policy in [SnapshotPolicy::PerWorker, SnapshotPolicy::Shared] {
                let config = EngineConfig::default()
                    .worker_count(n)
                    .snapshot_policy(policy);
                let (total_ms, pop) = bench_barrier(&world, iters, &config);
                let engine = match policy {
                    SnapshotPolicy::PerWorker => format!("barrier/{n}"),
                    SnapshotPolicy::Shared => format!("barrier-sh/{n}"),
                };
                println!(
                    "{:<10} {:<16} {:>8} {:>12.1} {:>10.4} {:>10}",
                    label,
                    engine,
                    transitions,
                    total_ms,
                    total_ms / transitions as f64,
                    pop
                );
            }
        }

        let (total_ms, pop) = bench_reference(&world, transitions);
        println!(
            "{:<10} {:<16} {:>8} {:>12.1} {:>10.4} {:>10}",
            label,
            "reference",
            transitions,
            total_ms,
            total_ms / transitions as f64,
            pop
        );
    }
}
