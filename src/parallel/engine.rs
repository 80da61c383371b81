//! Barrier-synchronized parallel engine.
//!
//! One worker thread per [`Partition`] runs for the whole simulation. Every
//! generation each worker:
//!
//! 1. waits at barrier A, so the previous generation's writes are complete
//!    before anyone reads;
//! 2. copies the entire shared grid into its snapshot;
//! 3. waits at barrier B, so nobody writes while a peer is still copying;
//! 4. applies the rule to its own rows, counting neighbors in the snapshot and
//!    writing the shared grid only for cells whose state changes.
//!
//! The shared grid is never cleared between generations. A cell the rule
//! leaves alone is not written, and keeps the value it had before the
//! transition because nobody else owns its row.

use std::ops::Range;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, error, info, trace};

use super::barrier::{BrokenBarrier, GenerationBarrier};
use super::partition::{Partition, partition};
use super::shared::SharedGrid;
use crate::error::{ConfigError, LifeError, Result};
use crate::grid::{CellSource, Grid, count_live_neighbors};
use crate::rules::{Transition, decide};

/// Where workers read neighbor counts from during the apply phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SnapshotPolicy {
    /// Every worker copies the full grid into its own private snapshot.
    #[default]
    PerWorker,
    /// Rank 0 copies the grid once per generation into a snapshot all
    /// workers read after barrier B.
    Shared,
}

/// Configuration for a [`SimulationEngine`].
///
/// Use `EngineConfig::default()` to auto-detect the worker count, or set the
/// knobs through the builder methods.
#[derive(Clone, Debug, Default)]
pub struct EngineConfig {
    /// Number of worker threads, one per row partition.
    /// `None` means physical cores, capped at the grid height.
    /// An explicit value is validated against the height, never clamped.
    pub worker_count: Option<usize>,
    pub snapshot_policy: SnapshotPolicy,
}

impl EngineConfig {
    pub fn worker_count(mut self, n: usize) -> Self {
        self.worker_count = Some(n);
        self
    }

    pub fn snapshot_policy(mut self, policy: SnapshotPolicy) -> Self {
        self.snapshot_policy = policy;
        self
    }
}

fn resolve_worker_count(config: &EngineConfig, height: usize) -> usize {
    config
        .worker_count
        .unwrap_or_else(|| num_cpus::get_physical().max(1).min(height))
}

/// Cells written during apply phases, split by the value written.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ApplyStats {
    pub live_writes: u64,
    pub dead_writes: u64,
}

impl ApplyStats {
    pub fn writes(&self) -> u64 {
        self.live_writes + self.dead_writes
    }

    fn accumulate(&mut self, other: ApplyStats) {
        self.live_writes += other.live_writes;
        self.dead_writes += other.dead_writes;
    }
}

/// Apply one transition to `rows` of `dest`, reading only from `snapshot`.
///
/// `Keep` outcomes are not written, so `dest` must already hold the
/// pre-transition value of every cell in `rows`.
pub fn apply_rows<S: CellSource + ?Sized>(
    snapshot: &S,
    dest: &SharedGrid,
    rows: Range<usize>,
) -> ApplyStats {
    let width = snapshot.width();
    let mut stats = ApplyStats::default();
    for y in rows {
        for x in 0..width {
            let index = y * width + x;
            let neighbors = count_live_neighbors(snapshot, x, y);
            match decide(snapshot.is_alive_at(index), neighbors) {
                Transition::Die => {
                    dest.store(index, false);
                    stats.dead_writes += 1;
                }
                Transition::Live => {
                    dest.store(index, true);
                    stats.live_writes += 1;
                }
                Transition::Keep => {}
            }
        }
    }
    stats
}

/// Outcome of a completed run.
#[derive(Clone, Debug)]
pub struct RunReport {
    pub grid: Grid,
    pub partitions: Vec<Partition>,
    /// Transitions actually applied: always `iterations + 1`.
    pub transitions: u64,
    pub elapsed: Duration,
    pub stats: ApplyStats,
}

pub struct SimulationEngine {
    grid: SharedGrid,
    partitions: Vec<Partition>,
    iterations: u64,
    policy: SnapshotPolicy,
}

struct WorkerContext<'a> {
    grid: &'a SharedGrid,
    shared_snapshot: Option<&'a SharedGrid>,
    barrier: &'a GenerationBarrier,
    transitions: u64,
}

/// Breaks the barrier when a worker leaves the protocol early.
struct BarrierGuard<'a> {
    barrier: &'a GenerationBarrier,
    rank: usize,
    armed: bool,
}

impl<'a> BarrierGuard<'a> {
    fn new(barrier: &'a GenerationBarrier, rank: usize) -> Self {
        Self {
            barrier,
            rank,
            armed: true,
        }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for BarrierGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if thread::panicking() {
            error!(rank = self.rank, "worker panicked; breaking generation barrier");
        }
        self.barrier.break_barrier();
    }
}

impl SimulationEngine {
    /// Partition `grid` for the configured workers.
    ///
    /// All configuration failures surface here, before any thread starts.
    pub fn new(grid: Grid, iterations: u64, config: &EngineConfig) -> Result<Self> {
        if grid.is_empty() {
            return Err(ConfigError::EmptyGrid {
                width: grid.width(),
                height: grid.height(),
            }
            .into());
        }
        let workers = resolve_worker_count(config, grid.height());
        let partitions = partition(grid.height(), workers)?;

        Ok(Self {
            grid: SharedGrid::from_grid(&grid),
            partitions,
            iterations,
            policy: config.snapshot_policy,
        })
    }

    pub fn partitions(&self) -> &[Partition] {
        &self.partitions
    }

    pub fn worker_count(&self) -> usize {
        self.partitions.len()
    }

    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// Number of transitions a run applies.
    ///
    /// The generation loop runs its body before testing the count, so a run
    /// configured for `k` iterations applies `k + 1` transitions; `k = 0`
    /// still applies one.
    pub fn transitions(&self) -> u64 {
        self.iterations + 1
    }

    pub fn run(self) -> Result<RunReport> {
        self.run_inner(None::<fn(u64, &Grid)>)
    }

    /// Run, calling `observer` from rank 0 once per generation with the
    /// pre-transition state, between barrier A and barrier B.
    pub fn run_observed<F>(self, observer: F) -> Result<RunReport>
    where
        F: FnMut(u64, &Grid) + Send,
    {
        self.run_inner(Some(observer))
    }

    fn run_inner<F>(self, mut observer: Option<F>) -> Result<RunReport>
    where
        F: FnMut(u64, &Grid) + Send,
    {
        let transitions = self.transitions();
        let Self {
            grid,
            partitions,
            iterations,
            policy,
        } = self;
        let workers = partitions.len();

        info!(
            width = grid.width(),
            height = grid.height(),
            workers,
            iterations,
            transitions,
            ?policy,
            "starting simulation"
        );

        let barrier = GenerationBarrier::new(workers);
        let shared_snapshot = match policy {
            SnapshotPolicy::PerWorker => None,
            SnapshotPolicy::Shared => Some(SharedGrid::dead(grid.width(), grid.height())),
        };
        let ctx = WorkerContext {
            grid: &grid,
            shared_snapshot: shared_snapshot.as_ref(),
            barrier: &barrier,
            transitions,
        };

        let start = Instant::now();
        let results = thread::scope(|scope| {
            let mut results = Vec::with_capacity(workers);
            let mut handles = Vec::with_capacity(workers);
            for &part in &partitions {
                let ctx = &ctx;
                let observer = if part.rank == 0 { observer.take() } else { None };
                let spawned = thread::Builder::new()
                    .name(format!("life-worker-{}", part.rank))
                    .spawn_scoped(scope, move || run_worker(ctx, part, observer));
                match spawned {
                    Ok(handle) => handles.push((part.rank, handle)),
                    Err(source) => {
                        error!(rank = part.rank, %source, "failed to spawn worker");
                        barrier.break_barrier();
                        results.push(Err(LifeError::Spawn {
                            rank: part.rank,
                            source,
                        }));
                        break;
                    }
                }
            }
            for (rank, handle) in handles {
                results.push(
                    handle
                        .join()
                        .unwrap_or_else(|_| Err(LifeError::WorkerPanicked { rank })),
                );
            }
            results
        });
        let elapsed = start.elapsed();

        let mut stats = ApplyStats::default();
        let mut failure: Option<LifeError> = None;
        for result in results {
            match result {
                Ok(worker_stats) => stats.accumulate(worker_stats),
                Err(err) => {
                    // Report the worker that broke the barrier, not its peers.
                    let is_root_cause = !matches!(err, LifeError::BarrierBroken { .. });
                    let replace = failure.as_ref().is_none_or(|current| {
                        is_root_cause && matches!(current, LifeError::BarrierBroken { .. })
                    });
                    if replace {
                        failure = Some(err);
                    }
                }
            }
        }
        if let Some(err) = failure {
            error!(%err, "simulation aborted");
            return Err(err);
        }

        info!(
            elapsed_ms = elapsed.as_secs_f64() * 1000.0,
            writes = stats.writes(),
            "simulation finished"
        );

        Ok(RunReport {
            grid: grid.into_grid(),
            partitions,
            transitions,
            elapsed,
            stats,
        })
    }
}

fn run_worker<F>(
    ctx: &WorkerContext<'_>,
    part: Partition,
    mut observer: Option<F>,
) -> Result<ApplyStats>
where
    F: FnMut(u64, &Grid),
{
    let mut guard = BarrierGuard::new(ctx.barrier, part.rank);
    let broken = |_: BrokenBarrier| LifeError::BarrierBroken { rank: part.rank };
    let mut snapshot = Grid::new(ctx.grid.width(), ctx.grid.height());
    let mut stats = ApplyStats::default();

    debug!(
        rank = part.rank,
        start_row = part.start_row,
        end_row = part.end_row,
        "worker started"
    );

    let mut generation = 0u64;
    loop {
        // Barrier A: previous writes are done, the grid is consistent.
        ctx.barrier.wait().map_err(broken)?;

        match ctx.shared_snapshot {
            None => {
                ctx.grid.copy_into(&mut snapshot);
                if let Some(observe) = observer.as_mut() {
                    observe(generation, &snapshot);
                }
            }
            Some(shared) if part.rank == 0 => {
                shared.copy_from(ctx.grid);
                if let Some(observe) = observer.as_mut() {
                    shared.copy_into(&mut snapshot);
                    observe(generation, &snapshot);
                }
            }
            Some(_) => {}
        }

        // Barrier B: every snapshot is complete before anyone writes.
        if ctx.barrier.wait().map_err(broken)?.is_leader() {
            trace!(generation, "snapshots complete");
        }

        let applied = match ctx.shared_snapshot {
            None => apply_rows(&snapshot, ctx.grid, part.rows()),
            Some(shared) => apply_rows(shared, ctx.grid, part.rows()),
        };
        stats.accumulate(applied);

        generation += 1;
        if generation >= ctx.transitions {
            break;
        }
    }

    guard.disarm();
    debug!(
        rank = part.rank,
        generations = generation,
        writes = stats.writes(),
        "worker finished"
    );
    Ok(stats)
}
