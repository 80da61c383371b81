//! Double-buffered reference stepper.
//!
//! Writes every cell of a fresh buffer each generation, rows spread over a
//! rayon pool. It shares the neighborhood and rule code with the barrier
//! engine but none of its synchronization, which makes it the oracle for
//! parity checks and benchmarks.

use rayon::prelude::*;

use crate::error::{ConfigError, Result};
use crate::grid::{Grid, count_live_neighbors};
use crate::rules::next_state;

pub struct ReferenceLife {
    current: Grid,
    next: Grid,
    generation: u64,
    pool: rayon::ThreadPool,
}

impl ReferenceLife {
    /// A stepper on a pool sized by rayon's defaults.
    pub fn new(grid: Grid) -> Result<Self> {
        Self::build(grid, rayon::ThreadPoolBuilder::new())
    }

    pub fn with_threads(grid: Grid, threads: usize) -> Result<Self> {
        Self::build(grid, rayon::ThreadPoolBuilder::new().num_threads(threads.max(1)))
    }

    fn build(grid: Grid, builder: rayon::ThreadPoolBuilder) -> Result<Self> {
        if grid.is_empty() {
            return Err(ConfigError::EmptyGrid {
                width: grid.width(),
                height: grid.height(),
            }
            .into());
        }
        let pool = builder
            .thread_name(|i| format!("life-reference-{i}"))
            .build()?;
        let next = Grid::new(grid.width(), grid.height());
        Ok(Self {
            current: grid,
            next,
            generation: 0,
            pool,
        })
    }

    pub fn step(&mut self) {
        let width = self.current.width();
        let current = &self.current;
        let next = &mut self.next;
        self.pool.install(|| {
            next.cells_mut()
                .par_chunks_mut(width)
                .enumerate()
                .for_each(|(y, row)| {
                    for (x, cell) in row.iter_mut().enumerate() {
                        let neighbors = count_live_neighbors(current, x, y);
                        *cell = next_state(current.get(x, y), neighbors);
                    }
                });
        });
        std::mem::swap(&mut self.current, &mut self.next);
        self.generation += 1;
    }

    pub fn step_n(&mut self, n: u64) {
        for _ in 0..n {
            self.step();
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.current
    }

    pub fn population(&self) -> u64 {
        self.current.population()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}
