//! The one cell buffer all workers read and write during a run.
//!
//! Cells are relaxed atomics: the generation barrier's mutex already orders
//! every write phase before the following snapshot phase, so the atomics only
//! have to make concurrent access to disjoint cells sound, not order it.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::grid::{CellSource, Grid};

#[derive(Debug)]
pub struct SharedGrid {
    width: usize,
    height: usize,
    cells: Box<[AtomicBool]>,
}

impl SharedGrid {
    pub fn from_grid(grid: &Grid) -> Self {
        Self {
            width: grid.width(),
            height: grid.height(),
            cells: grid.cells().iter().map(|&alive| AtomicBool::new(alive)).collect(),
        }
    }

    pub fn dead(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: (0..width * height).map(|_| AtomicBool::new(false)).collect(),
        }
    }

    #[inline]
    pub fn load(&self, index: usize) -> bool {
        self.cells[index].load(Ordering::Relaxed)
    }

    #[inline]
    pub fn store(&self, index: usize, alive: bool) {
        self.cells[index].store(alive, Ordering::Relaxed);
    }

    /// Overwrite `dst` with the full current contents.
    pub fn copy_into(&self, dst: &mut Grid) {
        debug_assert_eq!(dst.len(), self.cells.len());
        for (out, cell) in dst.cells_mut().iter_mut().zip(self.cells.iter()) {
            *out = cell.load(Ordering::Relaxed);
        }
    }

    /// Overwrite every cell with the contents of `src`.
    pub fn copy_from(&self, src: &SharedGrid) {
        debug_assert_eq!(src.cells.len(), self.cells.len());
        for (out, cell) in self.cells.iter().zip(src.cells.iter()) {
            out.store(cell.load(Ordering::Relaxed), Ordering::Relaxed);
        }
    }

    pub fn to_grid(&self) -> Grid {
        let mut grid = Grid::new(self.width, self.height);
        self.copy_into(&mut grid);
        grid
    }

    pub fn into_grid(self) -> Grid {
        let mut grid = Grid::new(self.width, self.height);
        for (out, cell) in grid.cells_mut().iter_mut().zip(self.cells.into_vec()) {
            *out = cell.into_inner();
        }
        grid
    }
}

impl CellSource for SharedGrid {
    #[inline]
    fn width(&self) -> usize {
        self.width
    }

    #[inline]
    fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn is_alive_at(&self, index: usize) -> bool {
        self.load(index)
    }
}
