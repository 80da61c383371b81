//! Flat toroidal cell grid and Moore-neighborhood counting.
//!
//! Cells are stored row-major: `(x, y)` lives at `y * width + x`. Coordinates
//! one step outside the grid wrap to the opposite edge, so every cell has
//! exactly eight neighbors, corners included.

/// The eight Moore-neighborhood offsets `(dx, dy)`.
#[rustfmt::skip]
pub const NEIGHBOR_OFFSETS: [(i64, i64); 8] = [
    (-1, -1), (0, -1), (1, -1),
    (-1,  0),          (1,  0),
    (-1,  1), (0,  1), (1,  1),
];

/// Read access to a `width x height` row-major cell buffer.
///
/// Implemented by the owned [`Grid`] and by the shared buffer the parallel
/// engine writes into, so neighbor counting works against either.
pub trait CellSource {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn is_alive_at(&self, index: usize) -> bool;
}

/// Wrap `(x, y)` onto the torus and return its linear index.
///
/// Inputs must be within one period of the valid range, i.e.
/// `-width <= x < 2 * width`; a single add or subtract is applied per axis.
#[inline]
pub fn resolve(x: i64, y: i64, width: usize, height: usize) -> usize {
    let w = width as i64;
    let h = height as i64;
    debug_assert!(x >= -w && x < 2 * w, "x={x} more than one period outside 0..{w}");
    debug_assert!(y >= -h && y < 2 * h, "y={y} more than one period outside 0..{h}");

    let x = if x < 0 {
        x + w
    } else if x >= w {
        x - w
    } else {
        x
    };
    let y = if y < 0 {
        y + h
    } else if y >= h {
        y - h
    } else {
        y
    };
    (y * w + x) as usize
}

/// Linear indices of the eight wrapped neighbors of `(x, y)`.
#[inline]
pub fn neighbor_indices(x: usize, y: usize, width: usize, height: usize) -> [usize; 8] {
    let (x, y) = (x as i64, y as i64);
    NEIGHBOR_OFFSETS.map(|(dx, dy)| resolve(x + dx, y + dy, width, height))
}

/// Number of live cells among the eight wrapped neighbors of `(x, y)`.
#[inline]
pub fn count_live_neighbors<S: CellSource + ?Sized>(source: &S, x: usize, y: usize) -> u8 {
    neighbor_indices(x, y, source.width(), source.height())
        .into_iter()
        .filter(|&i| source.is_alive_at(i))
        .count() as u8
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl Grid {
    /// An all-dead grid. Callers validate that both dimensions are non-zero.
    ///
    /// # Panics
    /// If `width * height` overflows `usize`.
    pub fn new(width: usize, height: usize) -> Self {
        let len = width
            .checked_mul(height)
            .unwrap_or_else(|| panic!("{width}x{height} grid overflows usize"));
        Self {
            width,
            height,
            cells: vec![false; len],
        }
    }

    /// Build a grid with the given cells alive. Duplicates are harmless.
    ///
    /// # Panics
    /// If a coordinate lies outside the grid.
    pub fn from_live_cells<I>(width: usize, height: usize, cells: I) -> Self
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        let mut grid = Self::new(width, height);
        for (x, y) in cells {
            grid.set(x, y, true);
        }
        grid
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Linear index of an in-bounds coordinate.
    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        assert!(
            x < self.width && y < self.height,
            "({x}, {y}) outside {}x{} grid",
            self.width,
            self.height
        );
        y * self.width + x
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.cells[self.index(x, y)]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, alive: bool) {
        let idx = self.index(x, y);
        self.cells[idx] = alive;
    }

    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [bool] {
        &mut self.cells
    }

    pub fn row(&self, y: usize) -> &[bool] {
        &self.cells[y * self.width..(y + 1) * self.width]
    }

    pub fn population(&self) -> u64 {
        self.cells.iter().filter(|&&alive| alive).count() as u64
    }

    /// Live cells as `(x, y)` in row-major order.
    pub fn live_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &alive)| alive)
            .map(move |(i, _)| (i % width, i / width))
    }
}

impl CellSource for Grid {
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
        self.cells[index]
    }
}
