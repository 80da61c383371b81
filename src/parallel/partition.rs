//! Row partitioning across a fixed set of workers.

use std::fmt;
use std::ops::Range;

use crate::error::ConfigError;

/// A contiguous, inclusive row range owned by one worker for the whole run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Partition {
    pub rank: usize,
    pub start_row: usize,
    pub end_row: usize,
}

impl Partition {
    #[inline]
    pub fn row_count(&self) -> usize {
        self.end_row - self.start_row + 1
    }

    /// The owned rows as a half-open range.
    #[inline]
    pub fn rows(&self) -> Range<usize> {
        self.start_row..self.end_row + 1
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "tid {}, rows: {} -> {} ({})",
            self.rank,
            self.start_row,
            self.end_row,
            self.row_count()
        )
    }
}

/// Split `height` rows into `workers` contiguous blocks in rank order.
///
/// Every worker gets `height / workers` rows and the first
/// `height % workers` workers get one more. Fails when a worker would
/// receive no rows.
pub fn partition(height: usize, workers: usize) -> Result<Vec<Partition>, ConfigError> {
    if workers == 0 {
        return Err(ConfigError::ZeroWorkers);
    }
    if workers > height {
        return Err(ConfigError::TooManyWorkers { workers, height });
    }

    let base = height / workers;
    let extra = height % workers;
    let mut next_row = 0;
    let partitions = (0..workers)
        .map(|rank| {
            let rows = base + usize::from(rank < extra);
            let part = Partition {
                rank,
                start_row: next_row,
                end_row: next_row + rows - 1,
            };
            next_row += rows;
            part
        })
        .collect();

    debug_assert_eq!(next_row, height);
    Ok(partitions)
}
