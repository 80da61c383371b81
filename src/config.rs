//! World description loading.
//!
//! A world file is a stream of whitespace-separated unsigned integers:
//!
//! ```text
//! width height iterations live_cell_count
//! x y
//! x y
//! ...
//! ```
//!
//! The number of `x y` pairs must equal `live_cell_count` exactly.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{ConfigError, LifeError, Result};
use crate::grid::Grid;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorldConfig {
    pub width: usize,
    pub height: usize,
    pub iterations: u64,
    /// Initial live cells, in file order. Duplicates are allowed.
    pub live_cells: Vec<(usize, usize)>,
}

impl WorldConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&text)?;
        debug!(
            path = %path.display(),
            width = config.width,
            height = config.height,
            iterations = config.iterations,
            live = config.live_cells.len(),
            "loaded world"
        );
        Ok(config)
    }

    pub fn parse(text: &str) -> Result<Self> {
        let mut tokens = text.split_whitespace();
        let width = header(&mut tokens, "width")?;
        let height = header(&mut tokens, "height")?;
        let iterations = header(&mut tokens, "iterations")?;
        let declared = header(&mut tokens, "live cell count")? as usize;

        if width == 0 || height == 0 {
            return Err(ConfigError::EmptyGrid {
                width: width as usize,
                height: height as usize,
            }
            .into());
        }
        let (width, height, cells) = grid_dimensions(width, height)?;

        let mut live_cells = Vec::with_capacity(declared.min(cells));
        let mut supplied = 0usize;
        while let Some(x_token) = tokens.next() {
            let Some(y_token) = tokens.next() else {
                // A dangling x is an incomplete pair, never silently dropped.
                return Err(LifeError::State {
                    declared,
                    supplied: supplied + 1,
                });
            };
            supplied += 1;
            if supplied > declared {
                continue;
            }
            let x = number(x_token, "x")?;
            let y = number(y_token, "y")?;
            if x >= width as u64 || y >= height as u64 {
                return Err(ConfigError::CellOutOfBounds {
                    x,
                    y,
                    width,
                    height,
                }
                .into());
            }
            live_cells.push((x as usize, y as usize));
        }

        if supplied != declared {
            return Err(LifeError::State { declared, supplied });
        }

        Ok(Self {
            width,
            height,
            iterations,
            live_cells,
        })
    }

    pub fn to_grid(&self) -> Grid {
        Grid::from_live_cells(self.width, self.height, self.live_cells.iter().copied())
    }
}

/// Both dimensions as `usize` plus the cell count, which must be addressable.
fn grid_dimensions(width: u64, height: u64) -> Result<(usize, usize, usize)> {
    let too_large = || ConfigError::GridTooLarge { width, height };
    let w = usize::try_from(width).map_err(|_| too_large())?;
    let h = usize::try_from(height).map_err(|_| too_large())?;
    let cells = w
        .checked_mul(h)
        .filter(|&cells| cells <= isize::MAX as usize)
        .ok_or_else(too_large)?;
    Ok((w, h, cells))
}

fn header<'a>(tokens: &mut impl Iterator<Item = &'a str>, field: &'static str) -> Result<u64> {
    let token = tokens.next().ok_or(ConfigError::MissingField(field))?;
    number(token, field)
}

fn number(token: &str, field: &'static str) -> Result<u64> {
    token.parse::<u64>().map_err(|_| {
        ConfigError::InvalidNumber {
            field,
            token: token.to_string(),
        }
        .into()
    })
}
