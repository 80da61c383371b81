//! Text rendering of the board.

use std::io::{self, Write};

use crate::grid::Grid;

pub const LIVE_CHAR: char = '@';
pub const DEAD_CHAR: char = '.';

fn push_row(line: &mut String, row: &[bool]) {
    line.extend(
        row.iter()
            .map(|&alive| if alive { LIVE_CHAR } else { DEAD_CHAR }),
    );
    line.push('\n');
}

/// Write `height` lines of `width` cells.
pub fn render<W: Write>(grid: &Grid, out: &mut W) -> io::Result<()> {
    let mut line = String::with_capacity(grid.width() + 1);
    for y in 0..grid.height() {
        line.clear();
        push_row(&mut line, grid.row(y));
        out.write_all(line.as_bytes())?;
    }
    Ok(())
}

/// Clear the terminal and draw one generation.
pub fn render_frame<W: Write>(generation: u64, grid: &Grid, out: &mut W) -> io::Result<()> {
    out.write_all(b"\x1b[2J\x1b[H")?;
    writeln!(out, "Time step: {generation}")?;
    render(grid, out)?;
    out.flush()
}

pub fn render_to_string(grid: &Grid) -> String {
    let mut text = String::with_capacity((grid.width() + 1) * grid.height());
    for y in 0..grid.height() {
        push_row(&mut text, grid.row(y));
    }
    text
}
