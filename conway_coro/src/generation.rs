// generation.rs - Game of Life rule applied to a band of rows on the torus

use std::ops::Range;

use crate::grid::{CellState, Grid};

const NEIGHBOURS: [(isize, isize); 8] = [
    (-1, -1), (-1, 0), (-1, 1),
    ( 0, -1),          ( 0, 1),
    ( 1, -1), ( 1, 0), ( 1, 1),
];

/// Live Moore neighbours of (row, col), wrapping around every edge.
pub fn live_neighbours(grid: &Grid, row: usize, col: usize) -> usize {
    NEIGHBOURS
        .iter()
        .filter(|&&(dr, dc)| grid.get_wrapped(row, col, dr, dc).is_alive())
        .count()
}

pub fn next_state(current: CellState, count: usize) -> CellState {
    match (current, count) {
        (CellState::Alive, 2) | (CellState::Alive, 3) => CellState::Alive, // Survival
        (CellState::Dead, 3)                          => CellState::Alive, // Birth
        _                                             => CellState::Dead,  // Death or stays dead
    }
}

/// Next-generation cells for `rows` only, row-major, `rows.len() * width` long.
///
/// Reads `grid` and nothing else, so any number of calls may share it.
pub fn compute_rows(rows: Range<usize>, grid: &Grid) -> Vec<CellState> {
    let mut out = Vec::with_capacity(rows.len() * grid.width());
    for row in rows {
        for col in 0..grid.width() {
            let count = live_neighbours(grid, row, col);
            out.push(next_state(grid.get(row, col), count));
        }
    }
    out
}

/// Whole-grid step on the calling thread.
pub fn step(grid: &Grid) -> Grid {
    let cells = compute_rows(0..grid.height(), grid);
    Grid::from_cells(grid.width(), grid.height(), cells)
}
