// grid.rs - Toroidal grid types for Conway's Game of Life

use std::fmt;
use std::ops::Range;

/// Byte written for a live cell at the I/O boundary.
pub const ALIVE_BYTE: u8 = 255;
/// Byte written for a dead cell at the I/O boundary.
pub const DEAD_BYTE: u8 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellState {
    #[default]
    Dead,
    Alive,
}

impl CellState {
    pub fn is_alive(self) -> bool {
        self == CellState::Alive
    }

    /// Any non-zero byte counts as alive.
    pub fn from_byte(byte: u8) -> Self {
        if byte == DEAD_BYTE { CellState::Dead } else { CellState::Alive }
    }

    pub fn to_byte(self) -> u8 {
        match self {
            CellState::Alive => ALIVE_BYTE,
            CellState::Dead  => DEAD_BYTE,
        }
    }
}

/// A (row, col) position on the torus, 0-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Row-major H x W grid of cells. Both dimensions are non-zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<CellState>,
}

impl Grid {
    /// All-dead grid.
    pub fn new(width: usize, height: usize) -> Self {
        assert!(width > 0 && height > 0, "grid dimensions must be non-zero");
        Self { width, height, cells: vec![CellState::Dead; width * height] }
    }

    /// Builds a grid from already computed row-major cells.
    pub fn from_cells(width: usize, height: usize, cells: Vec<CellState>) -> Self {
        assert!(width > 0 && height > 0, "grid dimensions must be non-zero");
        assert_eq!(cells.len(), width * height, "cell count does not match dimensions");
        Self { width, height, cells }
    }

    /// Decodes a byte-per-cell row-major stream. The caller checks the length.
    pub fn from_bytes(width: usize, height: usize, bytes: &[u8]) -> Self {
        let cells = bytes.iter().map(|&b| CellState::from_byte(b)).collect();
        Self::from_cells(width, height, cells)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.cells.iter().map(|c| c.to_byte()).collect()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, row: usize, col: usize) -> CellState {
        self.cells[row * self.width + col]
    }

    pub fn set(&mut self, row: usize, col: usize, state: CellState) {
        self.cells[row * self.width + col] = state;
    }

    /// Cell at a signed offset from (row, col), wrapping around both edges.
    pub fn get_wrapped(&self, row: usize, col: usize, dr: isize, dc: isize) -> CellState {
        let r = (row as isize + dr).rem_euclid(self.height as isize) as usize;
        let c = (col as isize + dc).rem_euclid(self.width as isize) as usize;
        self.get(r, c)
    }

    pub fn rows(&self, range: Range<usize>) -> &[CellState] {
        &self.cells[range.start * self.width..range.end * self.width]
    }

    pub fn cells(&self) -> &[CellState] {
        &self.cells
    }

    pub fn alive_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_alive()).count()
    }

    /// Live cells in row-major order.
    pub fn alive_cells(&self) -> Vec<Coord> {
        self.coords().filter(|&c| self.get(c.row, c.col).is_alive()).collect()
    }

    /// Coordinates whose state differs from `other`, in row-major order.
    pub fn diff(&self, other: &Grid) -> Vec<Coord> {
        debug_assert_eq!((self.width, self.height), (other.width, other.height));
        self.coords()
            .filter(|&c| self.get(c.row, c.col) != other.get(c.row, c.col))
            .collect()
    }

    fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        (0..self.height).flat_map(move |row| (0..self.width).map(move |col| Coord::new(row, col)))
    }
}
