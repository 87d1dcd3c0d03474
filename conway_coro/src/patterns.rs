// patterns.rs - Named starting patterns and random fill

use crate::grid::{CellState, Grid};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Live cells given as (row, col) offsets from the pattern origin.
#[derive(Debug)]
pub struct Pattern {
    pub name: &'static str,
    pub cells: &'static [(usize, usize)],
}

pub const BLOCK: Pattern = Pattern {
    name: "Block",
    cells: &[(0, 0), (0, 1), (1, 0), (1, 1)],
};

pub const BLINKER: Pattern = Pattern {
    name: "Blinker",
    cells: &[(0, 0), (0, 1), (0, 2)],
};

pub const GLIDER: Pattern = Pattern {
    name: "Glider",
    cells: &[(0, 1), (1, 2), (2, 0), (2, 1), (2, 2)],
};

pub const BEACON: Pattern = Pattern {
    name: "Beacon",
    cells: &[(0, 0), (0, 1), (1, 0), (1, 1), (2, 2), (2, 3), (3, 2), (3, 3)],
};

pub const R_PENTOMINO: Pattern = Pattern {
    name: "R-pentomino",
    cells: &[(0, 1), (0, 2), (1, 0), (1, 1), (2, 1)],
};

pub const PATTERNS: &[Pattern] = &[BLOCK, BLINKER, GLIDER, BEACON, R_PENTOMINO];

pub fn find(name: &str) -> Option<&'static Pattern> {
    PATTERNS.iter().find(|p| p.name.eq_ignore_ascii_case(name))
}

/// Stamps a pattern with its origin at (row, col). Cells past an edge wrap around.
pub fn place(grid: &mut Grid, pattern: &Pattern, row: usize, col: usize) {
    let (h, w) = (grid.height(), grid.width());
    for &(dr, dc) in pattern.cells {
        grid.set((row + dr) % h, (col + dc) % w, CellState::Alive);
    }
}

/// Fills the grid with roughly one live cell in three, reproducible from `seed_value`.
pub fn random_fill(grid: &mut Grid, seed_value: u32) {
    // Simple pseudo-random generator
    let mut hasher = DefaultHasher::new();
    seed_value.hash(&mut hasher);
    let mut seed = hasher.finish();

    for row in 0..grid.height() {
        for col in 0..grid.width() {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let state = if (seed >> 33) % 3 == 0 { CellState::Alive } else { CellState::Dead };
            grid.set(row, col, state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Coord;

    #[test]
    fn place_wraps_past_the_edges() {
        let mut grid = Grid::new(4, 4);
        place(&mut grid, &BLOCK, 3, 3);
        assert_eq!(
            grid.alive_cells(),
            vec![Coord::new(0, 0), Coord::new(0, 3), Coord::new(3, 0), Coord::new(3, 3)]
        );
    }

    #[test]
    fn find_is_case_insensitive() {
        assert_eq!(find("glider").map(|p| p.name), Some("Glider"));
        assert!(find("spaceship").is_none());
    }

    #[test]
    fn random_fill_is_reproducible() {
        let mut a = Grid::new(16, 16);
        let mut b = Grid::new(16, 16);
        random_fill(&mut a, 7);
        random_fill(&mut b, 7);
        assert_eq!(a, b);
        assert!(a.alive_count() > 0 && a.alive_count() < 256);
    }
}
