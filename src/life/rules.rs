//! Conway's Game of Life transition rules on a toroidal grid

use super::Grid;
use crate::error::Result;

/// What happens to a single cell over one generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fate {
    /// Alive with fewer than 2 neighbors
    Underpopulation,
    /// Alive with 2 or 3 neighbors
    Survival,
    /// Alive with more than 3 neighbors
    Overpopulation,
    /// Dead with exactly 3 neighbors
    Birth,
    /// Dead with any other count
    Barren,
}

impl Fate {
    /// Classify a cell from its current state and live-neighbor count
    pub fn of(alive: bool, neighbors: u8) -> Self {
        match (alive, neighbors) {
            (true, 0..=1) => Fate::Underpopulation,
            (true, 2..=3) => Fate::Survival,
            (true, _) => Fate::Overpopulation,
            (false, 3) => Fate::Birth,
            (false, _) => Fate::Barren,
        }
    }

    /// Whether the cell is alive in the next generation
    pub fn is_alive(self) -> bool {
        matches!(self, Fate::Survival | Fate::Birth)
    }
}

/// Compute the next generation.
///
/// Every cell is derived from the input grid only, so the result is the
/// simultaneous update of all cells. The input is left untouched.
pub fn advance(current: &Grid) -> Grid {
    let (rows, cols) = (current.rows(), current.cols());
    let mut cells = Vec::with_capacity(rows * cols);

    for row in 0..rows {
        for col in 0..cols {
            let neighbors = current.count_neighbors(row, col);
            cells.push(Fate::of(current.get(row, col), neighbors).is_alive());
        }
    }

    Grid::from_raw(rows, cols, cells)
}

/// Advance rows of raw `0`/`1` values by one generation.
///
/// The input is validated in full before any cell is computed.
pub fn advance_values(values: &[Vec<u8>]) -> Result<Vec<Vec<u8>>> {
    let grid = Grid::from_values(values.to_vec())?;
    Ok(advance(&grid).to_values())
}

/// Evolve the grid for multiple generations
pub fn evolve_generations(mut grid: Grid, generations: usize) -> Grid {
    for _ in 0..generations {
        grid = advance(&grid);
    }
    grid
}
