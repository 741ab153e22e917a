//! Toroidal grid representation and utilities

use crate::error::{LifeError, Result};
use itertools::Itertools;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The 8 Moore-neighborhood offsets as `(d_row, d_col)`.
pub const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// A dense `rows x cols` grid of cells whose edges wrap in both dimensions.
///
/// Cells are stored row-major, `true` for alive. Every constructor checks
/// that both dimensions are at least 1, that the cell count can be allocated
/// and that the input is rectangular, so any `Grid` value can be advanced
/// without further validation.
///
/// On the wire a grid is an array of rows of `0`/`1` integers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<u8>>", into = "Vec<Vec<u8>>")]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<bool>,
}

impl Grid {
    /// Create a grid with every cell dead
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        let mut cells = reserve_cells(rows, cols)?;
        cells.resize(rows * cols, false);
        Ok(Self { rows, cols, cells })
    }

    /// Create a grid from rows of cell states
    pub fn from_cells(cells: Vec<Vec<bool>>) -> Result<Self> {
        let (rows, cols) = rectangular_shape(&cells)?;
        Ok(Self {
            rows,
            cols,
            cells: cells.into_iter().flatten().collect(),
        })
    }

    /// Create a grid from rows of `0`/`1` values.
    ///
    /// Any other value is rejected rather than clamped.
    pub fn from_values(values: Vec<Vec<u8>>) -> Result<Self> {
        let (rows, cols) = rectangular_shape(&values)?;
        let mut cells = Vec::with_capacity(rows * cols);
        for (row, line) in values.iter().enumerate() {
            for (col, &value) in line.iter().enumerate() {
                cells.push(cell_from_value(value).ok_or_else(|| {
                    LifeError::invalid(format!(
                        "Cell ({}, {}) has value {}, expected 0 or 1",
                        row, col, value
                    ))
                })?);
            }
        }
        Ok(Self { rows, cols, cells })
    }

    /// Create a grid whose cells are independently alive with probability 1/2.
    ///
    /// The same `seed` always yields the same grid; `None` seeds from entropy.
    pub fn random(rows: usize, cols: usize, seed: Option<u64>) -> Result<Self> {
        let mut cells = reserve_cells(rows, cols)?;
        let mut rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        cells.extend((0..rows * cols).map(|_| rng.gen::<bool>()));
        Ok(Self { rows, cols, cells })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Convert 2D coordinates to the row-major index
    #[inline]
    fn index(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    /// Get cell state at coordinates. Coordinates wrap around the torus.
    pub fn get(&self, row: usize, col: usize) -> bool {
        self.cells[self.index(row % self.rows, col % self.cols)]
    }

    /// Set cell state at coordinates
    pub fn set(&mut self, row: usize, col: usize, alive: bool) -> Result<()> {
        if row >= self.rows || col >= self.cols {
            return Err(LifeError::invalid(format!(
                "Coordinates ({}, {}) out of bounds for {}x{} grid",
                row, col, self.rows, self.cols
            )));
        }
        let idx = self.index(row, col);
        self.cells[idx] = alive;
        Ok(())
    }

    /// Count living neighbors of a cell, wrapping at every edge.
    ///
    /// On grids thinner than 3 cells the same physical cell can appear under
    /// several offsets and is counted once per offset.
    pub fn count_neighbors(&self, row: usize, col: usize) -> u8 {
        let mut count = 0;
        for (dr, dc) in NEIGHBOR_OFFSETS {
            let r = wrap(row, dr, self.rows);
            let c = wrap(col, dc, self.cols);
            if self.cells[self.index(r, c)] {
                count += 1;
            }
        }
        count
    }

    /// Get all living cell coordinates
    pub fn living_cells(&self) -> Vec<(usize, usize)> {
        (0..self.rows)
            .cartesian_product(0..self.cols)
            .filter(|&(row, col)| self.get(row, col))
            .collect()
    }

    /// Count total living cells
    pub fn living_count(&self) -> usize {
        self.cells.iter().filter(|&&cell| cell).count()
    }

    /// Check if the grid has no living cells
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|&cell| !cell)
    }

    /// Rows of `0`/`1` values, the inverse of [`Grid::from_values`]
    pub fn to_values(&self) -> Vec<Vec<u8>> {
        self.cells
            .chunks(self.cols)
            .map(|row| row.iter().map(|&alive| u8::from(alive)).collect())
            .collect()
    }

    pub(crate) fn from_raw(rows: usize, cols: usize, cells: Vec<bool>) -> Self {
        debug_assert_eq!(cells.len(), rows * cols);
        Self { rows, cols, cells }
    }
}

/// Number of cells in a `rows x cols` grid, rejecting zero and overflowing sizes
fn check_dimensions(rows: usize, cols: usize) -> Result<usize> {
    if rows == 0 || cols == 0 {
        return Err(LifeError::invalid(format!(
            "Grid dimensions must be positive, got {}x{}",
            rows, cols
        )));
    }
    rows.checked_mul(cols).ok_or_else(|| {
        LifeError::invalid(format!("Grid dimensions {}x{} overflow the cell count", rows, cols))
    })
}

/// An empty cell buffer with room for a `rows x cols` grid
fn reserve_cells(rows: usize, cols: usize) -> Result<Vec<bool>> {
    let count = check_dimensions(rows, cols)?;
    let mut cells = Vec::new();
    cells.try_reserve_exact(count).map_err(|_| {
        LifeError::invalid(format!("Grid of {}x{} cells does not fit in memory", rows, cols))
    })?;
    Ok(cells)
}

fn rectangular_shape<T>(rows: &[Vec<T>]) -> Result<(usize, usize)> {
    let height = rows.len();
    let width = rows.first().map_or(0, Vec::len);
    check_dimensions(height, width)?;

    for (i, row) in rows.iter().enumerate() {
        if row.len() != width {
            return Err(LifeError::invalid(format!(
                "Row {} has length {}, expected {}",
                i,
                row.len(),
                width
            )));
        }
    }
    Ok((height, width))
}

fn cell_from_value(value: u8) -> Option<bool> {
    match value {
        0 => Some(false),
        1 => Some(true),
        _ => None,
    }
}

#[inline]
fn wrap(index: usize, offset: isize, len: usize) -> usize {
    (index as isize + offset).rem_euclid(len as isize) as usize
}

impl TryFrom<Vec<Vec<u8>>> for Grid {
    type Error = LifeError;

    fn try_from(values: Vec<Vec<u8>>) -> Result<Self> {
        Self::from_values(values)
    }
}

impl From<Grid> for Vec<Vec<u8>> {
    fn from(grid: Grid) -> Self {
        grid.to_values()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.cols) {
            let line: String = row
                .iter()
                .map(|&alive| if alive { '⬛' } else { '⬜' })
                .collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
