//! Well-known patterns used for fixtures and example files

use super::Grid;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    /// 2x2 still life
    Block,
    /// Period-2 oscillator, horizontal phase
    Blinker,
    /// Period-2 oscillator made of two blocks
    Beacon,
    /// Period-4 spaceship moving down and to the right
    Glider,
}

impl Pattern {
    pub const ALL: [Pattern; 4] = [
        Pattern::Block,
        Pattern::Blinker,
        Pattern::Beacon,
        Pattern::Glider,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Pattern::Block => "block",
            Pattern::Blinker => "blinker",
            Pattern::Beacon => "beacon",
            Pattern::Glider => "glider",
        }
    }

    /// Live cells relative to the pattern's top-left corner
    pub fn cells(self) -> &'static [(usize, usize)] {
        match self {
            Pattern::Block => &[(0, 0), (0, 1), (1, 0), (1, 1)],
            Pattern::Blinker => &[(0, 0), (0, 1), (0, 2)],
            Pattern::Beacon => &[(0, 0), (0, 1), (1, 0), (2, 3), (3, 2), (3, 3)],
            Pattern::Glider => &[(0, 1), (1, 2), (2, 0), (2, 1), (2, 2)],
        }
    }

    /// Turn on the pattern's cells with its top-left corner at `(row, col)`.
    /// Cells past an edge wrap around.
    pub fn place(self, grid: &mut Grid, row: usize, col: usize) -> Result<()> {
        let (rows, cols) = (grid.rows(), grid.cols());
        for &(dr, dc) in self.cells() {
            grid.set((row + dr) % rows, (col + dc) % cols, true)?;
        }
        Ok(())
    }

    /// A `rows x cols` grid holding only this pattern at `(row, col)`
    pub fn on_grid(self, rows: usize, cols: usize, row: usize, col: usize) -> Result<Grid> {
        let mut grid = Grid::new(rows, cols)?;
        self.place(&mut grid, row, col)?;
        Ok(grid)
    }
}
