//! Toroidal Game of Life
//!
//! This library computes generations of Conway's Game of Life on a grid whose
//! edges wrap, and runs grids until they reach a fixed point.

pub mod config;
pub mod error;
pub mod life;
pub mod survey;
pub mod utils;

pub use config::Settings;
pub use error::{LifeError, Result};
pub use life::{advance, run_to_stable, Budget, Grid, Stabilization, StopReason};

/// Build the starting grid described by `settings` and run it to stability
pub fn stabilize_random(settings: &Settings) -> Result<Stabilization> {
    let grid = Grid::random(settings.grid.rows, settings.grid.cols, settings.grid.seed)?;
    Ok(run_to_stable(grid, &settings.budget()))
}
