//! Game of Life on a toroidal grid

pub mod grid;
pub mod io;
pub mod patterns;
pub mod rules;
pub mod stabilize;

pub use grid::Grid;
pub use io::{create_example_grids, load_grid_from_file, save_grid_to_file};
pub use patterns::Pattern;
pub use rules::{advance, advance_values, evolve_generations, Fate};
pub use stabilize::{run_to_stable, Budget, Stabilization, StabilizationDriver, StopReason};
