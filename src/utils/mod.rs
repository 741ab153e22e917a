//! Display utilities

pub mod display;

pub use display::{Animator, Color, ColorOutput, GridFormatter};
