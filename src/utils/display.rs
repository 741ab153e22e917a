//! Terminal rendering of grids and the animation loop

use crate::life::{advance, Grid, Stabilization, StopReason};
use anyhow::{Context, Result};
use itertools::Itertools;
use std::io::Write;
use std::time::Duration;

const ALIVE: char = '█';
const DEAD: char = '·';

/// ANSI sequence that clears the screen and homes the cursor
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Format grids and run outcomes for display
pub struct GridFormatter;

impl GridFormatter {
    /// Format a grid in compact form, one character per cell
    pub fn format_grid_compact(grid: &Grid) -> String {
        let mut output = (0..grid.rows())
            .map(|row| {
                (0..grid.cols())
                    .map(|col| if grid.get(row, col) { ALIVE } else { DEAD })
                    .collect::<String>()
            })
            .join("\n");
        output.push('\n');
        output
    }

    /// Format a grid with row and column numbers
    pub fn format_grid_with_coords(grid: &Grid) -> String {
        let mut output = String::new();

        output.push_str("   ");
        for col in 0..grid.cols() {
            output.push_str(&format!("{:2}", col % 10));
        }
        output.push('\n');

        for row in 0..grid.rows() {
            output.push_str(&format!("{:2} ", row));
            for col in 0..grid.cols() {
                output.push_str(if grid.get(row, col) { "██" } else { "··" });
            }
            output.push('\n');
        }

        output
    }

    /// One-line description of a stabilization outcome
    pub fn format_outcome(outcome: &Stabilization) -> String {
        match outcome {
            Stabilization::Stabilized { grid, generations } => format!(
                "Stabilized after {} generation(s) with {} living cell(s)",
                generations,
                grid.living_count()
            ),
            Stabilization::NotStabilized {
                generations,
                reason,
                ..
            } => {
                let why = match reason {
                    StopReason::BudgetExhausted => "generation budget exhausted",
                    StopReason::TimedOut => "timed out",
                    StopReason::Cancelled => "cancelled",
                };
                format!("Not stabilized after {} generation(s): {}", generations, why)
            }
        }
    }
}

/// Plays successive generations as terminal frames
pub struct Animator {
    frames: usize,
    pause: Duration,
    clear: bool,
}

impl Animator {
    pub fn new(frames: usize, pause: Duration) -> Self {
        Self {
            frames,
            pause,
            clear: true,
        }
    }

    /// Keep previous frames on screen instead of clearing between them
    pub fn without_clearing(mut self) -> Self {
        self.clear = false;
        self
    }

    /// Advance `grid` once per frame, drawing each new generation to `out`.
    ///
    /// Sleeps for the pause between frames but not after the last one.
    /// Returns the final generation.
    pub fn play<W: Write>(&self, mut grid: Grid, out: &mut W) -> Result<Grid> {
        for step in 0..self.frames {
            grid = advance(&grid);
            self.draw_frame(&grid, step + 1, out)?;

            if step + 1 < self.frames && !self.pause.is_zero() {
                std::thread::sleep(self.pause);
            }
        }
        Ok(grid)
    }

    fn draw_frame<W: Write>(&self, grid: &Grid, step: usize, out: &mut W) -> Result<()> {
        if self.clear {
            write!(out, "{}", CLEAR_SCREEN)?;
        }
        writeln!(out, "Board State at Step {}", step)?;
        write!(out, "{}", GridFormatter::format_grid_compact(grid))?;
        out.flush().context("Failed to flush frame")?;
        Ok(())
    }
}

/// Color output utilities
pub struct ColorOutput;

impl ColorOutput {
    /// Format text with color (if terminal supports it)
    pub fn colored(text: &str, color: Color) -> String {
        if Self::supports_color() {
            format!("\x1b[{}m{}\x1b[0m", color.code(), text)
        } else {
            text.to_string()
        }
    }

    /// Check if terminal supports color
    fn supports_color() -> bool {
        std::env::var("NO_COLOR").is_err() && (std::env::var("TERM").unwrap_or_default() != "dumb")
    }

    pub fn success(text: &str) -> String {
        Self::colored(text, Color::Green)
    }

    pub fn warning(text: &str) -> String {
        Self::colored(text, Color::Yellow)
    }

    pub fn info(text: &str) -> String {
        Self::colored(text, Color::Blue)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Color {
    Green,
    Yellow,
    Blue,
}

impl Color {
    fn code(self) -> u8 {
        match self {
            Color::Green => 32,
            Color::Yellow => 33,
            Color::Blue => 34,
        }
    }
}
