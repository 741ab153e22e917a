//! File I/O operations for toroidal grids

use super::{Grid, Pattern};
use crate::config::OutputFormat;
use anyhow::{Context, Result};
use std::path::Path;

/// Load a grid from a text file.
/// Format: each line is a row, `1` for alive cells and `0` for dead cells.
pub fn load_grid_from_file<P: AsRef<Path>>(path: P) -> Result<Grid> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read grid file: {}", path.display()))?;

    let is_json = path.extension().is_some_and(|ext| ext == "json");
    let grid = if is_json {
        serde_json::from_str::<Grid>(&content).map_err(anyhow::Error::from)
    } else {
        parse_grid_from_string(&content)
    };
    grid.with_context(|| format!("Failed to parse grid from file: {}", path.display()))
}

/// Parse a grid from its text representation
pub fn parse_grid_from_string(content: &str) -> Result<Grid> {
    let lines: Vec<&str> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    if lines.is_empty() {
        anyhow::bail!("Grid file is empty or contains no valid rows");
    }

    let mut values = Vec::with_capacity(lines.len());
    for (row_idx, line) in lines.iter().enumerate() {
        let mut row = Vec::with_capacity(line.len());
        for (col_idx, ch) in line.chars().enumerate() {
            match ch {
                '0' => row.push(0),
                '1' => row.push(1),
                _ => anyhow::bail!(
                    "Invalid character '{}' at position ({}, {}). Only '0' and '1' are allowed",
                    ch,
                    row_idx,
                    col_idx
                ),
            }
        }
        values.push(row);
    }

    Ok(Grid::from_values(values)?)
}

/// Convert a grid to its text representation
pub fn grid_to_string(grid: &Grid) -> String {
    let mut result = String::with_capacity(grid.rows() * (grid.cols() + 1));
    for row in grid.to_values() {
        result.extend(row.iter().map(|&v| if v == 1 { '1' } else { '0' }));
        result.push('\n');
    }
    result
}

/// Save a grid to a file in the given format
pub fn save_grid_to_file<P: AsRef<Path>>(grid: &Grid, path: P, format: OutputFormat) -> Result<()> {
    let path = path.as_ref();
    let content = match format {
        OutputFormat::Text => grid_to_string(grid),
        OutputFormat::Json => {
            serde_json::to_string_pretty(grid).context("Failed to serialize grid")?
        }
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    std::fs::write(path, content)
        .with_context(|| format!("Failed to write grid to file: {}", path.display()))?;

    Ok(())
}

/// Write one text file per known pattern into `output_dir`
pub fn create_example_grids<P: AsRef<Path>>(output_dir: P) -> Result<()> {
    let dir = output_dir.as_ref();
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    for pattern in Pattern::ALL {
        let grid = pattern.on_grid(8, 8, 2, 2)?;
        let path = dir.join(format!("{}.txt", pattern.name()));
        save_grid_to_file(&grid, &path, OutputFormat::Text)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_grid_from_string() {
        let content = "010\n101\n010\n";
        let grid = parse_grid_from_string(content).unwrap();

        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.cols(), 3);
        assert_eq!(grid.living_count(), 4);
        assert!(grid.get(0, 1));
        assert!(grid.get(1, 0));
        assert!(grid.get(1, 2));
        assert!(grid.get(2, 1));
    }

    #[test]
    fn test_parse_ignores_blank_lines_and_padding() {
        let grid = parse_grid_from_string("\n  0110 \n\n1001\n").unwrap();
        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.cols(), 4);
    }

    #[test]
    fn test_grid_to_string() {
        let grid = Grid::from_values(vec![vec![0, 1, 0], vec![1, 0, 1]]).unwrap();
        assert_eq!(grid_to_string(&grid), "010\n101\n");
    }

    #[test]
    fn test_text_file_operations() {
        let temp_dir = tempdir().unwrap();
        let file_path = temp_dir.path().join("nested/test_grid.txt");

        let original = Grid::from_values(vec![vec![1, 0, 1], vec![0, 1, 0]]).unwrap();
        save_grid_to_file(&original, &file_path, OutputFormat::Text).unwrap();

        let loaded = load_grid_from_file(&file_path).unwrap();
        assert_eq!(original, loaded);
    }

    #[test]
    fn test_json_file_operations() {
        let temp_dir = tempdir().unwrap();
        let file_path = temp_dir.path().join("grid.json");

        let original = Grid::random(5, 7, Some(3)).unwrap();
        save_grid_to_file(&original, &file_path, OutputFormat::Json).unwrap();

        let loaded = load_grid_from_file(&file_path).unwrap();
        assert_eq!(original, loaded);
    }

    #[test]
    fn test_invalid_input() {
        assert!(parse_grid_from_string("010\n1X1\n010\n").is_err());
        assert!(parse_grid_from_string("010\n11\n010\n").is_err());
        assert!(parse_grid_from_string("").is_err());
        assert!(parse_grid_from_string("\n  \n").is_err());
    }

    #[test]
    fn test_missing_file() {
        let temp_dir = tempdir().unwrap();
        let err = load_grid_from_file(temp_dir.path().join("absent.txt")).unwrap_err();
        assert!(err.to_string().contains("Failed to read grid file"));
    }

    #[test]
    fn test_create_example_grids() {
        let temp_dir = tempdir().unwrap();
        create_example_grids(temp_dir.path()).unwrap();

        for name in ["block", "blinker", "beacon", "glider"] {
            assert!(temp_dir.path().join(format!("{}.txt", name)).exists());
        }

        let glider = load_grid_from_file(temp_dir.path().join("glider.txt")).unwrap();
        assert_eq!(glider.rows(), 8);
        assert_eq!(glider.cols(), 8);
        assert_eq!(glider.living_count(), 5);
    }
}
