//! Command line front end for the toroidal Game of Life

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Instant;
use toroidal_life::{
    config::{CliOverrides, OutputFormat, Settings},
    life::{
        create_example_grids, evolve_generations, load_grid_from_file, save_grid_to_file, Grid,
        Stabilization, StabilizationDriver,
    },
    survey::survey,
    utils::{Animator, ColorOutput, GridFormatter},
};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "toroidal_life")]
#[command(about = "Conway's Game of Life on a wrapping grid")]
#[command(version = "0.1.0")]
struct Cli {
    /// Verbose logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Where the starting grid comes from
#[derive(Args, Debug, Clone)]
struct GridSource {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.yaml")]
    config: PathBuf,

    /// Starting grid file (.txt or .json); random when omitted
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Rows of a random grid (overrides config)
    #[arg(long)]
    rows: Option<usize>,

    /// Columns of a random grid (overrides config)
    #[arg(long)]
    cols: Option<usize>,

    /// Seed of a random grid (overrides config)
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a grid until it stops changing
    Stabilize {
        #[command(flatten)]
        source: GridSource,

        /// Maximum generations to compute (overrides config)
        #[arg(short, long)]
        max_generations: Option<usize>,

        /// Output directory (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Animate a grid in the terminal
    Animate {
        #[command(flatten)]
        source: GridSource,

        /// Number of frames (overrides config)
        #[arg(short, long)]
        frames: Option<usize>,

        /// Pause between frames in milliseconds (overrides config)
        #[arg(short, long)]
        pause_ms: Option<u64>,
    },

    /// Stabilize many seeded random grids in parallel
    Survey {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Rows of each random grid (overrides config)
        #[arg(long)]
        rows: Option<usize>,

        /// Columns of each random grid (overrides config)
        #[arg(long)]
        cols: Option<usize>,

        /// Number of runs (overrides config)
        #[arg(short, long)]
        runs: Option<usize>,

        /// First seed (overrides config)
        #[arg(short, long)]
        base_seed: Option<u64>,

        /// Maximum generations per run (overrides config)
        #[arg(short, long)]
        max_generations: Option<usize>,

        /// Print the full report, including every run, as JSON
        #[arg(long)]
        json: bool,
    },

    /// Advance a grid file a fixed number of generations
    Step {
        /// Grid file to advance
        #[arg(short, long)]
        input: PathBuf,

        /// Number of generations
        #[arg(short, long, default_value_t = 1)]
        generations: usize,

        /// Write the result here instead of printing it
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Create example configuration and grid files
    Setup {
        /// Directory to create files in
        #[arg(short, long, default_value = ".")]
        directory: PathBuf,

        /// Force overwrite existing files
        #[arg(short, long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Stabilize {
            source,
            max_generations,
            output,
        } => stabilize_command(source, max_generations, output),
        Commands::Animate {
            source,
            frames,
            pause_ms,
        } => animate_command(source, frames, pause_ms),
        Commands::Survey {
            config,
            rows,
            cols,
            runs,
            base_seed,
            max_generations,
            json,
        } => {
            let overrides = CliOverrides {
                rows,
                cols,
                runs,
                base_seed,
                max_generations,
                ..Default::default()
            };
            survey_command(config, overrides, json)
        }
        Commands::Step {
            input,
            generations,
            output,
        } => step_command(input, generations, output),
        Commands::Setup { directory, force } => setup_command(directory, force),
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn load_settings(config_path: &PathBuf, overrides: &CliOverrides) -> Result<Settings> {
    let mut settings = Settings::load_or_default(config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;
    if !config_path.exists() {
        debug!(path = %config_path.display(), "config file not found, using defaults");
    }

    settings.merge_with_cli(overrides);
    settings
        .validate()
        .context("Configuration validation failed")?;
    Ok(settings)
}

fn initial_grid(source: &GridSource, settings: &Settings) -> Result<Grid> {
    match &source.input {
        Some(path) => load_grid_from_file(path)
            .with_context(|| format!("Failed to load grid from {}", path.display())),
        None => {
            let grid = Grid::random(settings.grid.rows, settings.grid.cols, settings.grid.seed)?;
            info!(
                rows = grid.rows(),
                cols = grid.cols(),
                seed = ?settings.grid.seed,
                "generated random grid"
            );
            Ok(grid)
        }
    }
}

fn stabilize_command(
    source: GridSource,
    max_generations: Option<usize>,
    output_dir: Option<PathBuf>,
) -> Result<()> {
    let overrides = CliOverrides {
        rows: source.rows,
        cols: source.cols,
        seed: source.seed,
        max_generations,
        output_dir,
        ..Default::default()
    };
    let settings = load_settings(&source.config, &overrides)?;
    let grid = initial_grid(&source, &settings)?;

    println!("Initial Grid ({}x{}):", grid.rows(), grid.cols());
    println!("{}", GridFormatter::format_grid_with_coords(&grid));

    let start_time = Instant::now();
    let outcome = StabilizationDriver::new(settings.budget()).run(grid);
    let elapsed = start_time.elapsed();

    let summary = format!(
        "{} in {:.3}s",
        GridFormatter::format_outcome(&outcome),
        elapsed.as_secs_f64()
    );
    match outcome {
        Stabilization::Stabilized { .. } => println!("{}", ColorOutput::success(&summary)),
        Stabilization::NotStabilized { .. } => println!("{}", ColorOutput::warning(&summary)),
    }

    println!("\nFinal Grid:");
    println!("{}", GridFormatter::format_grid_with_coords(outcome.grid()));

    let format = settings.output.format;
    let path = settings
        .output
        .directory
        .join(format!("final.{}", format.extension()));
    save_grid_to_file(outcome.grid(), &path, format).context("Failed to save final grid")?;
    println!(
        "{}",
        ColorOutput::info(&format!("Final grid saved to {}", path.display()))
    );

    Ok(())
}

fn animate_command(source: GridSource, frames: Option<usize>, pause_ms: Option<u64>) -> Result<()> {
    let overrides = CliOverrides {
        rows: source.rows,
        cols: source.cols,
        seed: source.seed,
        frames,
        pause_ms,
        ..Default::default()
    };
    let settings = load_settings(&source.config, &overrides)?;
    let grid = initial_grid(&source, &settings)?;

    let animator = Animator::new(settings.animation.frames, settings.pause());
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    animator.play(grid, &mut out)?;

    Ok(())
}

fn survey_command(config_path: PathBuf, overrides: CliOverrides, json: bool) -> Result<()> {
    let settings = load_settings(&config_path, &overrides)?;
    let budget = settings.budget();
    if json {
        let report = survey(
            settings.grid.rows,
            settings.grid.cols,
            settings.survey.runs,
            settings.survey.base_seed,
            &budget,
        )?;
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize survey report")?
        );
        return Ok(());
    }

    println!(
        "{}",
        ColorOutput::info(&format!(
            "Surveying {} runs of {}x{} grids...",
            settings.survey.runs, settings.grid.rows, settings.grid.cols
        ))
    );

    let start_time = Instant::now();
    let report = survey(
        settings.grid.rows,
        settings.grid.cols,
        settings.survey.runs,
        settings.survey.base_seed,
        &budget,
    )?;

    println!("{}", report);
    println!(
        "{}",
        ColorOutput::success(&format!(
            "Finished in {:.3}s",
            start_time.elapsed().as_secs_f64()
        ))
    );

    Ok(())
}

fn step_command(input: PathBuf, generations: usize, output: Option<PathBuf>) -> Result<()> {
    let grid = load_grid_from_file(&input)
        .with_context(|| format!("Failed to load grid from {}", input.display()))?;
    let next = evolve_generations(grid, generations);

    match output {
        Some(path) => {
            let is_json = path.extension().is_some_and(|ext| ext == "json");
            let format = if is_json {
                OutputFormat::Json
            } else {
                OutputFormat::Text
            };
            save_grid_to_file(&next, &path, format)?;
            println!("Generation {} saved to {}", generations, path.display());
        }
        None => {
            println!("Generation {}:", generations);
            print!("{}", GridFormatter::format_grid_compact(&next));
        }
    }

    Ok(())
}

fn setup_command(directory: PathBuf, force: bool) -> Result<()> {
    println!("{}", ColorOutput::info("Setting up project structure..."));

    let config_dir = directory.join("config");
    let grids_dir = directory.join("input/grids");

    for dir in [&config_dir, &grids_dir] {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }

    let config_path = config_dir.join("default.yaml");
    if !config_path.exists() || force {
        Settings::default()
            .to_file(&config_path)
            .context("Failed to create default configuration")?;
        println!("Created: {}", config_path.display());
    } else {
        println!("Skipped: {} (already exists)", config_path.display());
    }

    create_example_grids(&grids_dir).context("Failed to create example grids")?;
    println!("Created example grids in: {}", grids_dir.display());

    println!("\n{}", ColorOutput::success("Setup complete!"));
    println!("\nNext steps:");
    println!("1. Edit {}", config_path.display());
    println!(
        "2. Run: toroidal_life stabilize --input {}",
        grids_dir.join("glider.txt").display()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from([
            "toroidal_life",
            "stabilize",
            "--config",
            "test.yaml",
            "--rows",
            "5",
            "--seed",
            "9",
            "--max-generations",
            "100",
        ]);
        assert!(cli.is_ok());

        let cli = Cli::try_parse_from(["toroidal_life", "-v", "animate", "--frames", "3"]);
        assert!(cli.is_ok());

        let cli = Cli::try_parse_from([
            "toroidal_life",
            "survey",
            "--rows",
            "6",
            "--cols",
            "6",
            "--runs",
            "4",
            "--json",
        ]);
        assert!(cli.is_ok());

        assert!(Cli::try_parse_from(["toroidal_life", "step"]).is_err());
    }

    #[test]
    fn test_setup_command() {
        let temp_dir = tempdir().unwrap();
        setup_command(temp_dir.path().to_path_buf(), false).unwrap();

        assert!(temp_dir.path().join("config/default.yaml").exists());
        assert!(temp_dir.path().join("input/grids/block.txt").exists());
        assert!(Settings::from_file(&temp_dir.path().join("config/default.yaml")).is_ok());
    }

    #[test]
    fn test_step_command_writes_output() {
        let temp_dir = tempdir().unwrap();
        let input = temp_dir.path().join("blinker.txt");
        let output = temp_dir.path().join("next.json");
        std::fs::write(&input, "00000\n00000\n01110\n00000\n00000\n").unwrap();

        step_command(input.clone(), 1, Some(output.clone())).unwrap();

        let next = load_grid_from_file(&output).unwrap();
        let expected = load_grid_from_file(&input).unwrap();
        assert_eq!(next, toroidal_life::advance(&expected));
    }

    #[test]
    fn test_stabilize_command_saves_final_grid() {
        let temp_dir = tempdir().unwrap();
        let input = temp_dir.path().join("block.txt");
        std::fs::write(&input, "0000\n0110\n0110\n0000\n").unwrap();

        let source = GridSource {
            config: temp_dir.path().join("missing.yaml"),
            input: Some(input.clone()),
            rows: None,
            cols: None,
            seed: None,
        };
        let output_dir = temp_dir.path().join("out");
        stabilize_command(source, Some(50), Some(output_dir.clone())).unwrap();

        let saved = load_grid_from_file(output_dir.join("final.txt")).unwrap();
        assert_eq!(saved, load_grid_from_file(&input).unwrap());
    }
}
