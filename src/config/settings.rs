//! Configuration settings for toroidal life runs

use crate::life::Budget;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub grid: GridConfig,
    pub stabilization: StabilizationConfig,
    pub animation: AnimationConfig,
    pub output: OutputConfig,
    pub survey: SurveyConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    pub rows: usize,
    pub cols: usize,
    /// Seed for random initial grids; `None` draws from entropy
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StabilizationConfig {
    pub max_generations: usize,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationConfig {
    pub frames: usize,
    pub pause_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub directory: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Text => "txt",
            OutputFormat::Json => "json",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyConfig {
    pub runs: usize,
    pub base_seed: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            grid: GridConfig {
                rows: 10,
                cols: 10,
                seed: None,
            },
            stabilization: StabilizationConfig {
                max_generations: crate::life::stabilize::DEFAULT_MAX_GENERATIONS,
                timeout_seconds: None,
            },
            animation: AnimationConfig {
                frames: 10,
                pause_ms: 500,
            },
            output: OutputConfig {
                format: OutputFormat::Text,
                directory: PathBuf::from("output"),
            },
            survey: SurveyConfig {
                runs: 100,
                base_seed: 0,
            },
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from `path` if it exists, otherwise fall back to defaults
    pub fn load_or_default(path: &PathBuf) -> Result<Self> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save settings to a YAML file
    pub fn to_file(&self, path: &PathBuf) -> Result<()> {
        let content = serde_yaml::to_string(self).context("Failed to serialize settings")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        if self.grid.rows == 0 || self.grid.cols == 0 {
            anyhow::bail!(
                "Grid dimensions must be positive, got {}x{}",
                self.grid.rows,
                self.grid.cols
            );
        }

        if self.stabilization.max_generations == 0 {
            anyhow::bail!("Maximum generations must be positive");
        }

        if self.animation.frames == 0 {
            anyhow::bail!("Number of animation frames must be positive");
        }

        if self.survey.runs == 0 {
            anyhow::bail!("Number of survey runs must be positive");
        }

        Ok(())
    }

    /// Merge settings with command line overrides
    pub fn merge_with_cli(&mut self, cli_overrides: &CliOverrides) {
        if let Some(rows) = cli_overrides.rows {
            self.grid.rows = rows;
        }
        if let Some(cols) = cli_overrides.cols {
            self.grid.cols = cols;
        }
        if let Some(seed) = cli_overrides.seed {
            self.grid.seed = Some(seed);
        }
        if let Some(max_generations) = cli_overrides.max_generations {
            self.stabilization.max_generations = max_generations;
        }
        if let Some(frames) = cli_overrides.frames {
            self.animation.frames = frames;
        }
        if let Some(pause_ms) = cli_overrides.pause_ms {
            self.animation.pause_ms = pause_ms;
        }
        if let Some(runs) = cli_overrides.runs {
            self.survey.runs = runs;
        }
        if let Some(base_seed) = cli_overrides.base_seed {
            self.survey.base_seed = base_seed;
        }
        if let Some(ref output_dir) = cli_overrides.output_dir {
            self.output.directory = output_dir.clone();
        }
    }

    /// Stabilization bounds described by these settings
    pub fn budget(&self) -> Budget {
        let budget = Budget::generations(self.stabilization.max_generations);
        match self.stabilization.timeout_seconds {
            Some(seconds) => budget.with_timeout(Duration::from_secs(seconds)),
            None => budget,
        }
    }

    pub fn pause(&self) -> Duration {
        Duration::from_millis(self.animation.pause_ms)
    }
}

/// Command line overrides for settings
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub rows: Option<usize>,
    pub cols: Option<usize>,
    pub seed: Option<u64>,
    pub max_generations: Option<usize>,
    pub frames: Option<usize>,
    pub pause_ms: Option<u64>,
    pub runs: Option<usize>,
    pub base_seed: Option<u64>,
    pub output_dir: Option<PathBuf>,
}
