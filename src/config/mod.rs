//! Configuration management for toroidal life runs

pub mod settings;

pub use settings::{
    AnimationConfig, CliOverrides, GridConfig, OutputConfig, OutputFormat, Settings,
    StabilizationConfig, SurveyConfig,
};
