//! Error types for the life engine

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LifeError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LifeError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Grid did not stabilize after {generations} generations")]
    NotStabilized { generations: usize },
}

impl LifeError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        LifeError::InvalidInput(message.into())
    }
}
