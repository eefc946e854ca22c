//! Processor error types.

use thiserror::Error;

use nodegroupset_core::{BalanceError, ConfigError};

/// Errors raised while loading scenarios or processing node group sets.
#[derive(Debug, Error)]
pub enum ProcessorError {
    #[error("node group not found: {0}")]
    GroupNotFound(String),

    #[error("duplicate node group id: {0}")]
    DuplicateGroup(String),

    #[error("failed to read scenario: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse scenario: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("balancing error: {0}")]
    Balance(#[from] BalanceError),
}

pub type ProcessorResult<T> = Result<T, ProcessorError>;
