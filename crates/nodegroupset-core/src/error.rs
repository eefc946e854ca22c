//! Error types for node group balancing.

use thiserror::Error;

/// Result type alias for balancing operations.
pub type BalanceResult<T> = Result<T, BalanceError>;

/// Errors that abort a balancing call.
///
/// Over-requesting capacity and saturated groups are not errors.
#[derive(Debug, Error)]
pub enum BalanceError {
    #[error("failed to get target size of node group {group}: {reason}")]
    TargetSize { group: String, reason: String },

    #[error("node group {group} has min size {min_size} above max size {max_size}")]
    InvalidBounds {
        group: String,
        min_size: u32,
        max_size: u32,
    },

    #[error("no node template for node group {0}")]
    MissingTemplate(String),
}

/// Result type alias for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while loading balancing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid difference ratio for {resource}: {ratio}")]
    InvalidRatio { resource: String, ratio: f64 },
}
