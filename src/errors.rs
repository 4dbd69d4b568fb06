// src/errors.rs

//! Crate-wide error types.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SitepipeError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("build failed: {failed} transform(s) reported failure")]
    BuildFailed { failed: usize },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Failure raised while a single transform runs.
///
/// These never escape a transform: they are collected into the transform's
/// `TaskResult` so siblings in a parallel group are unaffected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransformError {
    /// Invalid glob or unreadable source directory.
    #[error("could not resolve pattern '{pattern}': {reason}")]
    PatternResolution { pattern: String, reason: String },

    /// The processor rejected a source file.
    #[error("failed to transform {file:?}: {reason}")]
    TransformFailure { file: PathBuf, reason: String },

    /// The output could not be written.
    #[error("failed to write {file:?}: {reason}")]
    Write { file: PathBuf, reason: String },
}

impl TransformError {
    pub fn pattern(pattern: impl Into<String>, err: &anyhow::Error) -> Self {
        TransformError::PatternResolution {
            pattern: pattern.into(),
            reason: format!("{err:#}"),
        }
    }

    pub fn transform(file: impl Into<PathBuf>, err: &anyhow::Error) -> Self {
        TransformError::TransformFailure {
            file: file.into(),
            reason: format!("{err:#}"),
        }
    }

    pub fn write(file: impl Into<PathBuf>, err: &anyhow::Error) -> Self {
        TransformError::Write {
            file: file.into(),
            reason: format!("{err:#}"),
        }
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, SitepipeError>;
