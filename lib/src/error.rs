//! Error types for artifact loading, encoding and inference.

use std::path::PathBuf;
use thiserror::Error;

/// Error type for every fallible operation in the crate.
#[derive(Debug, Error)]
pub enum PriceError {
    /// The artifact is missing, corrupt, or does not match the feature schema.
    #[error("Failed to load artifact {}: {}", .path.display(), .reason)]
    ArtifactLoad { path: PathBuf, reason: String },

    /// A categorical value (or code) outside the encoder's known classes.
    #[error("Unknown category for {field}: {value:?}")]
    UnknownCategory { field: String, value: String },

    /// The encoded row does not fit the model, or the model produced garbage.
    #[error("Inference error: {0}")]
    Inference(String),

    /// A numeric input outside its accepted inclusive range.
    #[error("{field} = {value} is out of range [{min}, {max}]")]
    InputOutOfRange {
        field: String,
        value: i64,
        min: i64,
        max: i64,
    },

    /// Invalid construction argument.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PriceError {
    pub(crate) fn artifact_load(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        PriceError::ArtifactLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PriceError>;
