//! Error types for h3geo.

use thiserror::Error;

/// Errors raised by the geometry, binning and probability routines.
#[derive(Error, Debug)]
pub enum H3Error {
    /// Bad parameters: unknown method names, too few bins, out-of-range classes.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A tensor did not have the expected rank or dimensions.
    #[error("Shape mismatch: expected {expected}, got {got:?}")]
    ShapeMismatch { expected: String, got: Vec<usize> },

    /// A value fell outside every bin of its channel.
    #[error("Value {value} is not covered by any {channel} bin")]
    DomainCoverage { value: f32, channel: String },

    #[error("Tensor error: {0}")]
    Tensor(#[from] candle_core::Error),

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl H3Error {
    pub fn invalid(message: impl Into<String>) -> Self {
        H3Error::InvalidArgument(message.into())
    }

    pub fn shape(expected: impl Into<String>, got: &[usize]) -> Self {
        H3Error::ShapeMismatch {
            expected: expected.into(),
            got: got.to_vec(),
        }
    }
}

pub type Result<T> = std::result::Result<T, H3Error>;
