//! Transfer function error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransferFunctionError {
    #[error("Position {position} is outside the domain [0, 1]")]
    OutOfRange { position: f64 },

    #[error("Invalid stop set: {0}")]
    InvalidStopSet(String),

    #[error("Bin count must be at least 1 when discrete, got {bins}")]
    DegenerateBins { bins: u32 },

    #[error("Invalid editor configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Malformed transfer function JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TransferFunctionError>;

/// Reject positions that are NaN or outside [0, 1].
pub(crate) fn check_position(position: f64) -> Result<f64> {
    if (0.0..=1.0).contains(&position) {
        Ok(position)
    } else {
        Err(TransferFunctionError::OutOfRange { position })
    }
}
