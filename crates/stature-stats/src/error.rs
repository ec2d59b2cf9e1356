//! Error types for stature-stats

use thiserror::Error;

/// Errors produced by binning and statistics
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatsError {
    /// No present value to compute over
    #[error("Insufficient data: no values present")]
    NoData,

    /// Quantile outside `[0, 1]`
    #[error("Quantile {0} is outside [0, 1]")]
    InvalidQuantile(f64),

    /// Bin definition violates its ordering invariants
    #[error("Invalid bin definition: {0}")]
    InvalidBins(String),
}

/// Result type for statistics operations
pub type StatsResult<T> = Result<T, StatsError>;
