//! Error types for stature-core
//!
//! Every error is scoped to a single load: the caller reports it and moves
//! on to the next request.

use stature_io::IoError;
use stature_stats::StatsError;
use thiserror::Error;

use crate::config::ConfigError;

/// Main error type for dashboard operations
#[derive(Error, Debug)]
pub enum DashboardError {
    /// Measurement column absent from the loaded table
    #[error("Column \"{column}\" was not found in the file")]
    MissingColumn { column: String },

    /// Column present but holds no usable value
    #[error("Insufficient data: column \"{column}\" has no numeric values")]
    NoData { column: String },

    /// Table could not be decoded
    #[error("Could not read the file as a table: {0}")]
    MalformedInput(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Other I/O errors
    #[error("I/O error: {0}")]
    Io(IoError),
}

impl From<IoError> for DashboardError {
    fn from(err: IoError) -> Self {
        match err {
            IoError::ColumnNotFound(column) => DashboardError::MissingColumn { column },
            IoError::InvalidFormat(msg) => DashboardError::MalformedInput(msg),
            IoError::UnsupportedFormat(msg) => DashboardError::MalformedInput(msg),
            other => DashboardError::Io(other),
        }
    }
}

impl DashboardError {
    /// Attach the column name to a statistics error
    pub fn from_stats(err: StatsError, column: &str) -> Self {
        match err {
            StatsError::NoData => DashboardError::NoData {
                column: column.to_string(),
            },
            other => DashboardError::Config(ConfigError::InvalidBins(other.to_string())),
        }
    }

    /// Whether the user can fix this by supplying another file
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            DashboardError::MissingColumn { .. }
                | DashboardError::NoData { .. }
                | DashboardError::MalformedInput(_)
        )
    }
}

/// Result type alias for dashboard operations
pub type DashboardResult<T> = Result<T, DashboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_column_display() {
        let err = DashboardError::MissingColumn {
            column: "Alt".to_string(),
        };
        assert_eq!(err.to_string(), "Column \"Alt\" was not found in the file");
        assert!(err.is_user_error());
    }

    #[test]
    fn test_io_error_mapping() {
        let err: DashboardError = IoError::ColumnNotFound("Alt".to_string()).into();
        assert!(matches!(err, DashboardError::MissingColumn { ref column } if column == "Alt"));

        let err: DashboardError = IoError::InvalidFormat("bad zip".to_string()).into();
        assert!(matches!(err, DashboardError::MalformedInput(_)));

        let err: DashboardError = IoError::FileNotFound("x.xlsx".to_string()).into();
        assert!(matches!(err, DashboardError::Io(_)));
        assert!(!err.is_user_error());
    }

    #[test]
    fn test_stats_error_mapping() {
        let err = DashboardError::from_stats(StatsError::NoData, "Alt");
        assert!(err.to_string().contains("Insufficient data"));
    }
}
