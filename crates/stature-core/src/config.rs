//! Configuration for stature
//!
//! Centralized configuration for the measurement column, where data comes
//! from, the value ranges, and chart/preview/server settings.
//!
//! ```toml
//! column = "Alt"
//! source = { path = "data/alturas.xlsx" }   # or: source = "upload"
//!
//! [[bins]]
//! label = "<150"
//! lower = 0.0
//! upper = 1.5
//!
//! [[bins]]
//! label = ">=150"
//! lower = 1.5
//!
//! [charts]
//! width = 720
//! height = 420
//! histogram_buckets = 12
//!
//! [preview]
//! rows = 5
//! export_path = "preview.svg"
//!
//! [server]
//! addr = "127.0.0.1:8501"
//! max_upload_bytes = 10485760
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use stature_stats::{Bin, BinDefinition};
use thiserror::Error;

/// Default measurement column
pub const DEFAULT_COLUMN: &str = "Alt";

/// System-wide configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Name of the measurement column
    pub column: String,
    /// Where tables come from
    pub source: DataSource,
    /// Value ranges for the pie chart
    pub bins: Vec<Bin>,
    /// Chart rendering settings
    pub charts: ChartConfig,
    /// Table preview settings
    pub preview: PreviewConfig,
    /// HTTP server settings
    pub server: ServerConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            column: DEFAULT_COLUMN.to_string(),
            source: DataSource::default(),
            bins: BinDefinition::height_ranges().bins().to_vec(),
            charts: ChartConfig::default(),
            preview: PreviewConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

/// Where the dashboard reads its table from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    /// Every request uploads its own file
    #[default]
    Upload,
    /// A fixed file, re-read on every request
    Path(PathBuf),
}

impl DataSource {
    /// Short description for logs and status output
    pub fn describe(&self) -> String {
        match self {
            DataSource::Upload => "upload".to_string(),
            DataSource::Path(path) => path.display().to_string(),
        }
    }
}

/// Chart rendering configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Chart width in pixels
    pub width: u32,
    /// Chart height in pixels
    pub height: u32,
    /// Fixed histogram bucket count (Sturges' rule when unset)
    pub histogram_buckets: Option<usize>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 720,
            height: 420,
            histogram_buckets: None,
        }
    }
}

/// Table preview configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// Rows shown in the preview
    pub rows: usize,
    /// Also write the preview image here after each load
    pub export_path: Option<PathBuf>,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            rows: 5,
            export_path: None,
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address
    pub addr: String,
    /// Largest accepted upload, in bytes
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:8501".to_string(),
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

impl DashboardConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load configuration from a JSON string
    pub fn from_json(json_str: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json_str).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize configuration to JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load and validate a configuration file (`.json`, otherwise TOML)
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;

        let config = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&text)?,
            _ => Self::from_toml(&text)?,
        };
        config.validate()?;

        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Validated bin definition
    pub fn bin_definition(&self) -> Result<BinDefinition, ConfigError> {
        BinDefinition::new(self.bins.clone()).map_err(|e| ConfigError::InvalidBins(e.to_string()))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.column.trim().is_empty() {
            return Err(ConfigError::MissingField("column".to_string()));
        }

        self.bin_definition()?;

        if let DataSource::Path(path) = &self.source {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::MissingField("source.path".to_string()));
            }
        }

        for (name, value) in [("width", self.charts.width), ("height", self.charts.height)] {
            if !(100..=4096).contains(&value) {
                return Err(ConfigError::OutOfRange(format!(
                    "charts.{} must be between 100 and 4096, got {}",
                    name, value
                )));
            }
        }

        if let Some(buckets) = self.charts.histogram_buckets {
            if !(1..=200).contains(&buckets) {
                return Err(ConfigError::OutOfRange(format!(
                    "charts.histogram_buckets must be between 1 and 200, got {}",
                    buckets
                )));
            }
        }

        if self.preview.rows > 1000 {
            return Err(ConfigError::OutOfRange(
                "preview.rows must be at most 1000".to_string(),
            ));
        }

        if self.server.max_upload_bytes == 0 {
            return Err(ConfigError::OutOfRange(
                "server.max_upload_bytes must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

/// Configuration error
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Bin ranges violate their invariants
    #[error("Invalid bins: {0}")]
    InvalidBins(String),
    /// Value is out of valid range
    #[error("Value out of range: {0}")]
    OutOfRange(String),
    /// Required field is missing
    #[error("Missing field: {0}")]
    MissingField(String),
    /// File could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),
    /// File could not be read
    #[error("Cannot read configuration: {0}")]
    Io(String),
}
