//! Data reader trait and common types
//!
//! The `DataReader` trait provides a uniform interface for reading
//! tabular data from the supported file formats.

use crate::schema::{DataColumn, DataSchema, DataSlice};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during I/O operations
#[derive(Debug, Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Failed to open file: {0}")]
    OpenFailed(String),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for IoError {
    fn from(err: std::io::Error) -> Self {
        IoError::Io(err.to_string())
    }
}

/// Result type for I/O operations
pub type IoResult<T> = Result<T, IoError>;

/// Trait for reading tabular data from various formats
pub trait DataReader: Send + Sync {
    /// Read the schema (column names, types, record count)
    fn read_schema(&self) -> IoResult<DataSchema>;

    /// Read a single column by name
    fn read_column(&self, name: &str) -> IoResult<DataColumn>;

    /// Read a range of records (all columns)
    fn read_range(&self, start: usize, end: usize) -> IoResult<DataSlice>;

    /// Get metadata as key-value pairs
    fn metadata(&self) -> &HashMap<String, String>;

    /// Get the file path (if applicable)
    fn path(&self) -> Option<&str> {
        None
    }

    /// Get the format name
    fn format_name(&self) -> &'static str;
}

/// A boxed reader for dynamic dispatch
pub type BoxedReader = Box<dyn DataReader>;

fn extension_of(name: &str) -> String {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default()
}

/// Open a file and return an appropriate reader
///
/// The format is auto-detected from the file extension.
pub fn open_file(path: &str) -> IoResult<BoxedReader> {
    if !Path::new(path).exists() {
        return Err(IoError::FileNotFound(path.to_string()));
    }

    let bytes = std::fs::read(path).map_err(|e| IoError::OpenFailed(e.to_string()))?;
    let mut reader = open_bytes(path, bytes)?;
    reader.set_path(path);
    Ok(reader.into_boxed())
}

/// Parse in-memory content, using `file_name` to pick the format
///
/// This is the entry point for uploaded files.
pub fn open_bytes(file_name: &str, bytes: Vec<u8>) -> IoResult<AnyReader> {
    let extension = extension_of(file_name);
    tracing::debug!(file_name, %extension, size = bytes.len(), "decoding table");

    match extension.as_str() {
        #[cfg(feature = "csv")]
        "csv" => Ok(AnyReader::Csv(crate::csv_reader::CsvReader::from_bytes(
            &bytes, b',',
        )?)),

        #[cfg(feature = "csv")]
        "tsv" => Ok(AnyReader::Csv(crate::csv_reader::CsvReader::from_bytes(
            &bytes, b'\t',
        )?)),

        #[cfg(feature = "spreadsheet")]
        "xlsx" | "xlsm" | "xls" | "ods" => {
            use crate::spreadsheet_reader::{SpreadsheetFormat, SpreadsheetReader};
            let format = SpreadsheetFormat::from_extension(&extension)
                .ok_or_else(|| IoError::UnsupportedFormat(extension.clone()))?;
            Ok(AnyReader::Spreadsheet(SpreadsheetReader::from_bytes(
                bytes, format,
            )?))
        }

        _ => Err(IoError::UnsupportedFormat(format!(
            "Unknown file extension: '{}'",
            extension
        ))),
    }
}

/// Concrete reader chosen by [`open_bytes`]
pub enum AnyReader {
    #[cfg(feature = "csv")]
    Csv(crate::csv_reader::CsvReader),
    #[cfg(feature = "spreadsheet")]
    Spreadsheet(crate::spreadsheet_reader::SpreadsheetReader),
}

impl AnyReader {
    fn set_path(&mut self, path: &str) {
        match self {
            #[cfg(feature = "csv")]
            AnyReader::Csv(r) => r.set_path(path),
            #[cfg(feature = "spreadsheet")]
            AnyReader::Spreadsheet(r) => r.set_path(path),
        }
    }

    /// Erase the concrete type
    pub fn into_boxed(self) -> BoxedReader {
        match self {
            #[cfg(feature = "csv")]
            AnyReader::Csv(r) => Box::new(r),
            #[cfg(feature = "spreadsheet")]
            AnyReader::Spreadsheet(r) => Box::new(r),
        }
    }
}

/// List supported file extensions
pub fn supported_extensions() -> Vec<&'static str> {
    let mut extensions = Vec::new();

    #[cfg(feature = "spreadsheet")]
    {
        extensions.push("xlsx");
        extensions.push("xlsm");
        extensions.push("xls");
        extensions.push("ods");
    }

    #[cfg(feature = "csv")]
    {
        extensions.push("csv");
        extensions.push("tsv");
    }

    extensions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_extensions() {
        let extensions = supported_extensions();
        #[cfg(feature = "csv")]
        assert!(extensions.contains(&"csv"));
        #[cfg(feature = "spreadsheet")]
        assert!(extensions.contains(&"xlsx"));
    }

    #[test]
    fn test_unknown_extension() {
        let err = open_bytes("data.txt", b"a,b".to_vec()).err().unwrap();
        assert!(matches!(err, IoError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = open_file("/definitely/not/here.csv").err().unwrap();
        assert!(matches!(err, IoError::FileNotFound(_)));
    }

    #[test]
    fn test_extension_is_case_insensitive() {
        assert_eq!(extension_of("Heights.XLSX"), "xlsx");
        assert_eq!(extension_of("noext"), "");
    }
}
