//! Immutable in-memory tables and typed column access

use serde::{Deserialize, Serialize};

use crate::reader::{open_bytes, open_file, DataReader, IoError, IoResult};
use crate::schema::{DataColumn, DataSchema, DataSlice};

/// A fully loaded table
///
/// Built once per load and never mutated; the pipeline borrows it.
#[derive(Debug, Clone)]
pub struct Table {
    schema: DataSchema,
    columns: Vec<DataColumn>,
    format: &'static str,
}

impl Table {
    /// Copy every column out of a reader
    pub fn from_reader(reader: &dyn DataReader) -> IoResult<Self> {
        let schema = reader.read_schema()?;
        let columns = schema
            .columns
            .iter()
            .map(|c| reader.read_column(&c.name))
            .collect::<IoResult<Vec<_>>>()?;

        tracing::debug!(
            format = reader.format_name(),
            columns = columns.len(),
            rows = schema.num_records,
            "table loaded"
        );

        Ok(Self {
            schema,
            columns,
            format: reader.format_name(),
        })
    }

    /// Load a table from a file path
    pub fn load_file(path: &str) -> IoResult<Self> {
        let reader = open_file(path)?;
        Self::from_reader(reader.as_ref())
    }

    /// Load a table from uploaded bytes
    pub fn load_bytes(file_name: &str, bytes: Vec<u8>) -> IoResult<Self> {
        let reader = open_bytes(file_name, bytes)?.into_boxed();
        Self::from_reader(reader.as_ref())
    }

    /// Table schema
    pub fn schema(&self) -> &DataSchema {
        &self.schema
    }

    /// Format the table was decoded from
    pub fn format_name(&self) -> &'static str {
        self.format
    }

    /// Number of rows
    pub fn num_rows(&self) -> usize {
        self.schema.num_records
    }

    /// Check whether a column exists
    pub fn has_column(&self, name: &str) -> bool {
        self.schema.column_index(name).is_some()
    }

    /// Get a column by name
    pub fn column(&self, name: &str) -> Option<&DataColumn> {
        self.schema
            .column_index(name)
            .and_then(|idx| self.columns.get(idx))
    }

    /// First `n` rows, for previews
    pub fn head(&self, n: usize) -> DataSlice {
        let mut slice = DataSlice::new(0);
        for (desc, column) in self.schema.columns.iter().zip(&self.columns) {
            slice.add_column(&desc.name, column.slice(0, n));
        }
        slice
    }

    /// Extract a named column as a measurement series
    pub fn measurement(&self, name: &str) -> IoResult<MeasurementSeries> {
        let column = self
            .column(name)
            .ok_or_else(|| IoError::ColumnNotFound(name.to_string()))?;

        Ok(MeasurementSeries {
            name: name.to_string(),
            values: column.to_measurements(),
        })
    }
}

/// Ordered numeric values of one column
///
/// Missing or non-numeric cells are kept in place as `NaN`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementSeries {
    pub name: String,
    pub values: Vec<f64>,
}

impl MeasurementSeries {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// All entries, missing ones as `NaN`
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Present (finite) values only
    pub fn present(&self) -> Vec<f64> {
        self.values.iter().copied().filter(|x| x.is_finite()).collect()
    }

    /// Number of entries, present or not
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of missing entries
    pub fn missing(&self) -> usize {
        self.values.iter().filter(|x| !x.is_finite()).count()
    }
}
