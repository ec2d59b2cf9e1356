//! Schema and column types for data representation

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Schema describing the structure of a dataset
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataSchema {
    /// Column descriptors
    pub columns: Vec<ColumnDescriptor>,

    /// Number of records
    pub num_records: usize,
}

impl DataSchema {
    /// Create a new schema
    pub fn new(columns: Vec<ColumnDescriptor>, num_records: usize) -> Self {
        Self {
            columns,
            num_records,
        }
    }

    /// Get a column by name
    pub fn column(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Get column index by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Get column names
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Number of columns
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }
}

/// Descriptor for a column
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Column name (header cell)
    pub name: String,

    /// Data type
    pub dtype: ColumnType,

    /// Number of empty cells
    pub missing: usize,
}

impl ColumnDescriptor {
    /// Create a new column descriptor
    pub fn new(name: impl Into<String>, dtype: ColumnType) -> Self {
        Self {
            name: name.into(),
            dtype,
            missing: 0,
        }
    }

    /// Set the missing-cell count
    pub fn with_missing(mut self, missing: usize) -> Self {
        self.missing = missing;
        self
    }
}

/// Column data type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    Float64,
    Int64,
    Bool,
    String,
}

impl ColumnType {
    /// Check if this is a numeric type
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Float64 | ColumnType::Int64)
    }

    /// Short display name
    pub fn name(&self) -> &'static str {
        match self {
            ColumnType::Float64 => "float64",
            ColumnType::Int64 => "int64",
            ColumnType::Bool => "bool",
            ColumnType::String => "string",
        }
    }
}

/// A column of data
///
/// Missing cells are `NaN` in float columns and empty strings in string
/// columns. Integer and boolean columns are only inferred when complete.
#[derive(Debug, Clone, PartialEq)]
pub enum DataColumn {
    Float64(Vec<f64>),
    Int64(Vec<i64>),
    Bool(Vec<bool>),
    String(Vec<String>),
}

impl DataColumn {
    /// Get the column type
    pub fn dtype(&self) -> ColumnType {
        match self {
            DataColumn::Float64(_) => ColumnType::Float64,
            DataColumn::Int64(_) => ColumnType::Int64,
            DataColumn::Bool(_) => ColumnType::Bool,
            DataColumn::String(_) => ColumnType::String,
        }
    }

    /// Get the number of elements
    pub fn len(&self) -> usize {
        match self {
            DataColumn::Float64(v) => v.len(),
            DataColumn::Int64(v) => v.len(),
            DataColumn::Bool(v) => v.len(),
            DataColumn::String(v) => v.len(),
        }
    }

    /// Check if the column is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Convert to f64 measurements
    ///
    /// Text cells holding a number are parsed; every other cell becomes
    /// `NaN` so it is later excluded as missing.
    pub fn to_measurements(&self) -> Vec<f64> {
        match self {
            DataColumn::Float64(v) => v.clone(),
            DataColumn::Int64(v) => v.iter().map(|&x| x as f64).collect(),
            DataColumn::Bool(v) => vec![f64::NAN; v.len()],
            DataColumn::String(v) => v
                .iter()
                .map(|s| s.trim().parse::<f64>().unwrap_or(f64::NAN))
                .collect(),
        }
    }

    /// Render one cell for display
    pub fn cell_text(&self, row: usize) -> Option<String> {
        match self {
            DataColumn::Float64(v) => v.get(row).map(|x| {
                if x.is_nan() {
                    String::new()
                } else {
                    x.to_string()
                }
            }),
            DataColumn::Int64(v) => v.get(row).map(|x| x.to_string()),
            DataColumn::Bool(v) => v.get(row).map(|x| x.to_string()),
            DataColumn::String(v) => v.get(row).cloned(),
        }
    }

    /// Copy rows `start..end` (clamped) into a new column
    pub fn slice(&self, start: usize, end: usize) -> DataColumn {
        let end = end.min(self.len());
        let start = start.min(end);
        match self {
            DataColumn::Float64(v) => DataColumn::Float64(v[start..end].to_vec()),
            DataColumn::Int64(v) => DataColumn::Int64(v[start..end].to_vec()),
            DataColumn::Bool(v) => DataColumn::Bool(v[start..end].to_vec()),
            DataColumn::String(v) => DataColumn::String(v[start..end].to_vec()),
        }
    }
}

/// A slice of rows from a dataset
#[derive(Debug, Clone)]
pub struct DataSlice {
    /// Columns of data
    pub columns: HashMap<String, DataColumn>,

    /// Column names in table order
    pub order: Vec<String>,

    /// Starting row index
    pub start: usize,

    /// Number of rows
    pub num_rows: usize,
}

impl DataSlice {
    /// Create a new data slice
    pub fn new(start: usize) -> Self {
        Self {
            columns: HashMap::new(),
            order: Vec::new(),
            start,
            num_rows: 0,
        }
    }

    /// Add a column
    pub fn add_column(&mut self, name: impl Into<String>, data: DataColumn) {
        let name = name.into();
        if self.columns.is_empty() {
            self.num_rows = data.len();
        }
        if !self.columns.contains_key(&name) {
            self.order.push(name.clone());
        }
        self.columns.insert(name, data);
    }

    /// Get a column by name
    pub fn column(&self, name: &str) -> Option<&DataColumn> {
        self.columns.get(name)
    }

    /// Get column names, in table order
    pub fn column_names(&self) -> Vec<&str> {
        self.order.iter().map(|s| s.as_str()).collect()
    }

    /// Rows as display text, in column order
    pub fn rows_text(&self) -> Vec<Vec<String>> {
        (0..self.num_rows)
            .map(|row| {
                self.order
                    .iter()
                    .map(|name| {
                        self.columns
                            .get(name)
                            .and_then(|c| c.cell_text(row))
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .collect()
    }
}
