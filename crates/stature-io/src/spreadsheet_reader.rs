//! Spreadsheet reader (Excel and OpenDocument)
//!
//! Only the first worksheet is read. Its first row holds the column names.

use std::collections::HashMap;
use std::io::Cursor;

use calamine::{Data, Ods, Range, Reader, Xls, Xlsx};

use crate::reader::{DataReader, IoError, IoResult};
use crate::schema::{ColumnDescriptor, ColumnType, DataColumn, DataSchema, DataSlice};

static EMPTY: Data = Data::Empty;

/// Spreadsheet container format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpreadsheetFormat {
    Xlsx,
    Xls,
    Ods,
}

impl SpreadsheetFormat {
    /// Map a lowercase file extension to a format
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "xlsx" | "xlsm" => Some(SpreadsheetFormat::Xlsx),
            "xls" => Some(SpreadsheetFormat::Xls),
            "ods" => Some(SpreadsheetFormat::Ods),
            _ => None,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            SpreadsheetFormat::Xlsx => "XLSX",
            SpreadsheetFormat::Xls => "XLS",
            SpreadsheetFormat::Ods => "ODS",
        }
    }
}

/// Spreadsheet reader over decoded content
pub struct SpreadsheetReader {
    path: Option<String>,
    format: SpreadsheetFormat,
    schema: DataSchema,
    columns: Vec<DataColumn>,
    metadata: HashMap<String, String>,
}

impl SpreadsheetReader {
    /// Decode the first worksheet of a workbook
    pub fn from_bytes(bytes: Vec<u8>, format: SpreadsheetFormat) -> IoResult<Self> {
        let cursor = Cursor::new(bytes);
        let (sheet_name, range) = match format {
            SpreadsheetFormat::Xlsx => first_sheet(Xlsx::new(cursor), format)?,
            SpreadsheetFormat::Xls => first_sheet(Xls::new(cursor), format)?,
            SpreadsheetFormat::Ods => first_sheet(Ods::new(cursor), format)?,
        };

        let (schema, columns) = decode_range(&range)?;

        let mut metadata = HashMap::new();
        metadata.insert("format".to_string(), format.name().to_string());
        metadata.insert("sheet".to_string(), sheet_name);

        Ok(Self {
            path: None,
            format,
            schema,
            columns,
            metadata,
        })
    }

    pub(crate) fn set_path(&mut self, path: &str) {
        self.path = Some(path.to_string());
    }

    /// Container format of the workbook
    pub fn format(&self) -> SpreadsheetFormat {
        self.format
    }
}

fn first_sheet<R, E>(
    workbook: Result<R, E>,
    format: SpreadsheetFormat,
) -> IoResult<(String, Range<Data>)>
where
    R: Reader<Cursor<Vec<u8>>, Error = E>,
    E: std::fmt::Display,
{
    let mut workbook = workbook
        .map_err(|e| IoError::InvalidFormat(format!("{} workbook: {}", format.name(), e)))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| IoError::InvalidFormat("workbook has no worksheet".to_string()))?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| IoError::InvalidFormat(format!("sheet '{}': {}", sheet_name, e)))?;

    Ok((sheet_name, range))
}

fn decode_range(range: &Range<Data>) -> IoResult<(DataSchema, Vec<DataColumn>)> {
    let mut rows = range.rows();
    let header = rows
        .next()
        .ok_or_else(|| IoError::InvalidFormat("worksheet is empty".to_string()))?;

    let names: Vec<String> = header
        .iter()
        .enumerate()
        .map(|(i, cell)| match cell {
            Data::Empty => format!("col_{}", i),
            other => other.to_string().trim().to_string(),
        })
        .collect();

    let body: Vec<&[Data]> = rows.collect();
    let mut descriptors = Vec::with_capacity(names.len());
    let mut columns = Vec::with_capacity(names.len());

    for (i, name) in names.into_iter().enumerate() {
        let cells: Vec<&Data> = body
            .iter()
            .map(|row| row.get(i).unwrap_or(&EMPTY))
            .collect();
        let dtype = infer_type(&cells);
        let missing = cells.iter().filter(|c| is_blank(c)).count();
        descriptors.push(ColumnDescriptor::new(name, dtype).with_missing(missing));
        columns.push(parse_column(&cells, dtype));
    }

    Ok((DataSchema::new(descriptors, body.len()), columns))
}

fn is_blank(cell: &Data) -> bool {
    match cell {
        Data::Empty => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn cell_f64(cell: &Data) -> Option<f64> {
    match cell {
        Data::Float(f) => Some(*f),
        Data::Int(i) => Some(*i as f64),
        _ => None,
    }
}

/// Infer column type from its cells
fn infer_type(cells: &[&Data]) -> ColumnType {
    let filled: Vec<&Data> = cells.iter().copied().filter(|c| !is_blank(c)).collect();
    if filled.is_empty() {
        return ColumnType::String;
    }
    let complete = filled.len() == cells.len();

    if filled.iter().all(|c| cell_f64(c).is_some()) {
        let integral = filled.iter().all(|c| match c {
            Data::Int(_) => true,
            Data::Float(f) => f.fract() == 0.0 && f.abs() < i64::MAX as f64,
            _ => false,
        });
        return if complete && integral {
            ColumnType::Int64
        } else {
            ColumnType::Float64
        };
    }

    if complete && filled.iter().all(|c| matches!(c, Data::Bool(_))) {
        return ColumnType::Bool;
    }

    ColumnType::String
}

fn parse_column(cells: &[&Data], dtype: ColumnType) -> DataColumn {
    match dtype {
        ColumnType::Float64 => DataColumn::Float64(
            cells
                .iter()
                .map(|c| cell_f64(c).unwrap_or(f64::NAN))
                .collect(),
        ),
        ColumnType::Int64 => DataColumn::Int64(
            cells
                .iter()
                .map(|c| cell_f64(c).map(|f| f as i64).unwrap_or(0))
                .collect(),
        ),
        ColumnType::Bool => {
            DataColumn::Bool(cells.iter().map(|c| matches!(c, Data::Bool(true))).collect())
        }
        ColumnType::String => DataColumn::String(
            cells
                .iter()
                .map(|c| match c {
                    Data::Empty => String::new(),
                    other => other.to_string(),
                })
                .collect(),
        ),
    }
}

impl DataReader for SpreadsheetReader {
    fn read_schema(&self) -> IoResult<DataSchema> {
        Ok(self.schema.clone())
    }

    fn read_column(&self, name: &str) -> IoResult<DataColumn> {
        self.schema
            .column_index(name)
            .and_then(|idx| self.columns.get(idx))
            .cloned()
            .ok_or_else(|| IoError::ColumnNotFound(name.to_string()))
    }

    fn read_range(&self, start: usize, end: usize) -> IoResult<DataSlice> {
        let mut slice = DataSlice::new(start);
        for (desc, column) in self.schema.columns.iter().zip(&self.columns) {
            slice.add_column(&desc.name, column.slice(start, end));
        }
        Ok(slice)
    }

    fn metadata(&self) -> &HashMap<String, String> {
        &self.metadata
    }

    fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    fn format_name(&self) -> &'static str {
        self.format.name()
    }
}
