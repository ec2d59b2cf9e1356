//! CSV file reader with type inference

use crate::reader::{DataReader, IoError, IoResult};
use crate::schema::{ColumnDescriptor, ColumnType, DataColumn, DataSchema, DataSlice};
use std::collections::HashMap;

/// CSV reader over decoded content
pub struct CsvReader {
    path: Option<String>,
    schema: DataSchema,
    columns: Vec<DataColumn>,
    metadata: HashMap<String, String>,
}

impl CsvReader {
    /// Decode CSV content with a header row
    pub fn from_bytes(bytes: &[u8], delimiter: u8) -> IoResult<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .trim(csv::Trim::Headers)
            .from_reader(bytes);

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| IoError::InvalidFormat(e.to_string()))?
            .iter()
            .enumerate()
            .map(|(i, s)| {
                if s.is_empty() {
                    format!("col_{}", i)
                } else {
                    s.to_string()
                }
            })
            .collect();

        if headers.is_empty() {
            return Err(IoError::InvalidFormat("CSV has no header row".to_string()));
        }

        let mut raw: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
        for result in reader.records() {
            let record = result.map_err(|e| IoError::InvalidFormat(e.to_string()))?;
            for (i, value) in record.iter().enumerate() {
                if i < raw.len() {
                    raw[i].push(value.to_string());
                }
            }
        }
        let num_records = raw.first().map(|c| c.len()).unwrap_or(0);

        let mut descriptors = Vec::with_capacity(headers.len());
        let mut columns = Vec::with_capacity(headers.len());
        for (name, values) in headers.into_iter().zip(raw) {
            let dtype = infer_type(&values);
            let missing = values.iter().filter(|s| s.trim().is_empty()).count();
            descriptors.push(ColumnDescriptor::new(name, dtype).with_missing(missing));
            columns.push(parse_column(&values, dtype));
        }

        let mut metadata = HashMap::new();
        metadata.insert("format".to_string(), "CSV".to_string());
        metadata.insert("delimiter".to_string(), (delimiter as char).to_string());

        Ok(Self {
            path: None,
            schema: DataSchema::new(descriptors, num_records),
            columns,
            metadata,
        })
    }

    pub(crate) fn set_path(&mut self, path: &str) {
        self.path = Some(path.to_string());
    }
}

impl DataReader for CsvReader {
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
        "CSV"
    }
}

/// Infer column type from its values
///
/// Integers and booleans need every cell filled; a float column can carry
/// blanks as missing values.
fn infer_type(values: &[String]) -> ColumnType {
    let non_empty: Vec<&str> = values
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    if non_empty.is_empty() {
        return ColumnType::String;
    }
    let complete = non_empty.len() == values.len();

    if complete && non_empty.iter().all(|s| s.parse::<i64>().is_ok()) {
        return ColumnType::Int64;
    }

    if non_empty.iter().all(|s| s.parse::<f64>().is_ok()) {
        return ColumnType::Float64;
    }

    if complete
        && non_empty.iter().all(|s| {
            matches!(
                s.to_lowercase().as_str(),
                "true" | "false" | "yes" | "no"
            )
        })
    {
        return ColumnType::Bool;
    }

    ColumnType::String
}

/// Parse column values into a DataColumn
fn parse_column(values: &[String], dtype: ColumnType) -> DataColumn {
    match dtype {
        ColumnType::Float64 => DataColumn::Float64(
            values
                .iter()
                .map(|s| s.trim().parse().unwrap_or(f64::NAN))
                .collect(),
        ),
        ColumnType::Int64 => {
            DataColumn::Int64(values.iter().map(|s| s.trim().parse().unwrap_or(0)).collect())
        }
        ColumnType::Bool => DataColumn::Bool(
            values
                .iter()
                .map(|s| matches!(s.trim().to_lowercase().as_str(), "true" | "yes"))
                .collect(),
        ),
        ColumnType::String => DataColumn::String(values.to_vec()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_infer_type_int() {
        assert_eq!(infer_type(&strings(&["1", "2", "3"])), ColumnType::Int64);
    }

    #[test]
    fn test_infer_type_float() {
        assert_eq!(infer_type(&strings(&["1.5", "2.7", "3"])), ColumnType::Float64);
    }

    #[test]
    fn test_ints_with_blanks_become_float() {
        assert_eq!(infer_type(&strings(&["160", "", "172"])), ColumnType::Float64);
    }

    #[test]
    fn test_infer_type_bool() {
        assert_eq!(infer_type(&strings(&["true", "false", "yes"])), ColumnType::Bool);
    }

    #[test]
    fn test_infer_type_string() {
        assert_eq!(infer_type(&strings(&["hello", "world"])), ColumnType::String);
        assert_eq!(infer_type(&strings(&["", ""])), ColumnType::String);
    }

    #[test]
    fn test_from_bytes() {
        let reader = CsvReader::from_bytes(b"Nome, Alt\nAna,1.62\nBia,\n", b',').unwrap();
        let schema = reader.read_schema().unwrap();

        assert_eq!(schema.num_records, 2);
        assert_eq!(schema.column_names(), vec!["Nome", "Alt"]);
        assert_eq!(schema.column("Alt").unwrap().dtype, ColumnType::Float64);
        assert_eq!(schema.column("Alt").unwrap().missing, 1);

        match reader.read_column("Alt").unwrap() {
            DataColumn::Float64(v) => {
                assert_eq!(v[0], 1.62);
                assert!(v[1].is_nan());
            }
            other => panic!("unexpected column {:?}", other),
        }
    }

    #[test]
    fn test_tab_delimited() {
        let reader = CsvReader::from_bytes(b"a\tb\n1\t2\n", b'\t').unwrap();
        assert_eq!(reader.read_schema().unwrap().num_columns(), 2);
        assert_eq!(reader.metadata().get("delimiter").map(String::as_str), Some("\t"));
    }

    #[test]
    fn test_ragged_rows_are_invalid() {
        let err = CsvReader::from_bytes(b"a,b\n1,2,3\n", b',').err().unwrap();
        assert!(matches!(err, IoError::InvalidFormat(_)));
    }

    #[test]
    fn test_read_range() {
        let reader = CsvReader::from_bytes(b"x\n1\n2\n3\n", b',').unwrap();
        let slice = reader.read_range(1, 3).unwrap();
        assert_eq!(slice.start, 1);
        assert_eq!(slice.num_rows, 2);
    }
}
