//! Decoding a real workbook from disk and from memory
#![cfg(feature = "spreadsheet")]

use stature_io::spreadsheet_reader::{SpreadsheetFormat, SpreadsheetReader};
use stature_io::{ColumnType, DataReader, Table};

const WORKBOOK: &[u8] = include_bytes!("fixtures/alturas.xlsx");

fn fixture_path() -> String {
    format!("{}/tests/fixtures/alturas.xlsx", env!("CARGO_MANIFEST_DIR"))
}

#[test]
fn test_xlsx_schema_from_header_row() {
    let table = Table::load_file(&fixture_path()).unwrap();
    let schema = table.schema();

    assert_eq!(table.format_name(), "XLSX");
    assert_eq!(table.num_rows(), 4);
    assert_eq!(schema.column_names(), vec!["Nome", "Alt", "Idade"]);

    let alt = schema.column("Alt").unwrap();
    assert_eq!(alt.dtype, ColumnType::Float64);
    assert_eq!(alt.missing, 1);

    let idade = schema.column("Idade").unwrap();
    assert_eq!(idade.dtype, ColumnType::Int64);
    assert_eq!(idade.missing, 0);

    assert_eq!(schema.column("Nome").unwrap().dtype, ColumnType::String);
}

#[test]
fn test_xlsx_blank_height_is_missing() {
    let table = Table::load_bytes("alturas.xlsx", WORKBOOK.to_vec()).unwrap();
    let series = table.measurement("Alt").unwrap();

    assert_eq!(series.len(), 4);
    assert_eq!(series.values()[0], 1.62);
    assert!(series.values()[1].is_nan());
    assert_eq!(series.values()[2], 1.8);
    assert_eq!(series.values()[3], 1.55);
    assert_eq!(series.missing(), 1);
    assert_eq!(series.present(), vec![1.62, 1.8, 1.55]);
}

#[test]
fn test_xlsx_integer_column_as_measurements() {
    let table = Table::load_bytes("alturas.xlsx", WORKBOOK.to_vec()).unwrap();
    let idade = table.measurement("Idade").unwrap();
    assert_eq!(idade.values(), &[30.0, 25.0, 41.0, 19.0]);
}

#[test]
fn test_xlsx_first_sheet_metadata() {
    let reader = SpreadsheetReader::from_bytes(WORKBOOK.to_vec(), SpreadsheetFormat::Xlsx).unwrap();

    assert_eq!(reader.format(), SpreadsheetFormat::Xlsx);
    assert_eq!(reader.format_name(), "XLSX");
    assert_eq!(reader.metadata().get("sheet").map(String::as_str), Some("Alturas"));
}

#[test]
fn test_xlsx_preview_rows() {
    let table = Table::load_bytes("alturas.xlsx", WORKBOOK.to_vec()).unwrap();
    let head = table.head(2);

    assert_eq!(head.num_rows, 2);
    assert_eq!(head.column_names(), vec!["Nome", "Alt", "Idade"]);
}
