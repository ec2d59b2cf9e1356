//! stature-io - Tabular data I/O for measurement dashboards
//!
//! This crate provides readers for the tables the dashboard accepts:
//!
//! - **Spreadsheet**: Excel (`.xlsx`, `.xlsm`, `.xls`) and OpenDocument (`.ods`)
//! - **CSV**: Comma- or tab-separated values with type inference
//!
//! # Design
//!
//! All readers implement the `DataReader` trait for uniform access. A
//! reader's content is copied once into an immutable [`Table`], and the
//! measurement column is pulled out of it through the typed
//! [`Table::measurement`] accessor.

pub mod reader;
pub mod schema;
pub mod table;

#[cfg(feature = "csv")]
pub mod csv_reader;

#[cfg(feature = "spreadsheet")]
pub mod spreadsheet_reader;

pub use reader::*;
pub use schema::*;
pub use table::*;
