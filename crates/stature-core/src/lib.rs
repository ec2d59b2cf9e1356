//! stature-core - Measurement dashboard pipeline
//!
//! This crate ties the tabular readers to the statistics and defines the
//! boundary towards whatever renders the results.
//!
//! # Key Components
//!
//! - **DashboardConfig**: measurement column, data source, bins, chart and
//!   preview settings, loaded from TOML or JSON
//! - **Dashboard**: one pass over a loaded [`Table`](stature_io::Table):
//!   column check, binning, aggregation, summary statistics
//! - **Presenter**: the one-way hand-off to a rendering layer
//! - **Report**: serializable view of an analysis for the JSON API
//!
//! # Flow
//!
//! ```text
//! Table ─► measurement column ─┬─► bins ─► counts ─► percentages ─┐
//!                              └─► summary statistics ────────────┴─► Presenter
//! ```

pub mod config;
pub mod error;
pub mod pipeline;
pub mod presenter;

pub use config::*;
pub use error::*;
pub use pipeline::*;
pub use presenter::*;
