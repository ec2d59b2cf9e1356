//! stature-stats - Statistical functions for measurement dashboards
//!
//! This crate provides the numeric core behind the dashboard:
//!
//! - **Bins**: labelled half-open ranges and per-value assignment
//! - **Aggregate**: per-bin counts and percentage distributions
//! - **Summary**: median, mean, min, max, mode and quartiles
//! - **Histogram**: equal-width bucketing and box summaries for plotting
//!
//! # Missing Values
//!
//! Non-finite values (`NaN`, `±inf`) are treated as missing everywhere. They
//! are never assigned to a bin and never enter a statistic; when nothing is
//! left the functions return [`StatsError::NoData`] instead of `NaN`.

pub mod aggregate;
pub mod bins;
pub mod error;
pub mod histogram;
pub mod summary;

pub use aggregate::*;
pub use bins::*;
pub use error::*;
pub use histogram::*;
pub use summary::*;
