//! Analysis pipeline
//!
//! One call to [`Dashboard::analyze`] is one full pass over a loaded table.
//! Nothing is cached between calls.

use serde::{Deserialize, Serialize};
use stature_io::{MeasurementSeries, Table};
use stature_stats::{
    distribute, BinCount, BinCounts, BinDefinition, BinShare, PercentageDistribution, StatsError,
    SummaryStats,
};

use crate::config::DashboardConfig;
use crate::error::{DashboardError, DashboardResult};
use crate::presenter::Presenter;

/// Column name plus bin ranges, ready to analyze tables
#[derive(Debug, Clone)]
pub struct Dashboard {
    column: String,
    bins: BinDefinition,
}

impl Dashboard {
    /// Build from a configuration, validating its bins
    pub fn new(config: &DashboardConfig) -> DashboardResult<Self> {
        Ok(Self {
            column: config.column.clone(),
            bins: config.bin_definition()?,
        })
    }

    /// Build from parts
    pub fn with_bins(column: impl Into<String>, bins: BinDefinition) -> Self {
        Self {
            column: column.into(),
            bins,
        }
    }

    /// Measurement column name
    pub fn column(&self) -> &str {
        &self.column
    }

    /// Bin ranges
    pub fn bins(&self) -> &BinDefinition {
        &self.bins
    }

    /// Validate the column and analyze it
    ///
    /// A missing column fails before any binning or statistics run.
    pub fn analyze(&self, table: &Table) -> DashboardResult<Analysis> {
        let series = table.measurement(&self.column)?;
        self.analyze_series(series)
    }

    /// Analyze an already extracted series
    ///
    /// Fails with `NoData` only when no value is present. When values exist
    /// but none falls in a bin, the statistics are still returned and the
    /// distribution is `None`.
    pub fn analyze_series(&self, series: MeasurementSeries) -> DashboardResult<Analysis> {
        let counts = distribute(&self.bins, series.values());
        let summary = SummaryStats::from_data(series.values())
            .map_err(|e| DashboardError::from_stats(e, &self.column))?;
        let distribution = match counts.percentages() {
            Ok(distribution) => Some(distribution),
            Err(StatsError::NoData) => {
                tracing::warn!(column = %self.column, "no value falls in any bin");
                None
            }
            Err(e) => return Err(DashboardError::from_stats(e, &self.column)),
        };

        tracing::info!(
            column = %self.column,
            rows = series.len(),
            present = summary.count,
            unassigned = counts.unassigned,
            "analysis complete"
        );

        Ok(Analysis {
            series,
            counts,
            distribution,
            summary,
        })
    }

    /// Hand an analysis to a presenter
    pub fn render<P: Presenter>(
        &self,
        analysis: &Analysis,
        presenter: &P,
    ) -> Result<P::Output, P::Error> {
        presenter.render(
            &analysis.summary,
            analysis.distribution.as_ref(),
            &analysis.series,
        )
    }

    /// Analyze and render in one step
    pub fn run<P>(&self, table: &Table, presenter: &P) -> Result<(Analysis, P::Output), P::Error>
    where
        P: Presenter,
        P::Error: From<DashboardError>,
    {
        let analysis = self.analyze(table)?;
        let output = self.render(&analysis, presenter)?;
        Ok((analysis, output))
    }
}

/// Results of one pass
#[derive(Debug, Clone)]
pub struct Analysis {
    /// The raw measurement column
    pub series: MeasurementSeries,
    /// Per-bin counts, with the unassigned total
    pub counts: BinCounts,
    /// Per-bin percentages of the assigned total, `None` when no value
    /// falls in any bin
    pub distribution: Option<PercentageDistribution>,
    /// Summary statistics of the present values
    pub summary: SummaryStats,
}

impl Analysis {
    /// Serializable view
    pub fn report(&self) -> Report {
        Report {
            column: self.series.name.clone(),
            rows: self.series.len(),
            present: self.summary.count,
            missing: self.summary.missing,
            unassigned: self.counts.unassigned,
            counts: self.counts.entries.clone(),
            percentages: self.distribution.as_ref().map(|d| d.entries.clone()),
            summary: self.summary.clone(),
        }
    }
}

/// Analysis summary returned by the JSON API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub column: String,
    pub rows: usize,
    pub present: usize,
    pub missing: usize,
    /// Entries outside every bin, missing ones included
    pub unassigned: usize,
    pub counts: Vec<BinCount>,
    /// `None` when no value falls in any bin
    pub percentages: Option<Vec<BinShare>>,
    pub summary: SummaryStats,
}
