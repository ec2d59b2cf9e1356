//! Presentation boundary
//!
//! The core hands finished results to a [`Presenter`] and never reads
//! anything back. Visual choices (histogram bucketing, box whiskers, pie
//! colours) belong to the implementation.

use stature_io::MeasurementSeries;
use stature_stats::{PercentageDistribution, SummaryStats};

/// Renders one analysis
///
/// `distribution` is `None` when no value fell in any bin; the summary is
/// always complete.
pub trait Presenter {
    /// What rendering produces (markup, images, ...)
    type Output;
    /// Rendering failure
    type Error;

    fn render(
        &self,
        summary: &SummaryStats,
        distribution: Option<&PercentageDistribution>,
        series: &MeasurementSeries,
    ) -> Result<Self::Output, Self::Error>;
}
