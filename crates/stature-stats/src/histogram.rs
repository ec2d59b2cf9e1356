//! Plot-oriented summaries
//!
//! Unlike [`BinDefinition`](crate::BinDefinition), which carries semantic
//! ranges, the histogram here picks equal-width buckets from the data alone.

use serde::{Deserialize, Serialize};

use crate::error::{StatsError, StatsResult};
use crate::summary::{quantile_of_sorted, sorted_present};

/// One histogram bucket `[lower, upper)`, the last one closed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Equal-width histogram
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub buckets: Vec<Bucket>,
}

impl Histogram {
    /// Histogram with a bucket count from Sturges' rule
    pub fn sturges(data: &[f64]) -> StatsResult<Self> {
        let n = data.iter().filter(|x| x.is_finite()).count();
        if n == 0 {
            return Err(StatsError::NoData);
        }
        let buckets = ((n as f64).log2().ceil() as usize + 1).max(1);
        Self::with_buckets(data, buckets)
    }

    /// Histogram with a fixed bucket count
    pub fn with_buckets(data: &[f64], buckets: usize) -> StatsResult<Self> {
        let sorted = sorted_present(data)?;
        let buckets = buckets.max(1);

        let lo = sorted[0];
        let hi = sorted[sorted.len() - 1];
        let (lo, hi) = if hi > lo { (lo, hi) } else { (lo - 0.5, hi + 0.5) };
        let width = (hi - lo) / buckets as f64;

        let mut out: Vec<Bucket> = (0..buckets)
            .map(|i| Bucket {
                lower: lo + width * i as f64,
                upper: if i + 1 == buckets {
                    hi
                } else {
                    lo + width * (i + 1) as f64
                },
                count: 0,
            })
            .collect();

        for value in sorted {
            let idx = (((value - lo) / width) as usize).min(buckets - 1);
            out[idx].count += 1;
        }

        Ok(Self { buckets: out })
    }

    /// Largest bucket count
    pub fn max_count(&self) -> usize {
        self.buckets.iter().map(|b| b.count).max().unwrap_or(0)
    }

    /// Total number of counted values
    pub fn total(&self) -> usize {
        self.buckets.iter().map(|b| b.count).sum()
    }
}

/// Quartiles, Tukey whiskers and outliers for a boxplot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxSummary {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    /// Smallest value within `q1 - 1.5 * IQR`
    pub lower_whisker: f64,
    /// Largest value within `q3 + 1.5 * IQR`
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

impl BoxSummary {
    pub fn from_data(data: &[f64]) -> StatsResult<Self> {
        let sorted = sorted_present(data)?;

        let q1 = quantile_of_sorted(&sorted, 0.25);
        let median = quantile_of_sorted(&sorted, 0.5);
        let q3 = quantile_of_sorted(&sorted, 0.75);
        let iqr = q3 - q1;
        let low_fence = q1 - 1.5 * iqr;
        let high_fence = q3 + 1.5 * iqr;

        let inside = |x: &&f64| **x >= low_fence && **x <= high_fence;
        let lower_whisker = sorted.iter().find(inside).copied().unwrap_or(q1);
        let upper_whisker = sorted.iter().rev().find(inside).copied().unwrap_or(q3);
        let outliers = sorted
            .iter()
            .copied()
            .filter(|x| *x < low_fence || *x > high_fence)
            .collect();

        Ok(Self {
            q1,
            median,
            q3,
            lower_whisker,
            upper_whisker,
            outliers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_histogram_counts_everything() {
        let data = vec![1.40, 1.55, 1.65, 1.75, 1.85, f64::NAN];
        let hist = Histogram::sturges(&data).unwrap();

        // ceil(log2(5)) + 1
        assert_eq!(hist.buckets.len(), 4);
        assert_eq!(hist.total(), 5);
        assert_eq!(hist.buckets[0].lower, 1.40);
        assert_eq!(hist.buckets.last().unwrap().upper, 1.85);
    }

    #[test]
    fn test_histogram_maximum_in_last_bucket() {
        let hist = Histogram::with_buckets(&[0.0, 1.0, 2.0, 3.0, 4.0], 4).unwrap();
        let counts: Vec<usize> = hist.buckets.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![1, 1, 1, 2]);
        assert_eq!(hist.max_count(), 2);
    }

    #[test]
    fn test_histogram_constant_series() {
        let hist = Histogram::sturges(&[1.6, 1.6, 1.6]).unwrap();
        assert_eq!(hist.total(), 3);
        assert!(hist.buckets.iter().all(|b| b.upper > b.lower));
    }

    #[test]
    fn test_histogram_empty() {
        assert_eq!(Histogram::sturges(&[]), Err(StatsError::NoData));
        assert_eq!(Histogram::with_buckets(&[f64::NAN], 3), Err(StatsError::NoData));
    }

    #[test]
    fn test_box_summary_outliers() {
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0, 100.0];
        let summary = BoxSummary::from_data(&data).unwrap();

        assert_eq!(summary.outliers, vec![100.0]);
        assert_eq!(summary.lower_whisker, 1.0);
        assert_eq!(summary.upper_whisker, 5.0);
        assert!(summary.q1 <= summary.median && summary.median <= summary.q3);
    }

    #[test]
    fn test_box_summary_single_value() {
        let summary = BoxSummary::from_data(&[1.6]).unwrap();
        assert_eq!(summary.q1, 1.6);
        assert_eq!(summary.q3, 1.6);
        assert_eq!(summary.lower_whisker, 1.6);
        assert_eq!(summary.upper_whisker, 1.6);
        assert!(summary.outliers.is_empty());
    }
}
