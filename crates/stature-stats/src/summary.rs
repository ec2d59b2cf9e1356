//! Summary statistics for a measurement series
//!
//! Provides the descriptive statistics shown on the dashboard:
//! - Min, max, mean
//! - Median and quartiles (linear interpolation between closest ranks)
//! - Mode (smallest of the most frequent values)
//! - Sample standard deviation
//!
//! Each statistic is available as an independent function so one failing
//! never blocks the others.

use serde::{Deserialize, Serialize};

use crate::error::{StatsError, StatsResult};

/// Summary statistics for a numeric dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    /// Number of present values
    pub count: usize,
    /// Number of missing/NaN values
    pub missing: usize,
    /// Minimum value
    pub min: f64,
    /// Maximum value
    pub max: f64,
    /// Mean (average)
    pub mean: f64,
    /// Median (50th percentile)
    pub median: f64,
    /// Most frequent value
    pub mode: f64,
    /// First quartile (25th percentile)
    pub q1: f64,
    /// Third quartile (75th percentile)
    pub q3: f64,
    /// Sample standard deviation, absent for a single value
    pub std_dev: Option<f64>,
}

impl SummaryStats {
    /// Compute summary statistics from data
    ///
    /// Fails with [`StatsError::NoData`] when no finite value is present.
    pub fn from_data(data: &[f64]) -> StatsResult<Self> {
        let sorted = sorted_present(data)?;
        let count = sorted.len();

        Ok(Self {
            count,
            missing: data.len() - count,
            min: sorted[0],
            max: sorted[count - 1],
            mean: mean_of_sorted(&sorted),
            median: quantile_of_sorted(&sorted, 0.5),
            mode: mode_of_sorted(&sorted),
            q1: quantile_of_sorted(&sorted, 0.25),
            q3: quantile_of_sorted(&sorted, 0.75),
            std_dev: std_dev(&sorted).ok(),
        })
    }

    /// Get the range (max - min)
    pub fn range(&self) -> f64 {
        self.max - self.min
    }

    /// Get the interquartile range (q3 - q1)
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }
}

/// Minimum of the present values
pub fn min(data: &[f64]) -> StatsResult<f64> {
    present(data).min_by(f64::total_cmp).ok_or(StatsError::NoData)
}

/// Maximum of the present values
pub fn max(data: &[f64]) -> StatsResult<f64> {
    present(data).max_by(f64::total_cmp).ok_or(StatsError::NoData)
}

/// Arithmetic mean of the present values
pub fn mean(data: &[f64]) -> StatsResult<f64> {
    sorted_present(data).map(|sorted| mean_of_sorted(&sorted))
}

/// Median of the present values
///
/// For an even count this is the average of the two central values.
pub fn median(data: &[f64]) -> StatsResult<f64> {
    quantile(data, 0.5)
}

/// Most frequent present value
///
/// When several values share the highest frequency the smallest one wins,
/// which also makes an all-distinct series return its minimum.
pub fn mode(data: &[f64]) -> StatsResult<f64> {
    sorted_present(data).map(|sorted| mode_of_sorted(&sorted))
}

/// Quantile `p` in `[0, 1]`, interpolating linearly between closest ranks
pub fn quantile(data: &[f64], p: f64) -> StatsResult<f64> {
    if !(0.0..=1.0).contains(&p) {
        return Err(StatsError::InvalidQuantile(p));
    }
    sorted_present(data).map(|sorted| quantile_of_sorted(&sorted, p))
}

/// Sample standard deviation (n - 1 denominator)
///
/// Needs at least two present values.
pub fn std_dev(data: &[f64]) -> StatsResult<f64> {
    let sorted = sorted_present(data)?;
    let n = sorted.len();
    if n < 2 {
        return Err(StatsError::NoData);
    }

    let mean = mean_of_sorted(&sorted);
    let variance = sorted.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    Ok(variance.sqrt())
}

fn present(data: &[f64]) -> impl Iterator<Item = f64> + '_ {
    data.iter().copied().filter(|x| x.is_finite())
}

pub(crate) fn sorted_present(data: &[f64]) -> StatsResult<Vec<f64>> {
    let mut sorted: Vec<f64> = present(data).collect();
    if sorted.is_empty() {
        return Err(StatsError::NoData);
    }
    sorted.sort_by(f64::total_cmp);
    Ok(sorted)
}

fn mean_of_sorted(sorted: &[f64]) -> f64 {
    let lo = sorted[0];
    let hi = sorted[sorted.len() - 1];
    // Scaling each term before subtracting keeps wide finite ranges finite.
    let mean = sorted
        .iter()
        .enumerate()
        .fold(0.0, |m, (i, x)| {
            let k = (i + 1) as f64;
            m + (x / k - m / k)
        });
    // Rounding can push the mean past the extremes of a near-constant series.
    mean.clamp(lo, hi)
}

pub(crate) fn quantile_of_sorted(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }

    let h = (n - 1) as f64 * p;
    let lower = h.floor() as usize;
    let upper = (lower + 1).min(n - 1);
    let frac = h - lower as f64;

    if frac == 0.0 || sorted[lower] == sorted[upper] {
        sorted[lower]
    } else {
        sorted[lower] + frac * (sorted[upper] - sorted[lower])
    }
}

fn mode_of_sorted(sorted: &[f64]) -> f64 {
    let mut best = sorted[0];
    let mut best_count = 0;

    let mut i = 0;
    while i < sorted.len() {
        let value = sorted[i];
        let run = sorted[i..]
            .iter()
            .take_while(|&&x| x == value)
            .count();
        if run > best_count {
            best = value;
            best_count = run;
        }
        i += run;
    }

    best
}
