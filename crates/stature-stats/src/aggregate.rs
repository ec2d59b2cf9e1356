//! Per-bin counts and percentage distributions
//!
//! Output always follows the order of the [`BinDefinition`], never the
//! order values were seen in, so charts built from it are deterministic.

use serde::{Deserialize, Serialize};

use crate::bins::{Assignment, BinDefinition};
use crate::error::{StatsError, StatsResult};

/// Count of entries in one bin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinCount {
    pub label: String,
    pub count: usize,
}

/// Counts for every bin of a definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinCounts {
    /// One entry per bin, zero-filled
    pub entries: Vec<BinCount>,
    /// Entries that were missing or fell outside every bin
    pub unassigned: usize,
}

impl BinCounts {
    /// Tally assignments against their definition
    pub fn tally(definition: &BinDefinition, assignments: &[Assignment]) -> Self {
        let mut counts = vec![0usize; definition.len()];
        let mut unassigned = 0;

        for assignment in assignments {
            match assignment.index() {
                Some(idx) if idx < counts.len() => counts[idx] += 1,
                _ => unassigned += 1,
            }
        }

        let entries = definition
            .bins()
            .iter()
            .zip(counts)
            .map(|(bin, count)| BinCount {
                label: bin.label.clone(),
                count,
            })
            .collect();

        Self {
            entries,
            unassigned,
        }
    }

    /// Count for a label
    pub fn get(&self, label: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|e| e.label == label)
            .map(|e| e.count)
    }

    /// Number of entries that landed in some bin
    pub fn total_assigned(&self) -> usize {
        self.entries.iter().map(|e| e.count).sum()
    }

    /// Convert counts to percentages of the assigned total
    pub fn percentages(&self) -> StatsResult<PercentageDistribution> {
        let total = self.total_assigned();
        if total == 0 {
            return Err(StatsError::NoData);
        }

        let entries = self
            .entries
            .iter()
            .map(|e| BinShare {
                label: e.label.clone(),
                percent: e.count as f64 / total as f64 * 100.0,
            })
            .collect();

        Ok(PercentageDistribution { entries })
    }
}

/// Share of one bin, in percent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinShare {
    pub label: String,
    pub percent: f64,
}

/// Percent of the assigned total per bin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PercentageDistribution {
    pub entries: Vec<BinShare>,
}

impl PercentageDistribution {
    /// Percentage for a label
    pub fn get(&self, label: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.label == label)
            .map(|e| e.percent)
    }

    /// Iterate `(label, percent)` pairs in bin order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|e| (e.label.as_str(), e.percent))
    }

    /// Sum of all percentages
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|e| e.percent).sum()
    }
}

/// Assign and tally a series in one step
pub fn distribute(definition: &BinDefinition, values: &[f64]) -> BinCounts {
    BinCounts::tally(definition, &definition.assign_all(values))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_value_per_bin() {
        let def = BinDefinition::height_ranges();
        let counts = distribute(&def, &[1.40, 1.55, 1.65, 1.75, 1.85]);

        for label in def.labels() {
            assert_eq!(counts.get(label), Some(1));
        }
        assert_eq!(counts.unassigned, 0);

        let pct = counts.percentages().unwrap();
        for (_, percent) in pct.iter() {
            assert!((percent - 20.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_single_bin_takes_everything() {
        let def = BinDefinition::height_ranges();
        let counts = distribute(&def, &[1.60, 1.60, 1.60]);

        assert_eq!(counts.get("160-170"), Some(3));
        assert_eq!(counts.total_assigned(), 3);

        let pct = counts.percentages().unwrap();
        assert_eq!(pct.get("160-170"), Some(100.0));
        assert_eq!(pct.get("<150"), Some(0.0));
        assert_eq!(pct.get("150-160"), Some(0.0));
        assert_eq!(pct.get("170-180"), Some(0.0));
        assert_eq!(pct.get(">=180"), Some(0.0));
    }

    #[test]
    fn test_empty_series_has_no_percentages() {
        let def = BinDefinition::height_ranges();
        let counts = distribute(&def, &[]);

        assert_eq!(counts.entries.len(), 5);
        assert!(counts.entries.iter().all(|e| e.count == 0));
        assert_eq!(counts.percentages(), Err(StatsError::NoData));
    }

    #[test]
    fn test_all_missing_has_no_percentages() {
        let def = BinDefinition::height_ranges();
        let counts = distribute(&def, &[f64::NAN, f64::NAN, -1.0]);

        assert_eq!(counts.unassigned, 3);
        assert_eq!(counts.percentages(), Err(StatsError::NoData));
    }

    #[test]
    fn test_unassigned_excluded_from_percentages() {
        let def = BinDefinition::height_ranges();
        let counts = distribute(&def, &[1.40, f64::NAN, 1.85, -2.0]);

        assert_eq!(counts.total_assigned() + counts.unassigned, 4);
        let pct = counts.percentages().unwrap();
        assert_eq!(pct.get("<150"), Some(50.0));
        assert_eq!(pct.get(">=180"), Some(50.0));
    }

    #[test]
    fn test_percentages_sum_to_hundred() {
        let def = BinDefinition::height_ranges();
        let values: Vec<f64> = (0..997).map(|i| 1.3 + (i % 71) as f64 * 0.01).collect();
        let pct = distribute(&def, &values).percentages().unwrap();

        assert!((pct.total() - 100.0).abs() < 1e-9 * 100.0);
    }

    #[test]
    fn test_order_follows_definition() {
        let def = BinDefinition::height_ranges();
        let counts = distribute(&def, &[1.85, 1.40, 1.85]);
        let labels: Vec<&str> = counts.entries.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, def.labels());
    }
}
