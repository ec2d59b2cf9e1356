//! Labelled value ranges
//!
//! A [`BinDefinition`] partitions the number line into contiguous, ordered,
//! half-open ranges `[lower, upper)`. Only the last bin may be unbounded
//! above, in which case it covers `[lower, +inf)`.
//!
//! A value equal to a boundary belongs to the bin that starts there, so
//! `1.60` falls in `[1.60, 1.70)` and not in `[1.50, 1.60)`.

use serde::{Deserialize, Serialize};

use crate::error::{StatsError, StatsResult};

/// A single labelled range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bin {
    /// Human-readable label
    pub label: String,
    /// Inclusive lower bound
    pub lower: f64,
    /// Exclusive upper bound, `None` for unbounded
    #[serde(default)]
    pub upper: Option<f64>,
}

impl Bin {
    /// Create a bounded bin `[lower, upper)`
    pub fn new(label: impl Into<String>, lower: f64, upper: f64) -> Self {
        Self {
            label: label.into(),
            lower,
            upper: Some(upper),
        }
    }

    /// Create an unbounded bin `[lower, +inf)`
    pub fn unbounded(label: impl Into<String>, lower: f64) -> Self {
        Self {
            label: label.into(),
            lower,
            upper: None,
        }
    }

    /// Check whether a value falls in this bin
    pub fn contains(&self, value: f64) -> bool {
        if !value.is_finite() || value < self.lower {
            return false;
        }
        match self.upper {
            Some(upper) => value < upper,
            None => true,
        }
    }
}

/// Outcome of assigning one value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assignment {
    /// Index of the bin in its definition
    Bin(usize),
    /// Missing value or outside every bin
    Unassigned,
}

impl Assignment {
    /// Bin index, if assigned
    pub fn index(&self) -> Option<usize> {
        match self {
            Assignment::Bin(idx) => Some(*idx),
            Assignment::Unassigned => None,
        }
    }

    /// Label of the assigned bin
    pub fn label<'a>(&self, definition: &'a BinDefinition) -> Option<&'a str> {
        self.index()
            .and_then(|idx| definition.bins().get(idx))
            .map(|bin| bin.label.as_str())
    }
}

/// Ordered, validated set of bins
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinDefinition {
    bins: Vec<Bin>,
}

impl BinDefinition {
    /// Build a definition, checking its invariants
    pub fn new(bins: Vec<Bin>) -> StatsResult<Self> {
        if bins.is_empty() {
            return Err(StatsError::InvalidBins(
                "at least one bin is required".to_string(),
            ));
        }

        let last = bins.len() - 1;
        for (i, bin) in bins.iter().enumerate() {
            if bin.label.trim().is_empty() {
                return Err(StatsError::InvalidBins(format!("bin {} has an empty label", i)));
            }
            if bins[..i].iter().any(|b| b.label == bin.label) {
                return Err(StatsError::InvalidBins(format!(
                    "duplicate label '{}'",
                    bin.label
                )));
            }
            if !bin.lower.is_finite() {
                return Err(StatsError::InvalidBins(format!(
                    "bin '{}' has a non-finite lower bound",
                    bin.label
                )));
            }

            match bin.upper {
                Some(upper) => {
                    if !upper.is_finite() {
                        return Err(StatsError::InvalidBins(format!(
                            "bin '{}' has a non-finite upper bound",
                            bin.label
                        )));
                    }
                    if upper <= bin.lower {
                        return Err(StatsError::InvalidBins(format!(
                            "bin '{}' bounds are not increasing ({} >= {})",
                            bin.label, bin.lower, upper
                        )));
                    }
                }
                None if i != last => {
                    return Err(StatsError::InvalidBins(format!(
                        "only the last bin may be unbounded, '{}' is not last",
                        bin.label
                    )));
                }
                None => {}
            }

            if i < last {
                let next = &bins[i + 1];
                if bin.upper != Some(next.lower) {
                    return Err(StatsError::InvalidBins(format!(
                        "bins '{}' and '{}' are not contiguous",
                        bin.label, next.label
                    )));
                }
            }
        }

        Ok(Self { bins })
    }

    /// Build a definition from `labels.len() + 1` edges
    ///
    /// A final edge of `f64::INFINITY` makes the last bin unbounded.
    pub fn from_edges<S: AsRef<str>>(edges: &[f64], labels: &[S]) -> StatsResult<Self> {
        if edges.len() != labels.len() + 1 {
            return Err(StatsError::InvalidBins(format!(
                "{} edges cannot describe {} bins",
                edges.len(),
                labels.len()
            )));
        }

        let bins = labels
            .iter()
            .zip(edges.windows(2))
            .map(|(label, pair)| {
                if pair[1] == f64::INFINITY {
                    Bin::unbounded(label.as_ref(), pair[0])
                } else {
                    Bin::new(label.as_ref(), pair[0], pair[1])
                }
            })
            .collect();

        Self::new(bins)
    }

    /// The standard height ranges, in metres
    pub fn height_ranges() -> Self {
        Self {
            bins: vec![
                Bin::new("<150", 0.0, 1.50),
                Bin::new("150-160", 1.50, 1.60),
                Bin::new("160-170", 1.60, 1.70),
                Bin::new("170-180", 1.70, 1.80),
                Bin::unbounded(">=180", 1.80),
            ],
        }
    }

    /// The bins, in order
    pub fn bins(&self) -> &[Bin] {
        &self.bins
    }

    /// Labels, in order
    pub fn labels(&self) -> Vec<&str> {
        self.bins.iter().map(|b| b.label.as_str()).collect()
    }

    /// Number of bins
    pub fn len(&self) -> usize {
        self.bins.len()
    }

    /// Always false for a validated definition
    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Assign one value to its bin
    ///
    /// Bins are contiguous and sorted, so a binary search on the lower
    /// bounds finds the only candidate.
    pub fn assign(&self, value: f64) -> Assignment {
        if !value.is_finite() {
            return Assignment::Unassigned;
        }

        let idx = self.bins.partition_point(|b| b.lower <= value);
        if idx == 0 {
            return Assignment::Unassigned;
        }

        if self.bins[idx - 1].contains(value) {
            Assignment::Bin(idx - 1)
        } else {
            Assignment::Unassigned
        }
    }

    /// Assign every value of a series
    pub fn assign_all(&self, values: &[f64]) -> Vec<Assignment> {
        values.iter().map(|&v| self.assign(v)).collect()
    }
}

impl Default for BinDefinition {
    fn default() -> Self {
        Self::height_ranges()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label_of(def: &BinDefinition, value: f64) -> Option<&str> {
        def.assign(value).label(def)
    }

    #[test]
    fn test_height_ranges_are_valid() {
        let def = BinDefinition::height_ranges();
        let rebuilt = BinDefinition::new(def.bins().to_vec()).unwrap();
        assert_eq!(rebuilt, def);
        assert_eq!(
            def.labels(),
            vec!["<150", "150-160", "160-170", "170-180", ">=180"]
        );
    }

    #[test]
    fn test_assign_scenario_values() {
        let def = BinDefinition::height_ranges();
        assert_eq!(label_of(&def, 1.40), Some("<150"));
        assert_eq!(label_of(&def, 1.55), Some("150-160"));
        assert_eq!(label_of(&def, 1.65), Some("160-170"));
        assert_eq!(label_of(&def, 1.75), Some("170-180"));
        assert_eq!(label_of(&def, 1.85), Some(">=180"));
        assert_eq!(label_of(&def, 2.50), Some(">=180"));
    }

    #[test]
    fn test_boundary_belongs_to_upper_bin() {
        let def = BinDefinition::height_ranges();
        assert_eq!(label_of(&def, 1.60), Some("160-170"));
        assert_eq!(label_of(&def, 1.50), Some("150-160"));
        assert_eq!(label_of(&def, 1.80), Some(">=180"));
        assert_eq!(label_of(&def, 0.0), Some("<150"));
    }

    #[test]
    fn test_missing_and_out_of_range_unassigned() {
        let def = BinDefinition::height_ranges();
        assert_eq!(def.assign(f64::NAN), Assignment::Unassigned);
        assert_eq!(def.assign(f64::INFINITY), Assignment::Unassigned);
        assert_eq!(def.assign(-0.5), Assignment::Unassigned);
    }

    #[test]
    fn test_bounded_last_bin_leaves_values_above() {
        let def = BinDefinition::from_edges(&[0.0, 1.0, 2.0], &["low", "high"]).unwrap();
        assert_eq!(label_of(&def, 1.999), Some("high"));
        assert_eq!(def.assign(2.0), Assignment::Unassigned);
    }

    #[test]
    fn test_every_value_maps_to_at_most_one_bin() {
        let def = BinDefinition::height_ranges();
        for i in -50..300 {
            let value = i as f64 / 100.0;
            let matching = def.bins().iter().filter(|b| b.contains(value)).count();
            assert!(matching <= 1, "{} matched {} bins", value, matching);
            match def.assign(value) {
                Assignment::Bin(idx) => {
                    assert_eq!(matching, 1);
                    assert!(def.bins()[idx].contains(value));
                }
                Assignment::Unassigned => assert_eq!(matching, 0),
            }
        }
    }

    #[test]
    fn test_from_edges_with_infinity() {
        let def = BinDefinition::from_edges(
            &[0.0, 1.50, 1.60, 1.70, 1.80, f64::INFINITY],
            &["<150", "150-160", "160-170", "170-180", ">=180"],
        )
        .unwrap();
        assert_eq!(def, BinDefinition::height_ranges());
    }

    #[test]
    fn test_rejects_invalid_definitions() {
        assert!(BinDefinition::new(Vec::new()).is_err());
        assert!(BinDefinition::new(vec![Bin::new("a", 1.0, 1.0)]).is_err());
        assert!(BinDefinition::new(vec![Bin::new("a", 2.0, 1.0)]).is_err());
        assert!(BinDefinition::new(vec![Bin::new("a", 0.0, 1.0), Bin::new("b", 1.5, 2.0)]).is_err());
        assert!(BinDefinition::new(vec![Bin::unbounded("a", 0.0), Bin::new("b", 1.0, 2.0)]).is_err());
        assert!(BinDefinition::new(vec![Bin::new("a", 0.0, 1.0), Bin::new("a", 1.0, 2.0)]).is_err());
        assert!(BinDefinition::new(vec![Bin::new(" ", 0.0, 1.0)]).is_err());
        assert!(BinDefinition::from_edges(&[0.0, 1.0], &["a", "b"]).is_err());
    }

    #[test]
    fn test_bin_deserializes_without_upper() {
        let bin: Bin = serde_json::from_str(r#"{"label": ">=180", "lower": 1.8}"#).unwrap();
        assert_eq!(bin, Bin::unbounded(">=180", 1.8));
    }
}
