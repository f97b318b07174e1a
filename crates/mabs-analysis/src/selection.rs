//! Report-scope filtering of structures and thresholds
//!
//! Statistics are computed for everything an experiment contains; the selection
//! only decides which (structure, threshold) pairs reach the report.
//!
//! Threshold selectors come in two forms:
//!
//! - `family_weight` (e.g. `gaussian_0.5`, `staple_0.2`): a single threshold. The
//!   weight is re-rendered with the family's precision, so `gaussian_0.5` matches
//!   `gaussian_0.500000`.
//! - `family*` (e.g. `staple*`): every threshold whose identity contains `family`.

use std::{collections::BTreeSet, fmt, str::FromStr};

use crate::{
    schema::Schema,
    threshold::{Fusion, ThresholdId},
};

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum SelectionError {
    #[display("invalid threshold selector '{selector}': {reason}")]
    InvalidSelector {
        selector: String,
        reason: &'static str,
    },
    #[display("none of the requested structures ({requested}) are present")]
    NoStructures { requested: String },
    #[display("none of the requested thresholds ({requested}) are present")]
    NoThresholds { requested: String },
}

/// One `--thresholds` token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThresholdSelector {
    /// A single, fully specified threshold.
    Exact(ThresholdId),
    /// Every threshold whose identity contains the prefix.
    Family { prefix: String },
}

impl ThresholdSelector {
    #[must_use]
    pub fn matches(&self, threshold: &ThresholdId) -> bool {
        match self {
            ThresholdSelector::Exact(id) => id == threshold,
            ThresholdSelector::Family { prefix } => threshold.as_str().contains(prefix.as_str()),
        }
    }
}

impl fmt::Display for ThresholdSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThresholdSelector::Exact(id) => fmt::Display::fmt(id, f),
            ThresholdSelector::Family { prefix } => write!(f, "{prefix}*"),
        }
    }
}

impl FromStr for ThresholdSelector {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason| SelectionError::InvalidSelector {
            selector: s.to_owned(),
            reason,
        };

        if let Some((prefix, _)) = s.split_once('*') {
            return Ok(ThresholdSelector::Family {
                prefix: prefix.to_owned(),
            });
        }

        let mut parts = s.split('_');
        let (Some(family), Some(weight), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(invalid("expected 'family_weight' or 'family*'"));
        };
        let fusion = family
            .parse::<Fusion>()
            .map_err(|_| invalid("unknown fusion family (expected 'gaussian' or 'staple')"))?;
        let weight = weight
            .parse::<f64>()
            .map_err(|_| invalid("weight is not a number"))?;
        Ok(ThresholdSelector::Exact(ThresholdId::new(fusion, weight)))
    }
}

/// User-supplied structure and threshold allow-lists.
///
/// An empty list means "no filter".
#[derive(Debug, Clone, Default)]
pub struct SelectionFilter {
    structures: Vec<String>,
    thresholds: Vec<ThresholdSelector>,
}

/// Structures and thresholds that reach the report for one experiment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub structures: BTreeSet<String>,
    pub thresholds: BTreeSet<ThresholdId>,
}

impl SelectionFilter {
    #[must_use]
    pub fn new(structures: Vec<String>, thresholds: Vec<ThresholdSelector>) -> Self {
        Self {
            structures,
            thresholds,
        }
    }

    /// Intersects the filter with the structures and thresholds discovered in an experiment.
    ///
    /// Fails when a non-empty filter leaves nothing selected.
    pub fn apply(&self, schema: &Schema) -> Result<Selection, SelectionError> {
        let structures = if self.structures.is_empty() {
            schema.structures.clone()
        } else {
            let selected = schema
                .structures
                .iter()
                .filter(|s| self.structures.contains(*s))
                .cloned()
                .collect::<BTreeSet<_>>();
            if selected.is_empty() {
                return Err(SelectionError::NoStructures {
                    requested: self.structures.join(" "),
                });
            }
            selected
        };

        let thresholds = if self.thresholds.is_empty() {
            schema.thresholds.clone()
        } else {
            let selected = schema
                .thresholds
                .iter()
                .filter(|t| self.thresholds.iter().any(|sel| sel.matches(t)))
                .cloned()
                .collect::<BTreeSet<_>>();
            if selected.is_empty() {
                return Err(SelectionError::NoThresholds {
                    requested: self
                        .thresholds
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join(" "),
                });
            }
            selected
        };

        Ok(Selection {
            structures,
            thresholds,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> Schema {
        Schema {
            structures: ["brainstem", "parotid"]
                .into_iter()
                .map(str::to_owned)
                .collect(),
            thresholds: [
                ThresholdId::new(Fusion::Gaussian, 0.1),
                ThresholdId::new(Fusion::Staple, 0.2),
            ]
            .into_iter()
            .collect(),
        }
    }

    fn thresholds(filter: &SelectionFilter) -> Vec<String> {
        filter
            .apply(&schema())
            .unwrap()
            .thresholds
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    fn selectors(s: &str) -> Vec<ThresholdSelector> {
        s.split(' ').map(|t| t.parse().unwrap()).collect()
    }

    #[test]
    fn test_no_filter_passes_everything() {
        let selection = SelectionFilter::default().apply(&schema()).unwrap();
        assert_eq!(selection.structures, schema().structures);
        assert_eq!(selection.thresholds, schema().thresholds);
    }

    #[test]
    fn test_family_wildcard() {
        let filter = SelectionFilter::new(vec![], selectors("staple*"));
        assert_eq!(thresholds(&filter), vec!["staple_0.200000000"]);
    }

    #[test]
    fn test_exact_selector() {
        let filter = SelectionFilter::new(vec![], selectors("gaussian_0.100000"));
        assert_eq!(thresholds(&filter), vec!["gaussian_0.100000"]);

        let filter = SelectionFilter::new(vec![], selectors("staple_0.2"));
        assert_eq!(thresholds(&filter), vec!["staple_0.200000000"]);
    }

    #[test]
    fn test_union_of_selectors() {
        let filter = SelectionFilter::new(vec![], selectors("gaussian_0.1 staple* gaussian_0.9"));
        assert_eq!(
            thresholds(&filter),
            vec!["gaussian_0.100000", "staple_0.200000000"]
        );
    }

    #[test]
    fn test_structure_filter() {
        let filter = SelectionFilter::new(vec!["parotid".to_owned(), "cochlea".to_owned()], vec![]);
        let selection = filter.apply(&schema()).unwrap();
        assert_eq!(
            selection.structures.into_iter().collect::<Vec<_>>(),
            vec!["parotid"]
        );
    }

    #[test]
    fn test_empty_intersection_is_error() {
        let filter = SelectionFilter::new(vec!["cochlea".to_owned()], vec![]);
        assert_eq!(
            filter.apply(&schema()),
            Err(SelectionError::NoStructures {
                requested: "cochlea".to_owned()
            })
        );

        let filter = SelectionFilter::new(vec![], selectors("gaussian_0.7"));
        assert!(matches!(
            filter.apply(&schema()),
            Err(SelectionError::NoThresholds { .. })
        ));
    }

    #[test]
    fn test_invalid_selectors() {
        for token in ["gaussian", "majority_0.5", "staple_high", "gaussian_0_5"] {
            assert!(
                matches!(
                    token.parse::<ThresholdSelector>(),
                    Err(SelectionError::InvalidSelector { .. })
                ),
                "{token}"
            );
        }
    }

    #[test]
    fn test_selector_display() {
        assert_eq!(selectors("staple*")[0].to_string(), "staple*");
        assert_eq!(selectors("gaussian_0.5")[0].to_string(), "gaussian_0.500000");
    }
}
