//! Bucketing of trial measurements and percentile summaries
//!
//! Buckets are keyed structure → threshold → metric and hold every value the
//! experiment's records contribute. They are rebuilt for each experiment; only
//! the derived [`ExperimentStats`] outlive it.

use std::collections::BTreeMap;

use mabs_stats::summary::PercentileSummary;
use serde::Serialize;

use crate::{
    metric::{Metric, PerMetric},
    record::Record,
    threshold::ThresholdId,
};

/// A selected (structure, threshold) pair without any measurements.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display(
    "experiment with {atlas_count} atlases has no values for structure '{structure}' at threshold '{threshold}'"
)]
pub struct EmptyBucketError {
    pub atlas_count: u32,
    pub structure: String,
    pub threshold: ThresholdId,
}

/// Raw measurements of one experiment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricBuckets {
    pub map: BTreeMap<String, BTreeMap<ThresholdId, PerMetric<Vec<f64>>>>,
}

impl MetricBuckets {
    pub fn collect<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a Record>,
    {
        let mut map = BTreeMap::<String, BTreeMap<ThresholdId, PerMetric<Vec<f64>>>>::new();
        for record in records {
            let bucket = map
                .entry(record.structure.clone())
                .or_default()
                .entry(record.threshold.clone())
                .or_default();
            for (metric, value) in record.metrics.iter() {
                bucket.get_mut(metric).push(*value);
            }
        }
        Self { map }
    }

    #[must_use]
    pub fn get(&self, structure: &str, threshold: &ThresholdId) -> Option<&PerMetric<Vec<f64>>> {
        self.map.get(structure)?.get(threshold)
    }
}

/// Percentile summaries of one (structure, threshold) bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketStats {
    /// Number of records that contributed to the bucket.
    pub samples: usize,
    #[serde(flatten)]
    pub metrics: PerMetric<PercentileSummary>,
}

impl BucketStats {
    /// Returns `None` if any metric has no values.
    #[must_use]
    pub fn from_values(values: &PerMetric<Vec<f64>>) -> Option<Self> {
        let metrics = values.try_map(|v| PercentileSummary::new(v.iter().copied()))?;
        Some(Self {
            samples: values.get(Metric::Dice).len(),
            metrics,
        })
    }
}

/// Flattened view of one bucket, for export.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryRow<'a> {
    pub structure: &'a str,
    pub threshold: &'a ThresholdId,
    #[serde(flatten)]
    pub stats: &'a BucketStats,
}

/// Statistics of every non-empty bucket of one experiment.
#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentStats {
    pub atlas_count: u32,
    pub map: BTreeMap<(String, ThresholdId), BucketStats>,
}

impl ExperimentStats {
    #[must_use]
    pub fn compute(atlas_count: u32, buckets: &MetricBuckets) -> Self {
        let mut map = BTreeMap::new();
        for (structure, thresholds) in &buckets.map {
            for (threshold, values) in thresholds {
                let Some(stats) = BucketStats::from_values(values) else {
                    continue;
                };
                map.insert((structure.clone(), threshold.clone()), stats);
            }
        }
        Self { atlas_count, map }
    }

    #[must_use]
    pub fn get(&self, structure: &str, threshold: &ThresholdId) -> Option<&BucketStats> {
        self.map.get(&(structure.to_owned(), threshold.clone()))
    }

    /// Looks up a pair that is about to be reported.
    pub fn require(
        &self,
        structure: &str,
        threshold: &ThresholdId,
    ) -> Result<&BucketStats, EmptyBucketError> {
        self.get(structure, threshold)
            .ok_or_else(|| EmptyBucketError {
                atlas_count: self.atlas_count,
                structure: structure.to_owned(),
                threshold: threshold.clone(),
            })
    }

    pub fn rows(&self) -> impl Iterator<Item = SummaryRow<'_>> + '_ {
        self.map
            .iter()
            .map(|((structure, threshold), stats)| SummaryRow {
                structure,
                threshold,
                stats,
            })
    }
}
