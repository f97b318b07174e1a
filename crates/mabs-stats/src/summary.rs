use serde::{Deserialize, Serialize};

use crate::percentiles::Percentiles;

/// Percentile points reported for every bucket of measurements.
pub const SUMMARY_PERCENTILES: [f64; 3] = [5.0, 50.0, 95.0];

/// Median and 5th/95th percentiles of a dataset.
///
/// # Examples
///
/// ```
/// use mabs_stats::summary::PercentileSummary;
///
/// let summary = PercentileSummary::new([1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
/// assert_eq!(summary.median, 3.0);
/// assert!(summary.p05 <= summary.median && summary.median <= summary.p95);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentileSummary {
    /// The 50th percentile.
    pub median: f64,
    /// The 5th percentile.
    pub p05: f64,
    /// The 95th percentile.
    pub p95: f64,
}

/// Signed distances from the median to the outer percentiles.
///
/// This is the shape expected by asymmetric error-bar plots: `low` is drawn
/// below the median and `high` above it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ErrorBar {
    /// `median - p05`
    pub low: f64,
    /// `p95 - median`
    pub high: f64,
}

impl PercentileSummary {
    /// Computes the summary from unsorted values.
    ///
    /// Returns `None` if the dataset is empty.
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut values = values.into_iter().collect::<Vec<_>>();
        values.sort_by(f64::total_cmp);
        Self::from_sorted(&values)
    }

    /// Computes the summary from values sorted in ascending order.
    ///
    /// Returns `None` if the dataset is empty.
    #[must_use]
    pub fn from_sorted(sorted_values: &[f64]) -> Option<Self> {
        if sorted_values.is_empty() {
            return None;
        }
        let percentiles = Percentiles::from_sorted(sorted_values, &SUMMARY_PERCENTILES);
        Some(Self {
            median: percentiles.get(50.0)?,
            p05: percentiles.get(5.0)?,
            p95: percentiles.get(95.0)?,
        })
    }

    /// Returns the deviations of the 5th and 95th percentiles from the median.
    ///
    /// ```
    /// use mabs_stats::summary::{ErrorBar, PercentileSummary};
    ///
    /// let summary = PercentileSummary { median: 0.8, p05: 0.5, p95: 0.9 };
    /// let bar = summary.error_bar();
    /// assert!((bar.low - 0.3).abs() < 1e-12);
    /// assert!((bar.high - 0.1).abs() < 1e-12);
    /// ```
    #[must_use]
    pub fn error_bar(&self) -> ErrorBar {
        ErrorBar {
            low: self.median - self.p05,
            high: self.p95 - self.median,
        }
    }
}
