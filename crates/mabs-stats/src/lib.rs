//! Statistical utilities for segmentation-accuracy reports.
//!
//! - [`percentiles`]: Percentile computation with linear interpolation between closest ranks
//! - [`summary`]: Median / 5th / 95th percentile summaries and error-bar deviations
//!
//! # Examples
//!
//! ```
//! use mabs_stats::{percentiles::Percentiles, summary::PercentileSummary};
//!
//! let values = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let percentiles = Percentiles::new(&values, &[50.0]);
//! assert_eq!(percentiles.get(50.0), Some(3.0));
//!
//! let summary = PercentileSummary::new(values).unwrap();
//! assert_eq!(summary.median, 3.0);
//! ```

pub mod percentiles;
pub mod summary;
