//! Multi-atlas segmentation result analysis
//!
//! This crate turns the raw per-patient trial records of repeated leave-one-out
//! multi-atlas segmentation experiments into per-structure, per-threshold
//! percentile statistics.
//!
//! # Pipeline
//!
//! Each experiment (one directory per atlas count) goes through the same steps:
//!
//! 1. **Enumerate** ([`experiment::enumerate_experiments`]): list experiment
//!    directories in ascending atlas-count order
//! 2. **Parse** ([`record::RecordFile`]): read `patient,key=value,...` records
//! 3. **Discover** ([`schema::Schema`]): collect the structures and
//!    [`threshold::ThresholdId`]s present
//! 4. **Select** ([`selection::SelectionFilter`]): restrict what gets reported
//! 5. **Aggregate** ([`aggregate::MetricBuckets`], [`aggregate::ExperimentStats`]):
//!    bucket measurements and compute median / 5th / 95th percentiles
//!
//! # Examples
//!
//! ```
//! use std::path::Path;
//!
//! use mabs_analysis::{
//!     aggregate::{ExperimentStats, MetricBuckets},
//!     record::RecordFile,
//!     schema::Schema,
//!     selection::SelectionFilter,
//! };
//!
//! let file = RecordFile::parse(
//!     Path::new("seg_dice.csv"),
//!     "p1,struct=parotid,thresh=0.5,dice=0.81,abhd=1.2,95bhd=3.4\n\
//!      p2,struct=parotid,thresh=0.5,dice=0.79,abhd=1.4,95bhd=3.9\n",
//! )?;
//!
//! let schema = Schema::discover(file.records());
//! let selection = SelectionFilter::default().apply(&schema)?;
//! let stats = ExperimentStats::compute(5, &MetricBuckets::collect(file.records()));
//!
//! for threshold in &selection.thresholds {
//!     let bucket = stats.require("parotid", threshold)?;
//!     assert_eq!(bucket.samples, 2);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod aggregate;
pub mod experiment;
pub mod metric;
pub mod record;
pub mod schema;
pub mod selection;
pub mod threshold;
