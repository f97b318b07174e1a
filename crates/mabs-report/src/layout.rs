//! Placement of experiment statistics on threshold sheets
//!
//! Every threshold identity gets its own sheet. Structures are laid out left to
//! right in blocks of [`STRUCTURE_BLOCK_WIDTH`] columns, and each experiment
//! occupies one row, determined by its position in ascending atlas-count order:
//!
//! ```text
//! row 1              structure name
//! row 2              "# atlases" | Dice | Min Dice | Max dice | ... (10 columns)
//! row n + 2          atlas count | median / 5th / 95th per metric
//! ...
//! row gap + 2        "Data for error bar plot"      (shifted one column right)
//! row gap + 3        structure name
//! row gap + 4        low dice | high dice | ... (6 columns)
//! row n + gap + 4    median - 5th | 95th - median per metric
//! ```

use std::collections::BTreeMap;

use mabs_analysis::{
    aggregate::{BucketStats, EmptyBucketError, ExperimentStats},
    selection::Selection,
    threshold::ThresholdId,
};

use crate::sheet::{CellRef, ReportSheet};

/// Default number of rows between the header of the main table and the error-bar block.
pub const DEFAULT_GAP: u32 = 80;

/// Columns reserved per structure.
pub const STRUCTURE_BLOCK_WIDTH: u32 = 11;

const MAIN_HEADERS: [&str; 10] = [
    "# atlases",
    "Dice",
    "Min Dice",
    "Max dice",
    "Average HD",
    "Min Average HD",
    "Max Average HD",
    "95 perc HD",
    "Min 95 perc HD",
    "Max 95 perc HD",
];

const ERROR_BAR_TITLE: &str = "Data for error bar plot";

const ERROR_BAR_HEADERS: [&str; 6] = [
    "low dice",
    "high dice",
    "low avg HD",
    "high avg HD",
    "low 95 perc HD",
    "high 95 perc HD",
];

/// What to do when a selected pair has no measurements in an experiment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EmptyBucketPolicy {
    /// Abort with [`EmptyBucketError`].
    #[default]
    Fail,
    /// Log a warning and leave the experiment's cells for that pair unwritten.
    Skip,
}

/// Row of the `position`-th experiment (1-based) in the main table.
#[must_use]
pub fn main_row(position: u32) -> u32 {
    position + 2
}

/// Row of the `position`-th experiment (1-based) in the error-bar block.
#[must_use]
pub fn error_bar_row(position: u32, gap: u32) -> u32 {
    position + 2 + gap + 2
}

/// The whole report: one sheet per threshold identity, created on first use.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    gap: u32,
    sheets: BTreeMap<ThresholdId, ThresholdSheet>,
}

/// A sheet together with the column block of every structure written to it.
#[derive(Debug, Clone, PartialEq)]
struct ThresholdSheet {
    sheet: ReportSheet,
    /// Blocks are assigned on first appearance and never move.
    blocks: BTreeMap<String, u32>,
}

impl ThresholdSheet {
    fn new(name: String) -> Self {
        Self {
            sheet: ReportSheet::new(name),
            blocks: BTreeMap::new(),
        }
    }

    /// First column (0-based offset) of the structure's block, writing its headers on first use.
    fn block_col(&mut self, structure: &str, gap: u32) -> u32 {
        if let Some(block) = self.blocks.get(structure) {
            return block * STRUCTURE_BLOCK_WIDTH;
        }
        let block = self.blocks.values().max().map_or(0, |last| last + 1);
        log::debug!(
            "Placing structure {structure} in block {block} of sheet {}",
            self.sheet.name()
        );
        self.blocks.insert(structure.to_owned(), block);
        let col = block * STRUCTURE_BLOCK_WIDTH;
        write_headers(&mut self.sheet, col, gap, structure);
        col
    }
}

impl Default for Report {
    fn default() -> Self {
        Self::new(DEFAULT_GAP)
    }
}

impl Report {
    #[must_use]
    pub fn new(gap: u32) -> Self {
        Self {
            gap,
            sheets: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn gap(&self) -> u32 {
        self.gap
    }

    #[must_use]
    pub fn sheet(&self, threshold: &ThresholdId) -> Option<&ReportSheet> {
        self.sheets.get(threshold).map(|entry| &entry.sheet)
    }

    /// Sheets ordered by threshold identity.
    pub fn sheets(&self) -> impl Iterator<Item = &ReportSheet> + '_ {
        self.sheets.values().map(|entry| &entry.sheet)
    }

    fn sheet_mut(&mut self, threshold: &ThresholdId) -> &mut ThresholdSheet {
        self.sheets
            .entry(threshold.clone())
            .or_insert_with(|| {
                log::debug!("Creating sheet {}", threshold.sheet_name());
                ThresholdSheet::new(threshold.sheet_name())
            })
    }

    /// Writes one experiment's row on every selected threshold sheet.
    ///
    /// `position` is the 1-based index of the experiment in ascending atlas-count order.
    /// A structure keeps the column block it got on the first experiment that reported it.
    pub fn add_experiment(
        &mut self,
        position: u32,
        stats: &ExperimentStats,
        selection: &Selection,
        policy: EmptyBucketPolicy,
    ) -> Result<(), EmptyBucketError> {
        let gap = self.gap;
        for threshold in &selection.thresholds {
            let entry = self.sheet_mut(threshold);
            for structure in &selection.structures {
                let col = entry.block_col(structure, gap);

                let bucket = match stats.require(structure, threshold) {
                    Ok(bucket) => bucket,
                    Err(err) if policy == EmptyBucketPolicy::Skip => {
                        log::warn!("{err}; leaving cells empty");
                        continue;
                    }
                    Err(err) => return Err(err),
                };
                write_main_row(
                    &mut entry.sheet,
                    main_row(position),
                    col,
                    stats.atlas_count,
                    bucket,
                );
                write_error_bar_row(&mut entry.sheet, error_bar_row(position, gap), col, bucket);
            }
        }
        Ok(())
    }
}

fn write_headers(sheet: &mut ReportSheet, col: u32, gap: u32, structure: &str) {
    sheet.set_text(CellRef::new(1, col + 1), structure);
    for (offset, header) in (1..).zip(MAIN_HEADERS) {
        sheet.set_text(CellRef::new(2, col + offset), header);
    }

    sheet.set_text(CellRef::new(gap + 2, col + 2), ERROR_BAR_TITLE);
    sheet.set_text(CellRef::new(gap + 3, col + 2), structure);
    for (offset, header) in (2..).zip(ERROR_BAR_HEADERS) {
        sheet.set_text(CellRef::new(gap + 4, col + offset), header);
    }
}

fn write_main_row(
    sheet: &mut ReportSheet,
    row: u32,
    col: u32,
    atlas_count: u32,
    bucket: &BucketStats,
) {
    sheet.set_number(CellRef::new(row, col + 1), f64::from(atlas_count));
    let values = bucket
        .metrics
        .iter()
        .flat_map(|(_, summary)| [summary.median, summary.p05, summary.p95]);
    for (offset, value) in (2..).zip(values) {
        sheet.set_number(CellRef::new(row, col + offset), value);
    }
}

fn write_error_bar_row(sheet: &mut ReportSheet, row: u32, col: u32, bucket: &BucketStats) {
    let values = bucket.metrics.iter().flat_map(|(_, summary)| {
        let bar = summary.error_bar();
        [bar.low, bar.high]
    });
    for (offset, value) in (2..).zip(values) {
        sheet.set_number(CellRef::new(row, col + offset), value);
    }
}
