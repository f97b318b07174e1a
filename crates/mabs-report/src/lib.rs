//! Spreadsheet report of per-experiment segmentation statistics
//!
//! - [`sheet`]: in-memory worksheet model with 1-based [`sheet::CellRef`] addressing
//! - [`layout`]: the [`layout::Report`], one sheet per threshold, filled one experiment at a time
//! - [`xlsx`]: saving a report as an `.xlsx` workbook

pub mod layout;
pub mod sheet;
pub mod xlsx;
