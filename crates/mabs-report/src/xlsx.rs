//! Office Open XML serialization of a [`Report`]

use std::path::{Path, PathBuf};

use rust_xlsxwriter::{Workbook, XlsxError};

use crate::{
    layout::Report,
    sheet::{CellRef, CellValue},
};

/// File extension of saved reports.
pub const REPORT_EXTENSION: &str = "xlsx";

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ReportError {
    #[display("cell {cell} on sheet '{sheet}' is outside the spreadsheet range")]
    OutOfRange {
        sheet: String,
        cell: CellRef,
    },
    #[display("failed to write spreadsheet {}", path.display())]
    Xlsx { path: PathBuf, source: XlsxError },
}

impl Report {
    /// Writes every sheet into a new workbook at `path`, replacing any existing file.
    pub fn save_xlsx(&self, path: &Path) -> Result<(), ReportError> {
        let xlsx_error = |source| ReportError::Xlsx {
            path: path.to_owned(),
            source,
        };

        let mut workbook = Workbook::new();
        for sheet in self.sheets() {
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(sheet.name()).map_err(xlsx_error)?;
            for (cell, value) in sheet.cells() {
                let out_of_range = || ReportError::OutOfRange {
                    sheet: sheet.name().to_owned(),
                    cell,
                };
                let row = cell.row - 1;
                let col = u16::try_from(cell.col - 1).map_err(|_| out_of_range())?;
                match value {
                    CellValue::Text(text) => worksheet.write_string(row, col, text.as_str()),
                    CellValue::Number(number) => worksheet.write_number(row, col, *number),
                }
                .map_err(xlsx_error)?;
            }
        }
        workbook.save(path).map_err(xlsx_error)?;
        log::debug!(
            "Wrote {} sheets to {}",
            self.sheets().count(),
            path.display()
        );
        Ok(())
    }
}
