//! In-memory worksheet model

use std::{collections::BTreeMap, fmt};

/// 1-based cell coordinates, ordered row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellRef {
    pub row: u32,
    pub col: u32,
}

impl CellRef {
    /// Creates a cell reference.
    ///
    /// # Panics
    ///
    /// Panics if `row` or `col` is zero.
    #[must_use]
    pub fn new(row: u32, col: u32) -> Self {
        assert!(row >= 1 && col >= 1, "cell coordinates are 1-based");
        Self { row, col }
    }
}

/// Formats the cell in A1 notation.
///
/// ```
/// use mabs_report::sheet::CellRef;
///
/// assert_eq!(CellRef::new(1, 1).to_string(), "A1");
/// assert_eq!(CellRef::new(3, 28).to_string(), "AB3");
/// ```
impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut letters = Vec::new();
        let mut col = self.col;
        while col > 0 {
            let rem = (col - 1) % 26;
            letters.push(char::from(b'A' + u8::try_from(rem).map_err(|_| fmt::Error)?));
            col = (col - 1) / 26;
        }
        for letter in letters.iter().rev() {
            write!(f, "{letter}")?;
        }
        write!(f, "{}", self.row)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
}

/// A named grid of cells. Writing to an occupied cell replaces its value.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSheet {
    name: String,
    cells: BTreeMap<CellRef, CellValue>,
}

impl ReportSheet {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cells: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_text(&mut self, cell: CellRef, text: impl Into<String>) {
        self.cells.insert(cell, CellValue::Text(text.into()));
    }

    pub fn set_number(&mut self, cell: CellRef, value: f64) {
        self.cells.insert(cell, CellValue::Number(value));
    }

    #[must_use]
    pub fn get(&self, cell: CellRef) -> Option<&CellValue> {
        self.cells.get(&cell)
    }

    #[must_use]
    pub fn number(&self, cell: CellRef) -> Option<f64> {
        match self.get(cell)? {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(_) => None,
        }
    }

    #[must_use]
    pub fn text(&self, cell: CellRef) -> Option<&str> {
        match self.get(cell)? {
            CellValue::Text(s) => Some(s),
            CellValue::Number(_) => None,
        }
    }

    /// Iterates over occupied cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (CellRef, &CellValue)> + '_ {
        self.cells.iter().map(|(cell, value)| (*cell, value))
    }

    /// Largest occupied row, or 0 for an empty sheet.
    #[must_use]
    pub fn max_row(&self) -> u32 {
        self.cells.keys().next_back().map_or(0, |cell| cell.row)
    }
}
