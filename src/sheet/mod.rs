//! Row/column store: an in-memory grid addressed like a spreadsheet.
//!
//! Rows are 1-based (row 1 is the header row of the ledger), columns are
//! 0-based. Every mutation happens in memory; persistence is the job of
//! [`Workbook`].

mod workbook;

pub use workbook::Workbook;

use crate::errors::{AppError, AppResult};

pub type Row = Vec<String>;

pub const TRUE: &str = "TRUE";
pub const FALSE: &str = "FALSE";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    name: String,
    rows: Vec<Row>,
}

impl Sheet {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            rows: Vec::new(),
        }
    }

    pub fn from_rows(name: &str, rows: Vec<Row>) -> Self {
        Self {
            name: name.to_string(),
            rows,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The full data range, header included.
    pub fn data_range(&self) -> &[Row] {
        &self.rows
    }

    pub fn last_row(&self) -> usize {
        self.rows.len()
    }

    pub fn row(&self, row: usize) -> AppResult<&Row> {
        let i = self.offset(row)?;
        Ok(&self.rows[i])
    }

    /// Cell text; cells beyond the end of a short row read as empty.
    pub fn value(&self, row: usize, col: usize) -> AppResult<&str> {
        Ok(self.row(row)?.get(col).map(String::as_str).unwrap_or(""))
    }

    pub fn set_value(&mut self, row: usize, col: usize, value: &str) -> AppResult<()> {
        let i = self.offset(row)?;
        let cells = &mut self.rows[i];
        if cells.len() <= col {
            cells.resize(col + 1, String::new());
        }
        cells[col] = value.to_string();
        Ok(())
    }

    /// Store a formula; a missing leading `=` is added.
    pub fn set_formula(&mut self, row: usize, col: usize, formula: &str) -> AppResult<()> {
        if formula.starts_with('=') {
            self.set_value(row, col, formula)
        } else {
            self.set_value(row, col, &format!("={formula}"))
        }
    }

    /// Replace a whole row.
    pub fn set_row(&mut self, row: usize, values: Row) -> AppResult<()> {
        let i = self.offset(row)?;
        self.rows[i] = values;
        Ok(())
    }

    /// Append a row at the end and return its 1-based index.
    pub fn append_row(&mut self, values: Row) -> usize {
        self.rows.push(values);
        self.rows.len()
    }

    /// Remove a row; every following row moves up by one.
    pub fn delete_row(&mut self, row: usize) -> AppResult<Row> {
        let i = self.offset(row)?;
        Ok(self.rows.remove(i))
    }

    /// Turn a cell into a checkbox: anything truthy becomes TRUE, the rest FALSE.
    pub fn insert_checkbox(&mut self, row: usize, col: usize) -> AppResult<()> {
        let checked = is_truthy(self.value(row, col)?);
        self.set_value(row, col, if checked { TRUE } else { FALSE })
    }

    fn offset(&self, row: usize) -> AppResult<usize> {
        if row == 0 || row > self.rows.len() {
            return Err(AppError::Sheet(format!(
                "row {} out of range in '{}' (1..={})",
                row,
                self.name,
                self.rows.len()
            )));
        }
        Ok(row - 1)
    }
}

/// Checkbox semantics for cells written by hand or by older tools.
pub fn is_truthy(cell: &str) -> bool {
    matches!(
        cell.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "y" | "x"
    )
}
