//! Ledger schema: named headers resolved to column positions once per load.

use crate::errors::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Date,
    Project,
    Hours,
    CompanySponsor,
    Invoiced,
    Rate,
    Amount,
    InvoiceNumber,
    Notes,
    TimeEntryId,
}

impl Column {
    pub const ALL: [Column; 10] = [
        Column::Date,
        Column::Project,
        Column::Hours,
        Column::CompanySponsor,
        Column::Invoiced,
        Column::Rate,
        Column::Amount,
        Column::InvoiceNumber,
        Column::Notes,
        Column::TimeEntryId,
    ];

    pub fn header(&self) -> &'static str {
        match self {
            Column::Date => "Date",
            Column::Project => "Project",
            Column::Hours => "Hours",
            Column::CompanySponsor => "Company Sponsor",
            Column::Invoiced => "Invoiced",
            Column::Rate => "Rate",
            Column::Amount => "Amount",
            Column::InvoiceNumber => "Invoice Number",
            Column::Notes => "Notes",
            Column::TimeEntryId => "Time Entry ID",
        }
    }

    /// Company Sponsor and Amount may be absent; everything else is needed
    /// by either sync or invoicing.
    pub fn is_required(&self) -> bool {
        !matches!(self, Column::CompanySponsor | Column::Amount)
    }

    fn slot(&self) -> usize {
        *self as usize
    }
}

/// Header positions, validated when the ledger is opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderMap {
    cols: [Option<usize>; 10],
    width: usize,
}

impl HeaderMap {
    /// Scan the header row. Unknown headers are ignored; the first occurrence
    /// of a known header wins; a missing required header is an error.
    pub fn resolve(header_row: &[String]) -> AppResult<Self> {
        let mut cols = [None; 10];
        for (i, cell) in header_row.iter().enumerate() {
            let name = cell.trim();
            if let Some(col) = Column::ALL.iter().find(|c| c.header() == name)
                && cols[col.slot()].is_none()
            {
                cols[col.slot()] = Some(i);
            }
        }

        let missing: Vec<&str> = Column::ALL
            .iter()
            .filter(|c| c.is_required() && cols[c.slot()].is_none())
            .map(|c| c.header())
            .collect();

        if !missing.is_empty() {
            return Err(AppError::Ledger(format!(
                "missing required column(s): {}",
                missing.join(", ")
            )));
        }

        Ok(Self {
            cols,
            width: header_row.len(),
        })
    }

    pub fn get(&self, col: Column) -> Option<usize> {
        self.cols[col.slot()]
    }

    /// Position of a column that must exist.
    pub fn index(&self, col: Column) -> AppResult<usize> {
        self.get(col)
            .ok_or_else(|| AppError::Ledger(format!("column '{}' not present", col.header())))
    }

    /// Number of cells in the header row.
    pub fn width(&self) -> usize {
        self.width
    }
}

/// Header row of a freshly created ledger, in canonical order.
pub fn default_header_row() -> Vec<String> {
    Column::ALL.iter().map(|c| c.header().to_string()).collect()
}
