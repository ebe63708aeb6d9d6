//! Billable ledger accessor: typed rows over the billable-hours sheet.

pub mod schema;

pub use schema::{Column, HeaderMap, default_header_row};

use crate::errors::{AppError, AppResult};
use crate::models::{LedgerEntry, LedgerRow};
use crate::sheet::{self, Row, Sheet, Workbook};
use crate::utils::date::{format_iso, parse_date};
use chrono::NaiveDate;

/// First data row (row 1 holds the headers).
pub const FIRST_DATA_ROW: usize = 2;

#[derive(Debug, Clone)]
pub struct Ledger {
    sheet: Sheet,
    headers: HeaderMap,
}

impl Ledger {
    /// Open a ledger over a sheet, resolving its header row.
    pub fn from_sheet(sheet: Sheet) -> AppResult<Self> {
        let header_row = sheet.data_range().first().ok_or_else(|| {
            AppError::Ledger(format!("sheet '{}' has no header row", sheet.name()))
        })?;
        let headers = HeaderMap::resolve(header_row)?;
        Ok(Self { sheet, headers })
    }

    /// Read the ledger sheet from a workbook.
    pub fn load(workbook: &Workbook, sheet_name: &str) -> AppResult<Self> {
        Self::from_sheet(workbook.sheet(sheet_name)?)
    }

    /// Persist the whole sheet in one write.
    pub fn save(&self, workbook: &Workbook) -> AppResult<()> {
        workbook.save_sheet(self.sheet())
    }

    /// An empty ledger sheet with the canonical header row.
    pub fn empty_sheet(name: &str) -> Sheet {
        Sheet::from_rows(name, vec![default_header_row()])
    }

    pub fn sheet(&self) -> &Sheet {
        &self.sheet
    }

    /// All data rows with their current 1-based index.
    pub fn rows(&self) -> AppResult<Vec<LedgerRow>> {
        self.sheet
            .data_range()
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, cells)| {
                let index = i + 1;
                Ok(LedgerRow {
                    index,
                    entry: self.parse_entry(index, cells)?,
                })
            })
            .collect()
    }

    /// Rewrite the fields owned by the tracking system; Amount follows the row's rate.
    pub fn update_tracked_fields(
        &mut self,
        row: usize,
        date: NaiveDate,
        hours: f64,
        notes: &str,
    ) -> AppResult<()> {
        self.ensure_data_row(row)?;
        let rate_col = self.headers.index(Column::Rate)?;
        let rate = parse_number(self.sheet.value(row, rate_col)?, row, Column::Rate)?;

        self.set(row, Column::Date, &format_iso(date))?;
        self.set(row, Column::Hours, &hours.to_string())?;
        self.set(row, Column::Notes, notes)?;
        self.set(row, Column::Amount, &(hours * rate).to_string())?;
        Ok(())
    }

    /// Append a new row and return its index.
    pub fn append(&mut self, entry: &LedgerEntry) -> AppResult<usize> {
        let mut cells: Row = vec![String::new(); self.headers.width()];
        let mut put = |col: Column, value: String| {
            if let Some(i) = self.headers.get(col) {
                cells[i] = value;
            }
        };

        put(Column::Date, entry.date.map(format_iso).unwrap_or_default());
        put(Column::Project, entry.project.clone());
        put(Column::Hours, entry.hours.to_string());
        put(Column::CompanySponsor, entry.company_sponsor.clone());
        put(
            Column::Invoiced,
            if entry.invoiced { sheet::TRUE } else { sheet::FALSE }.to_string(),
        );
        put(Column::Rate, entry.rate.to_string());
        put(Column::Amount, entry.amount().to_string());
        put(Column::InvoiceNumber, entry.invoice_number.clone());
        put(Column::Notes, entry.notes.clone());
        put(
            Column::TimeEntryId,
            entry.time_entry_id.map(|id| id.to_string()).unwrap_or_default(),
        );

        let index = self.sheet.append_row(cells);
        self.sheet
            .insert_checkbox(index, self.headers.index(Column::Invoiced)?)?;
        Ok(index)
    }

    /// Remove a data row; later rows shift up by one.
    pub fn delete(&mut self, row: usize) -> AppResult<()> {
        self.ensure_data_row(row)?;
        self.sheet.delete_row(row)?;
        Ok(())
    }

    /// Tick the Invoiced checkbox and link the row to its invoice document.
    pub fn mark_invoiced(&mut self, row: usize, invoice_formula: &str) -> AppResult<()> {
        self.ensure_data_row(row)?;
        let invoiced = self.headers.index(Column::Invoiced)?;
        self.sheet.set_value(row, invoiced, sheet::TRUE)?;
        self.sheet.insert_checkbox(row, invoiced)?;
        self.sheet
            .set_formula(row, self.headers.index(Column::InvoiceNumber)?, invoice_formula)?;
        Ok(())
    }

    fn set(&mut self, row: usize, col: Column, value: &str) -> AppResult<()> {
        match self.headers.get(col) {
            Some(i) => self.sheet.set_value(row, i, value),
            None => Ok(()),
        }
    }

    fn ensure_data_row(&self, row: usize) -> AppResult<()> {
        if row < FIRST_DATA_ROW || row > self.sheet.last_row() {
            return Err(AppError::Sheet(format!(
                "row {} is not a data row of '{}'",
                row,
                self.sheet.name()
            )));
        }
        Ok(())
    }

    fn parse_entry(&self, index: usize, cells: &Row) -> AppResult<LedgerEntry> {
        let cell = |col: Column| -> &str {
            self.headers
                .get(col)
                .and_then(|i| cells.get(i))
                .map(|s| s.trim())
                .unwrap_or("")
        };

        let raw_date = cell(Column::Date);
        let date = if raw_date.is_empty() {
            None
        } else {
            Some(parse_date(raw_date).ok_or_else(|| {
                AppError::InvalidDate(format!("row {index}: '{raw_date}'"))
            })?)
        };

        let raw_id = cell(Column::TimeEntryId);
        let time_entry_id = if raw_id.is_empty() {
            None
        } else {
            Some(raw_id.parse::<u64>().map_err(|_| {
                AppError::Ledger(format!(
                    "row {index}: invalid {} '{raw_id}'",
                    Column::TimeEntryId.header()
                ))
            })?)
        };

        Ok(LedgerEntry {
            date,
            project: cell(Column::Project).to_string(),
            hours: parse_number(cell(Column::Hours), index, Column::Hours)?,
            company_sponsor: cell(Column::CompanySponsor).to_string(),
            invoiced: sheet::is_truthy(cell(Column::Invoiced)),
            rate: parse_number(cell(Column::Rate), index, Column::Rate)?,
            invoice_number: cell(Column::InvoiceNumber).to_string(),
            notes: cell(Column::Notes).to_string(),
            time_entry_id,
        })
    }
}

/// Numeric cell; empty reads as zero.
fn parse_number(raw: &str, row: usize, col: Column) -> AppResult<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(0.0);
    }
    raw.parse::<f64>().map_err(|_| {
        AppError::Ledger(format!("row {row}: invalid {} '{raw}'", col.header()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(rows: &[&[&str]]) -> Sheet {
        Sheet::from_rows(
            "Billable Hours",
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    const HEADER: &[&str] = &[
        "Date",
        "Project",
        "Hours",
        "Company Sponsor",
        "Invoiced",
        "Rate",
        "Amount",
        "Invoice Number",
        "Notes",
        "Time Entry ID",
    ];

    fn ledger() -> Ledger {
        Ledger::from_sheet(sheet(&[
            HEADER,
            &["2024-01-01", "Site", "2", "ACME", "FALSE", "50", "100", "", "Build - hero", "11"],
            &["", "Site", "1", "ACME", "FALSE", "50", "50", "", "manual", ""],
            &["2024-01-03", "App", "3", "ACME", "TRUE", "40", "120", "=HYPERLINK(\"u\", \"ACME1\")", "x", "12"],
        ]))
        .unwrap()
    }

    #[test]
    fn reads_typed_rows_with_indices() {
        let rows = ledger().rows().unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].index, 2);
        assert_eq!(rows[0].entry.time_entry_id, Some(11));
        assert_eq!(rows[0].entry.hours, 2.0);
        assert_eq!(rows[1].entry.date, None);
        assert_eq!(rows[1].entry.time_entry_id, None);
        assert!(rows[2].entry.invoiced);
        assert!(rows[2].entry.is_protected());
        assert_eq!(rows[2].entry.invoice_label(), "ACME1");
    }

    #[test]
    fn bad_cells_fail_with_row_context() {
        let l = Ledger::from_sheet(sheet(&[HEADER, &["2024-01-01", "Site", "two"]])).unwrap();
        let err = l.rows().unwrap_err().to_string();
        assert!(err.contains("row 2"), "{err}");
        assert!(err.contains("Hours"), "{err}");

        let l = Ledger::from_sheet(sheet(&[HEADER, &["Jan 1st"]])).unwrap();
        assert!(matches!(l.rows(), Err(AppError::InvalidDate(_))));
    }

    #[test]
    fn empty_sheet_has_no_header() {
        let res = Ledger::from_sheet(Sheet::new("Billable Hours"));
        assert!(matches!(res, Err(AppError::Ledger(_))));
    }

    #[test]
    fn update_rewrites_tracked_fields_and_amount() {
        let mut l = ledger();
        let d = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        l.update_tracked_fields(2, d, 1.5, "Build - footer").unwrap();

        let row = &l.rows().unwrap()[0];
        assert_eq!(row.entry.date, Some(d));
        assert_eq!(row.entry.hours, 1.5);
        assert_eq!(row.entry.notes, "Build - footer");
        assert_eq!(l.sheet().value(2, 6).unwrap(), "75");
        assert_eq!(row.entry.project, "Site");
    }

    #[test]
    fn append_fills_known_columns_and_checkbox() {
        let mut l = ledger();
        let entry = LedgerEntry {
            date: NaiveDate::from_ymd_opt(2024, 1, 5),
            project: "Site".into(),
            hours: 2.5,
            company_sponsor: "ACME".into(),
            invoiced: false,
            rate: 40.0,
            invoice_number: String::new(),
            notes: "Build - nav".into(),
            time_entry_id: Some(99),
        };
        let idx = l.append(&entry).unwrap();
        assert_eq!(idx, 5);
        assert_eq!(l.sheet().value(5, 4).unwrap(), "FALSE");
        assert_eq!(l.sheet().value(5, 6).unwrap(), "100");
        assert_eq!(l.rows().unwrap()[3].entry, entry);
    }

    #[test]
    fn header_row_cannot_be_deleted() {
        let mut l = ledger();
        assert!(matches!(l.delete(1), Err(AppError::Sheet(_))));
        l.delete(3).unwrap();
        assert_eq!(l.rows().unwrap()[1].entry.time_entry_id, Some(12));
    }

    #[test]
    fn mark_invoiced_sets_checkbox_and_formula() {
        let mut l = ledger();
        l.mark_invoiced(2, "=HYPERLINK(\"file:///i.pdf\", \"ACME20240131\")")
            .unwrap();
        let row = &l.rows().unwrap()[0];
        assert!(row.entry.invoiced);
        assert_eq!(row.entry.invoice_label(), "ACME20240131");
    }

    #[test]
    fn saved_ledger_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let wb = Workbook::create(dir.path()).unwrap();
        let mut l = ledger();
        l.delete(2).unwrap();
        l.save(&wb).unwrap();

        let again = Ledger::load(&wb, "Billable Hours").unwrap();
        assert_eq!(again.rows().unwrap(), l.rows().unwrap());
    }

    #[test]
    fn optional_columns_may_be_missing() {
        let mut l = Ledger::from_sheet(sheet(&[
            &["Date", "Project", "Hours", "Invoiced", "Rate", "Invoice Number", "Notes", "Time Entry ID"],
            &["2024-01-01", "Site", "2", "", "50", "", "n", "1"],
        ]))
        .unwrap();
        let d = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        l.update_tracked_fields(2, d, 3.0, "n2").unwrap();
        assert_eq!(l.rows().unwrap()[0].entry.company_sponsor, "");
        assert_eq!(l.sheet().row(2).unwrap().len(), 8);
    }
}
