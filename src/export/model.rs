// src/export/model.rs

use crate::models::LedgerRow;
use crate::models::ledger_row::hyperlink_target;
use crate::utils::date::format_iso;
use crate::utils::formatting::{hours, money, rate};
use serde::Serialize;

/// Flat view of a ledger row for export.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct LedgerExport {
    pub row: usize,
    pub date: Option<String>,
    pub project: String,
    pub hours: f64,
    pub company_sponsor: String,
    pub invoiced: bool,
    pub rate: f64,
    pub amount: f64,
    pub invoice_number: String,
    pub invoice_link: Option<String>,
    pub notes: String,
    pub time_entry_id: Option<u64>,
}

impl From<&LedgerRow> for LedgerExport {
    fn from(r: &LedgerRow) -> Self {
        let e = &r.entry;
        Self {
            row: r.index,
            date: e.date.map(format_iso),
            project: e.project.clone(),
            hours: e.hours,
            company_sponsor: e.company_sponsor.clone(),
            invoiced: e.invoiced,
            rate: e.rate,
            amount: e.amount(),
            invoice_number: e.invoice_label().to_string(),
            invoice_link: hyperlink_target(&e.invoice_number).map(str::to_string),
            notes: e.notes.clone(),
            time_entry_id: e.time_entry_id,
        }
    }
}

/// Column order shared by the xlsx and pdf writers.
pub(crate) const HEADERS: [&str; 10] = [
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

/// Printable cells, currency-prefixed where it applies.
pub(crate) fn to_cells(e: &LedgerExport, currency: &str) -> Vec<String> {
    vec![
        e.date.clone().unwrap_or_default(),
        e.project.clone(),
        hours(e.hours),
        e.company_sponsor.clone(),
        if e.invoiced { "yes" } else { "no" }.to_string(),
        rate(currency, e.rate),
        money(currency, e.amount),
        e.invoice_number.clone(),
        e.notes.clone(),
        e.time_entry_id.map(|id| id.to_string()).unwrap_or_default(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LedgerEntry;
    use chrono::NaiveDate;

    #[test]
    fn flattens_hyperlinked_invoice_numbers() {
        let row = LedgerRow {
            index: 4,
            entry: LedgerEntry {
                date: NaiveDate::from_ymd_opt(2024, 1, 2),
                project: "Site".into(),
                hours: 1.5,
                company_sponsor: "ACME".into(),
                invoiced: true,
                rate: 40.0,
                invoice_number: "=HYPERLINK(\"file:///inv.pdf\", \"ACME20240131\")".into(),
                notes: "n".into(),
                time_entry_id: Some(8),
            },
        };
        let e = LedgerExport::from(&row);
        assert_eq!(e.invoice_number, "ACME20240131");
        assert_eq!(e.invoice_link.as_deref(), Some("file:///inv.pdf"));
        assert_eq!(e.amount, 60.0);

        let cells = to_cells(&e, "€");
        assert_eq!(cells.len(), HEADERS.len());
        assert_eq!(cells[6], "€60.00");
        assert_eq!(cells[0], "2024-01-02");
    }
}
