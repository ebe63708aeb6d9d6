//! Invoice selection, numbering and template rendering.

use crate::document::Document;
use crate::errors::{AppError, AppResult};
use crate::models::{LedgerRow, Settings};
use crate::utils::date::{add_one_month, format_compact, format_iso, format_long};
use crate::utils::formatting::{hours, money, rate};
use chrono::NaiveDate;
use serde::Serialize;

/// Text identifying the line-item table of a template.
pub const DETAILS_MARKER: &str = "Details";
/// 0-based position of the example row removed after population.
pub const PLACEHOLDER_ROW: usize = 2;

pub const INVOICE_NUMBER: &str = "{{INVOICE NUMBER}}";
pub const COMPANY_NAME: &str = "{{COMPANY NAME}}";
pub const COMPANY_ADDRESS: &str = "{{COMPANY ADDRESS}}";
pub const ISSUE_DATE: &str = "{{ISSUE DATE}}";
pub const DUE_DATE: &str = "{{DUE DATE}}";
pub const TOTAL_PRICE: &str = "{{TOTAL PRICE}}";

pub const PLACEHOLDERS: [&str; 6] = [
    INVOICE_NUMBER,
    COMPANY_NAME,
    COMPANY_ADDRESS,
    ISSUE_DATE,
    DUE_DATE,
    TOTAL_PRICE,
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceLine {
    /// Ledger row captured before any mutation.
    pub row: usize,
    pub date: NaiveDate,
    pub project: String,
    pub notes: String,
    pub hours: f64,
    pub rate: f64,
    pub amount: f64,
}

impl InvoiceLine {
    pub fn description(&self) -> String {
        format!("[{}] {}", self.project, self.notes)
    }

    pub fn cells(&self, currency: &str) -> Vec<String> {
        vec![
            format_iso(self.date),
            self.description(),
            hours(self.hours),
            rate(currency, self.rate),
            money(currency, self.amount),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceDraft {
    pub number: String,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub lines: Vec<InvoiceLine>,
    pub total: f64,
}

/// Rows not invoiced yet and carrying a date, in ledger order.
pub fn select_eligible(rows: &[LedgerRow]) -> Vec<&LedgerRow> {
    rows.iter().filter(|r| r.entry.is_eligible()).collect()
}

/// One number per run: company id followed by `yyyyMMdd`.
pub fn invoice_number(company_id: &str, today: NaiveDate) -> String {
    format!("{}{}", company_id, format_compact(today))
}

/// Build the draft for every eligible row; `None` when there is nothing to bill.
pub fn draft(rows: &[LedgerRow], company_id: &str, today: NaiveDate) -> AppResult<Option<InvoiceDraft>> {
    let selected = select_eligible(rows);
    if selected.is_empty() {
        return Ok(None);
    }

    let mut total = 0.0;
    let mut lines = Vec::with_capacity(selected.len());
    for r in selected {
        // eligibility guarantees a date
        let Some(date) = r.entry.date else { continue };
        let amount = r.entry.amount();
        total += amount;
        lines.push(InvoiceLine {
            row: r.index,
            date,
            project: r.entry.project.clone(),
            notes: r.entry.notes.clone(),
            hours: r.entry.hours,
            rate: r.entry.rate,
            amount,
        });
    }

    Ok(Some(InvoiceDraft {
        number: invoice_number(company_id, today),
        issue_date: today,
        due_date: add_one_month(today)?,
        lines,
        total,
    }))
}

/// Check the template contract without touching anything.
pub fn validate_template(doc: &Document) -> AppResult<()> {
    let table = doc.find_table(DETAILS_MARKER).ok_or_else(|| {
        AppError::Template(format!("no table containing '{DETAILS_MARKER}' found"))
    })?;

    if table.num_rows() <= PLACEHOLDER_ROW {
        return Err(AppError::Template(format!(
            "details table has no placeholder row at position {} ({} rows)",
            PLACEHOLDER_ROW + 1,
            table.num_rows()
        )));
    }

    let missing: Vec<&str> = PLACEHOLDERS
        .iter()
        .copied()
        .filter(|t| !doc.contains_text(t))
        .collect();
    if !missing.is_empty() {
        return Err(AppError::Template(format!(
            "missing placeholders: {}",
            missing.join(", ")
        )));
    }

    Ok(())
}

/// Fill a validated template with the draft.
pub fn render(doc: &mut Document, draft: &InvoiceDraft, settings: &Settings) -> AppResult<()> {
    validate_template(doc)?;
    let currency = settings.currency();

    let table = doc
        .find_table_mut(DETAILS_MARKER)
        .ok_or_else(|| AppError::Template("details table disappeared".into()))?;
    for line in &draft.lines {
        table.append_row(line.cells(currency));
    }
    table.remove_row(PLACEHOLDER_ROW)?;

    doc.replace_text(INVOICE_NUMBER, &draft.number);
    doc.replace_text(COMPANY_NAME, settings.company_name()?);
    doc.replace_text(COMPANY_ADDRESS, settings.company_address()?);
    doc.replace_text(ISSUE_DATE, &format_long(draft.issue_date));
    doc.replace_text(DUE_DATE, &format_long(draft.due_date));
    doc.replace_text(TOTAL_PRICE, &money(currency, draft.total));
    Ok(())
}

/// Template written by `init`.
pub const DEFAULT_TEMPLATE: &str = "\
# INVOICE {{INVOICE NUMBER}}

Bill to: {{COMPANY NAME}}
{{COMPANY ADDRESS}}

Issue date: {{ISSUE DATE}}
Due date: {{DUE DATE}}

| Details | | | | |
|---|---|---|---|---|
| Date | Description | Hours | Rate | Amount |
| yyyy-mm-dd | [project] notes | 0.00 | 0 | 0.00 |

Total: {{TOTAL PRICE}}
";
