use chrono::NaiveDate;
use serde::Serialize;

/// The persisted fields of a billable-hours row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerEntry {
    pub date: Option<NaiveDate>,
    pub project: String,
    pub hours: f64,
    pub company_sponsor: String,
    pub invoiced: bool,
    pub rate: f64,
    /// Raw cell content; may be a `=HYPERLINK(...)` formula.
    pub invoice_number: String,
    pub notes: String,
    pub time_entry_id: Option<u64>,
}

impl LedgerEntry {
    pub fn amount(&self) -> f64 {
        self.hours * self.rate
    }

    /// Rows already referenced by an invoice are never deleted or overwritten.
    pub fn is_protected(&self) -> bool {
        !self.invoice_number.trim().is_empty()
    }

    /// Not invoiced yet and carrying a date.
    pub fn is_eligible(&self) -> bool {
        !self.invoiced && self.date.is_some()
    }

    /// Visible label of the invoice number cell (the text of a HYPERLINK formula).
    pub fn invoice_label(&self) -> &str {
        hyperlink_label(&self.invoice_number)
    }
}

/// A ledger entry together with its current 1-based sheet row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerRow {
    pub index: usize,
    #[serde(flatten)]
    pub entry: LedgerEntry,
}

/// `=HYPERLINK("url", "label")` → `label`; anything else is returned as-is.
pub fn hyperlink_label(cell: &str) -> &str {
    let trimmed = cell.trim();
    if !trimmed.to_ascii_uppercase().starts_with("=HYPERLINK(") {
        return trimmed;
    }
    let inner = trimmed.trim_end_matches(')');
    let mut quoted = inner.split('"').skip(1).step_by(2);
    let _url = quoted.next();
    quoted.next().unwrap_or(trimmed)
}

/// Link target of a `=HYPERLINK(...)` cell.
pub fn hyperlink_target(cell: &str) -> Option<&str> {
    let trimmed = cell.trim();
    if !trimmed.to_ascii_uppercase().starts_with("=HYPERLINK(") {
        return None;
    }
    trimmed.split('"').nth(1)
}

/// Build the hyperlink formula written into the Invoice Number column.
pub fn hyperlink_formula(url: &str, label: &str) -> String {
    format!(
        "=HYPERLINK(\"{}\", \"{}\")",
        url.replace('"', "%22"),
        label.replace('"', "")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> LedgerEntry {
        LedgerEntry {
            date: NaiveDate::from_ymd_opt(2024, 1, 1),
            project: "Site".into(),
            hours: 2.0,
            company_sponsor: "ACME".into(),
            invoiced: false,
            rate: 50.0,
            invoice_number: String::new(),
            notes: String::new(),
            time_entry_id: Some(1),
        }
    }

    #[test]
    fn amount_is_hours_times_rate() {
        assert_eq!(entry().amount(), 100.0);
    }

    #[test]
    fn protection_follows_invoice_number() {
        let mut e = entry();
        assert!(!e.is_protected());
        e.invoice_number = "   ".into();
        assert!(!e.is_protected());
        e.invoice_number = "ABC123".into();
        assert!(e.is_protected());
    }

    #[test]
    fn eligibility_needs_date_and_open_status() {
        let mut e = entry();
        assert!(e.is_eligible());
        e.date = None;
        assert!(!e.is_eligible());
        e.date = NaiveDate::from_ymd_opt(2024, 1, 2);
        e.invoiced = true;
        assert!(!e.is_eligible());
    }

    #[test]
    fn hyperlink_formula_round_trips_label() {
        let f = hyperlink_formula("file:///tmp/Invoice%20X.pdf", "ACME20240131");
        assert_eq!(f, "=HYPERLINK(\"file:///tmp/Invoice%20X.pdf\", \"ACME20240131\")");
        assert_eq!(hyperlink_label(&f), "ACME20240131");
        assert_eq!(hyperlink_label("INV-7"), "INV-7");
        assert_eq!(hyperlink_target(&f), Some("file:///tmp/Invoice%20X.pdf"));
        assert_eq!(hyperlink_target("INV-7"), None);
    }
}
