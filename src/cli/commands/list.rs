use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::ledger::Ledger;
use crate::models::{LedgerRow, Settings};
use crate::sheet::Workbook;
use crate::utils::colors::{GREEN, color_for_row, paint};
use crate::utils::date::format_iso;
use crate::utils::formatting::{bold, hours, money, rate, truncate};
use crate::utils::table::Table;

const HEADERS: [&str; 9] = [
    "Row", "Date", "Project", "Hours", "Rate", "Amount", "Invoice", "Entry", "Notes",
];

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::List { unbilled } = cmd {
        let workbook = Workbook::open(&cfg.workbook)?;
        let ledger = Ledger::load(&workbook, &cfg.ledger_sheet)?;
        let settings = Settings::load(&workbook, &cfg.settings_sheet).unwrap_or_default();
        let currency = settings.currency();

        let rows: Vec<LedgerRow> = ledger
            .rows()?
            .into_iter()
            .filter(|r| !*unbilled || r.entry.is_eligible())
            .collect();

        if rows.is_empty() {
            println!("No ledger rows in '{}'.", cfg.ledger_sheet);
            return Ok(());
        }

        let mut table = Table::with_headers(&HEADERS);
        for r in &rows {
            table.add_row(row_cells(r, currency));
        }

        let rendered = table.render();
        let mut lines = rendered.lines();
        if let Some(head) = lines.next() {
            println!("{}", bold(head));
        }
        for (line, r) in lines.zip(&rows) {
            let color = color_for_row(r.entry.invoiced, r.entry.is_eligible());
            println!("{}", paint(line, color));
        }

        let open: f64 = rows
            .iter()
            .filter(|r| r.entry.is_eligible())
            .map(|r| r.entry.amount())
            .sum();
        println!(
            "\n{} rows, {}",
            rows.len(),
            paint(&format!("unbilled {}", money(currency, open)), GREEN)
        );
    }
    Ok(())
}

fn row_cells(r: &LedgerRow, currency: &str) -> Vec<String> {
    let e = &r.entry;
    vec![
        r.index.to_string(),
        e.date.map(format_iso).unwrap_or_default(),
        truncate(&e.project, 24),
        hours(e.hours),
        rate(currency, e.rate),
        money(currency, e.amount()),
        e.invoice_label().to_string(),
        e.time_entry_id.map(|id| id.to_string()).unwrap_or_default(),
        truncate(&e.notes, 40),
    ]
}
