use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::generate::{InvoiceLogic, InvoiceOutcome};
use crate::core::invoice::InvoiceDraft;
use crate::db::log::audit;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ledger::Ledger;
use crate::models::Settings;
use crate::sheet::Workbook;
use crate::ui::messages::{header, info, success};
use crate::utils::date::{format_long, today};
use crate::utils::formatting::{money, truncate};
use crate::utils::table::Table;
use std::path::Path;

/// Handle the `invoice` command ("generate invoices").
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Invoice { dry_run } = cmd {
        let workbook = Workbook::open(&cfg.workbook)?;
        let settings = Settings::load(&workbook, &cfg.settings_sheet)?;
        let mut ledger = Ledger::load(&workbook, &cfg.ledger_sheet)?;

        match InvoiceLogic::generate(&mut ledger, &settings, today(), *dry_run)? {
            InvoiceOutcome::NothingToBill => {
                info("No unbilled rows: nothing to invoice.");
            }
            InvoiceOutcome::Drafted(draft) => {
                print_draft(&draft, settings.currency());
                info("Dry run: no document written, ledger unchanged.");
            }
            InvoiceOutcome::Generated {
                draft,
                markdown,
                pdf,
            } => {
                print_draft(&draft, settings.currency());
                ledger.save(&workbook)?;

                success(format!("Invoice written to {}", pdf.display()));
                success(format!("Invoice text written to {}", markdown.display()));
                success(format!(
                    "{} ledger rows marked as invoiced.",
                    draft.lines.len()
                ));

                let pool = DbPool::open(Path::new(&cfg.database))?;
                audit(
                    &pool.conn,
                    "invoice",
                    &draft.number,
                    &format!(
                        "{} rows, total {}, {}",
                        draft.lines.len(),
                        money(settings.currency(), draft.total),
                        pdf.display()
                    ),
                );
            }
        }
    }

    Ok(())
}

fn print_draft(draft: &InvoiceDraft, currency: &str) {
    header(format!("Invoice {}", draft.number));

    let mut t = Table::with_headers(&["Row", "Description", "Amount"]);
    for line in &draft.lines {
        let mut cells = line.cells(currency);
        t.add_row(vec![
            line.row.to_string(),
            truncate(&format!("{} {}", cells[0], line.description()), 60),
            cells.swap_remove(4),
        ]);
    }
    print!("{}", t.render());

    println!("\nIssue date : {}", format_long(draft.issue_date));
    println!("Due date   : {}", format_long(draft.due_date));
    println!("Total      : {}", money(currency, draft.total));
}
