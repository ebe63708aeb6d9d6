use crate::cli::parser::Cli;
use crate::config::Config;
use crate::core::invoice::DEFAULT_TEMPLATE;
use crate::db::log::audit;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ledger::Ledger;
use crate::models::settings::{
    CURRENCY, DEFAULT_CURRENCY, INVOICE_FOLDER, INVOICE_TEMPLATE, KNOWN_KEYS,
};
use crate::sheet::{Sheet, Workbook};
use crate::ui::messages::{info, success};
use std::fs;
use std::path::Path;

pub const TEMPLATE_FILE: &str = "invoice_template.md";
pub const INVOICE_DIR: &str = "invoices";

/// Handle the `init` command
///
/// Creates whatever is missing, never overwriting:
///  - the configuration file (skipped with `--test`)
///  - the SQLite audit database, migrated to the current schema
///  - the workbook directory with a header-only ledger sheet
///  - a settings sheet listing every known key
///  - a default invoice template
pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    println!("⚙️  Initializing billsync…");

    if !cli.test {
        let path = Config::config_file();
        if cfg.write_if_missing()? {
            println!("📄 Config file : {} (created)", path.display());
        } else {
            println!("📄 Config file : {}", path.display());
        }
    }

    let pool = DbPool::open(Path::new(&cfg.database))?;
    println!("🗄️  Database   : {}", cfg.database);

    let workbook = Workbook::create(&cfg.workbook)?;
    println!("📒 Workbook   : {}", workbook.dir().display());

    if workbook.has_sheet(&cfg.ledger_sheet) {
        info(format!("Sheet '{}' already present, left untouched.", cfg.ledger_sheet));
    } else {
        workbook.save_sheet(&Ledger::empty_sheet(&cfg.ledger_sheet))?;
        success(format!("Created sheet '{}'.", cfg.ledger_sheet));
    }

    let template = workbook.dir().join(TEMPLATE_FILE);
    if workbook.has_sheet(&cfg.settings_sheet) {
        info(format!("Sheet '{}' already present, left untouched.", cfg.settings_sheet));
    } else {
        let rows = KNOWN_KEYS
            .iter()
            .map(|key| {
                let value = match *key {
                    INVOICE_TEMPLATE => template.display().to_string(),
                    INVOICE_FOLDER => workbook.dir().join(INVOICE_DIR).display().to_string(),
                    CURRENCY => DEFAULT_CURRENCY.to_string(),
                    _ => String::new(),
                };
                vec![key.to_string(), value]
            })
            .collect();
        workbook.save_sheet(&Sheet::from_rows(&cfg.settings_sheet, rows))?;
        success(format!(
            "Created sheet '{}': fill in the company and API settings.",
            cfg.settings_sheet
        ));
    }

    if !template.exists() {
        fs::write(&template, DEFAULT_TEMPLATE)?;
        success(format!("Created invoice template {}", template.display()));
    }

    audit(
        &pool.conn,
        "init",
        &cfg.workbook,
        &format!("Initialized workbook {} and database {}", cfg.workbook, cfg.database),
    );

    println!("🎉 billsync initialization completed!");
    Ok(())
}
