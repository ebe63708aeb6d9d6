use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::log::audit;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::export::{ExportLogic, ExportRequest};
use crate::ledger::Ledger;
use crate::models::Settings;
use crate::sheet::Workbook;
use std::path::Path;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        format,
        file,
        force,
        unbilled,
    } = cmd
    {
        let workbook = Workbook::open(&cfg.workbook)?;
        let ledger = Ledger::load(&workbook, &cfg.ledger_sheet)?;
        // currency is cosmetic here: a missing settings sheet is not fatal
        let settings = Settings::load(&workbook, &cfg.settings_sheet).unwrap_or_default();

        let rows = ledger.rows()?;
        let exported = ExportLogic::export(
            &rows,
            &ExportRequest {
                format: *format,
                file,
                force: *force,
                sheet_name: &cfg.ledger_sheet,
                currency: settings.currency(),
                unbilled_only: *unbilled,
            },
        )?;

        if exported > 0 {
            let pool = DbPool::open(Path::new(&cfg.database))?;
            audit(&pool.conn, "export", file, &format!("{exported} rows as {}", format.as_str()));
        }
    }
    Ok(())
}
