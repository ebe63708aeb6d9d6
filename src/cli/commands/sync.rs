use crate::api::OpenProjectClient;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::reconcile::{InsertDefaults, MergePlan};
use crate::core::sync::{SyncLogic, SyncMode, SyncReport};
use crate::db::log::audit;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ledger::Ledger;
use crate::models::Settings;
use crate::sheet::Workbook;
use crate::ui::messages::{header, info, success};
use crate::utils::date::format_iso;
use crate::utils::formatting::{hours, truncate};
use crate::utils::table::Table;
use chrono::Utc;
use std::path::Path;

/// Handle the `sync` command ("sync time entries").
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Sync { full, dry_run } = cmd {
        let workbook = Workbook::open(&cfg.workbook)?;
        let settings = Settings::load(&workbook, &cfg.settings_sheet)?;
        let mut ledger = Ledger::load(&workbook, &cfg.ledger_sheet)?;

        let defaults = InsertDefaults {
            company_sponsor: settings.company_name()?.to_string(),
            rate: settings.rate()?,
        };
        let (mode, filter) = if *full {
            (SyncMode::Full, settings.project_filter()?)
        } else {
            (SyncMode::Incremental, "")
        };

        let client = OpenProjectClient::new(
            settings.api_base_url()?,
            &cfg.api_username,
            settings.api_key()?,
            cfg.effective_page_size() as usize,
        )?;

        info(match mode {
            SyncMode::Full => format!("Fetching every time entry of projects matching '{filter}'…"),
            SyncMode::Incremental => "Refreshing known time entries and fetching new ones…".to_string(),
        });

        let report = SyncLogic::run(
            &mut ledger,
            &client,
            &defaults,
            mode,
            filter,
            Utc::now(),
            *dry_run,
        )?;

        if report.is_noop() {
            info(format!(
                "{} time entries fetched, ledger already up to date.",
                report.fetched
            ));
            return Ok(());
        }

        print_plan(&report.plan);

        if *dry_run {
            info("Dry run: nothing saved.");
            return Ok(());
        }

        ledger.save(&workbook)?;
        let summary = summarize(&report);
        success(format!("Ledger '{}' saved: {summary}.", cfg.ledger_sheet));

        let pool = DbPool::open(Path::new(&cfg.database))?;
        let op = if *full { "sync_full" } else { "sync" };
        audit(&pool.conn, op, &cfg.ledger_sheet, &summary);
    }

    Ok(())
}

fn summarize(report: &SyncReport) -> String {
    let (u, d, i) = match report.applied {
        Some(s) => (s.updated, s.deleted, s.inserted),
        None => (0, 0, 0),
    };
    format!("{u} updated, {d} deleted, {i} inserted")
}

fn print_plan(plan: &MergePlan) {
    header("Merge plan");

    let mut t = Table::with_headers(&["Action", "Row", "Date", "Hours", "Entry", "Notes"]);
    for u in &plan.to_update {
        t.add_row(vec![
            "update".into(),
            u.row.to_string(),
            format_iso(u.date),
            hours(u.hours),
            u.time_entry_id.to_string(),
            truncate(&u.notes, 50),
        ]);
    }
    for row in &plan.to_delete {
        t.add_row(vec![
            "delete".into(),
            row.to_string(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
        ]);
    }
    for e in &plan.to_insert {
        t.add_row(vec![
            "insert".into(),
            "new".into(),
            e.date.map(format_iso).unwrap_or_default(),
            hours(e.hours),
            e.time_entry_id.map(|id| id.to_string()).unwrap_or_default(),
            truncate(&e.notes, 50),
        ]);
    }

    print!("{}", t.render());
    println!(
        "\n{} to update, {} to delete, {} to insert",
        plan.to_update.len(),
        plan.to_delete.len(),
        plan.to_insert.len()
    );
}
