use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::utils::formatting::truncate;
use ansi_term::Colour;

/// Colour of an operation in the audit listing.
fn color_for_operation(op: &str) -> Colour {
    match op {
        "sync" => Colour::Green,
        "sync_full" => Colour::Cyan,
        "invoice" => Colour::Yellow,
        "export" => Colour::Blue,
        "init" => Colour::RGB(255, 153, 51),
        "migration_applied" => Colour::Purple,
        _ => Colour::White,
    }
}

pub struct LogEntry {
    pub id: i64,
    pub date: String,
    pub operation: String,
    pub target: String,
    pub message: String,
}

pub struct LogLogic;

impl LogLogic {
    pub fn entries(pool: &DbPool) -> AppResult<Vec<LogEntry>> {
        let mut stmt = pool.conn.prepare_cached(
            "SELECT id, date, operation, target, message FROM log ORDER BY id ASC",
        )?;

        let rows = stmt.query_map([], |row| {
            let raw_date: String = row.get(1)?;
            let date = chrono::DateTime::parse_from_rfc3339(&raw_date)
                .map(|dt| dt.format("%FT%T%:z").to_string())
                .unwrap_or(raw_date);

            Ok(LogEntry {
                id: row.get(0)?,
                date,
                operation: row.get(2)?,
                target: row.get(3)?,
                message: row.get(4)?,
            })
        })?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }

    pub fn print_log(pool: &DbPool) -> AppResult<()> {
        let entries = Self::entries(pool)?;
        if entries.is_empty() {
            println!("📜 Internal log is empty.");
            return Ok(());
        }

        // visible width of "op (target)", capped at 60
        let label = |e: &LogEntry| {
            if e.target.is_empty() {
                e.operation.clone()
            } else {
                truncate(&format!("{} ({})", e.operation, e.target), 60)
            }
        };
        let op_w = entries.iter().map(|e| label(e).chars().count()).max().unwrap_or(10);
        let id_w = entries.iter().map(|e| e.id.to_string().len()).max().unwrap_or(1);
        let date_w = entries.iter().map(|e| e.date.len()).max().unwrap_or(10);

        println!("📜 Internal log:\n");

        for e in &entries {
            let visible = label(e);
            let padding = " ".repeat(op_w.saturating_sub(visible.chars().count()));
            // only the operation word is coloured
            let colored = match visible.split_once(' ') {
                Some((op, rest)) => format!("{} {}", color_for_operation(&e.operation).paint(op), rest),
                None => color_for_operation(&e.operation).paint(visible.as_str()).to_string(),
            };

            println!(
                "{:>id_w$}: {:<date_w$} | {}{} => {}",
                e.id,
                e.date,
                colored,
                padding,
                e.message,
                id_w = id_w,
                date_w = date_w
            );
        }

        Ok(())
    }
}
