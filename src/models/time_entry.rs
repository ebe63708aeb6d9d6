use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// A time entry as fetched from the tracking API, already decoded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeEntry {
    pub id: u64,
    pub spent_on: NaiveDate,
    pub project: String,
    pub comment: String,
    pub work_package_title: String,
    pub hours: f64,
    pub user_name: String,
    pub created_at: DateTime<Utc>,
}

impl TimeEntry {
    /// Ledger notes: `"<work package title> - <comment>"`, trimmed the way
    /// ledger cells are read back.
    pub fn notes(&self) -> String {
        format!("{} - {}", self.work_package_title.trim(), self.comment.trim())
            .trim()
            .to_string()
    }
}
