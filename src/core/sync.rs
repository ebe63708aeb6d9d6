//! Time-entry sync: collect the remote view, reconcile, apply.

use crate::api::TimeEntrySource;
use crate::core::reconcile::{ApplySummary, InsertDefaults, MergePlan, reconcile};
use crate::errors::AppResult;
use crate::ledger::Ledger;
use crate::models::{LedgerRow, TimeEntry};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    /// Re-fetch known ids, then everything created after the newest of them.
    Incremental,
    /// Walk projects -> work packages -> time entries.
    Full,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SyncReport {
    pub fetched: usize,
    pub plan: MergePlan,
    /// `None` for a dry run.
    pub applied: Option<ApplySummary>,
}

impl SyncReport {
    pub fn is_noop(&self) -> bool {
        self.plan.is_empty()
    }
}

pub struct SyncLogic;

impl SyncLogic {
    /// The remote entries the ledger is compared against, deduplicated by id.
    pub fn collect(
        source: &dyn TimeEntrySource,
        rows: &[LedgerRow],
        mode: SyncMode,
        project_filter: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<TimeEntry>> {
        let entries = match mode {
            SyncMode::Full => source.project_time_entries(project_filter)?,
            SyncMode::Incremental => {
                let mut seen = HashSet::new();
                let mut known = Vec::new();
                for id in rows.iter().filter_map(|r| r.entry.time_entry_id) {
                    if !seen.insert(id) {
                        continue;
                    }
                    if let Some(entry) = source.time_entry(id)? {
                        known.push(entry);
                    }
                }

                let start = window_start(&known);
                let mut fresh = source.time_entries_created_between(start, now)?;
                known.append(&mut fresh);
                known
            }
        };

        Ok(dedupe(entries))
    }

    /// Collect, reconcile and (unless `dry_run`) apply to the in-memory ledger.
    pub fn run(
        ledger: &mut Ledger,
        source: &dyn TimeEntrySource,
        defaults: &InsertDefaults,
        mode: SyncMode,
        project_filter: &str,
        now: DateTime<Utc>,
        dry_run: bool,
    ) -> AppResult<SyncReport> {
        let rows = ledger.rows()?;
        let fetched = Self::collect(source, &rows, mode, project_filter, now)?;
        let plan = reconcile(&rows, &fetched, defaults);

        let applied = if dry_run || plan.is_empty() {
            None
        } else {
            Some(plan.apply(ledger)?)
        };

        Ok(SyncReport {
            fetched: fetched.len(),
            plan,
            applied,
        })
    }
}

/// One second after the newest known entry, or the epoch when none resolved.
pub fn window_start(known: &[TimeEntry]) -> DateTime<Utc> {
    known
        .iter()
        .map(|e| e.created_at)
        .max()
        .map(|newest| newest + Duration::seconds(1))
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

fn dedupe(entries: Vec<TimeEntry>) -> Vec<TimeEntry> {
    let mut seen = HashSet::new();
    entries.into_iter().filter(|e| seen.insert(e.id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::Sheet;
    use chrono::{NaiveDate, TimeZone};
    use std::cell::RefCell;

    struct FakeSource {
        entries: Vec<TimeEntry>,
        windows: RefCell<Vec<(DateTime<Utc>, DateTime<Utc>)>>,
    }

    impl FakeSource {
        fn new(entries: Vec<TimeEntry>) -> Self {
            Self {
                entries,
                windows: RefCell::new(Vec::new()),
            }
        }
    }

    impl TimeEntrySource for FakeSource {
        fn time_entry(&self, id: u64) -> AppResult<Option<TimeEntry>> {
            Ok(self.entries.iter().find(|e| e.id == id).cloned())
        }

        fn time_entries_created_between(
            &self,
            start: DateTime<Utc>,
            end: DateTime<Utc>,
        ) -> AppResult<Vec<TimeEntry>> {
            self.windows.borrow_mut().push((start, end));
            Ok(self
                .entries
                .iter()
                .filter(|e| e.created_at >= start && e.created_at <= end)
                .cloned()
                .collect())
        }

        fn project_time_entries(&self, _pattern: &str) -> AppResult<Vec<TimeEntry>> {
            Ok(self.entries.clone())
        }
    }

    fn entry(id: u64, day: u32, hours: f64) -> TimeEntry {
        TimeEntry {
            id,
            spent_on: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            project: "Site".into(),
            comment: format!("c{id}"),
            work_package_title: "Build".into(),
            hours,
            user_name: "dev".into(),
            created_at: Utc.with_ymd_and_hms(2024, 1, day, 9, 0, 0).unwrap(),
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap()
    }

    fn defaults() -> InsertDefaults {
        InsertDefaults {
            company_sponsor: "ACME".into(),
            rate: 50.0,
        }
    }

    const HEADER: &[&str] = &[
        "Date", "Project", "Hours", "Company Sponsor", "Invoiced", "Rate", "Amount",
        "Invoice Number", "Notes", "Time Entry ID",
    ];

    fn ledger(rows: &[&[&str]]) -> Ledger {
        let mut all = vec![HEADER.iter().map(|c| c.to_string()).collect::<Vec<_>>()];
        all.extend(rows.iter().map(|r| r.iter().map(|c| c.to_string()).collect()));
        Ledger::from_sheet(Sheet::from_rows("Billable Hours", all)).unwrap()
    }

    fn ids(l: &Ledger) -> Vec<Option<u64>> {
        l.rows().unwrap().iter().map(|r| r.entry.time_entry_id).collect()
    }

    #[test]
    fn window_starts_after_newest_known_entry() {
        let known = vec![entry(1, 3, 1.0), entry(2, 5, 1.0)];
        assert_eq!(
            window_start(&known),
            Utc.with_ymd_and_hms(2024, 1, 5, 9, 0, 1).unwrap()
        );
        assert_eq!(window_start(&[]), DateTime::<Utc>::UNIX_EPOCH);
    }

    #[test]
    fn incremental_refetches_known_ids_and_pulls_new_ones() {
        let src = FakeSource::new(vec![entry(1, 2, 2.0), entry(2, 3, 1.0), entry(3, 4, 3.0)]);
        let mut l = ledger(&[&["2024-01-02", "Site", "2", "ACME", "FALSE", "50", "100", "", "Build - c1", "1"]]);

        let report = SyncLogic::run(&mut l, &src, &defaults(), SyncMode::Incremental, "", now(), false)
            .unwrap();

        assert_eq!(report.fetched, 3);
        assert_eq!(report.applied.unwrap().inserted, 2);
        assert_eq!(ids(&l), vec![Some(1), Some(2), Some(3)]);
        assert_eq!(
            src.windows.borrow()[0].0,
            Utc.with_ymd_and_hms(2024, 1, 2, 9, 0, 1).unwrap()
        );
    }

    #[test]
    fn remotely_deleted_entries_leave_unless_invoiced() {
        let src = FakeSource::new(vec![entry(2, 3, 1.0)]);
        let mut l = ledger(&[
            &["2024-01-02", "Site", "2", "ACME", "FALSE", "50", "100", "", "Build - c1", "1"],
            &["2024-01-03", "Site", "1", "ACME", "FALSE", "50", "50", "", "Build - c2", "2"],
            &["2024-01-01", "Site", "4", "ACME", "TRUE", "50", "200", "=HYPERLINK(\"u\", \"ACME1\")", "x", "5"],
            &["2024-01-01", "Site", "1", "ACME", "FALSE", "50", "50", "", "manual", ""],
        ]);

        let report = SyncLogic::run(&mut l, &src, &defaults(), SyncMode::Incremental, "", now(), false)
            .unwrap();

        assert_eq!(report.plan.to_delete, vec![2]);
        assert_eq!(ids(&l), vec![Some(2), Some(5), None]);
    }

    #[test]
    fn second_run_is_a_noop() {
        let src = FakeSource::new(vec![entry(1, 2, 2.0), entry(2, 3, 1.5)]);
        let mut l = ledger(&[]);

        SyncLogic::run(&mut l, &src, &defaults(), SyncMode::Full, "acme", now(), false).unwrap();
        let again =
            SyncLogic::run(&mut l, &src, &defaults(), SyncMode::Incremental, "acme", now(), false)
                .unwrap();

        assert!(again.is_noop());
        assert!(again.applied.is_none());
        assert_eq!(ids(&l), vec![Some(1), Some(2)]);
    }

    #[test]
    fn dry_run_leaves_ledger_untouched() {
        let src = FakeSource::new(vec![entry(1, 2, 2.0)]);
        let mut l = ledger(&[]);

        let report =
            SyncLogic::run(&mut l, &src, &defaults(), SyncMode::Full, "", now(), true).unwrap();

        assert_eq!(report.plan.to_insert.len(), 1);
        assert!(report.applied.is_none());
        assert!(l.rows().unwrap().is_empty());
    }

    #[test]
    fn duplicate_ids_across_sources_are_merged() {
        let src = FakeSource::new(vec![entry(7, 2, 1.0)]);
        let rows = ledger(&[
            &["2024-01-02", "Site", "1", "ACME", "FALSE", "50", "50", "", "Build - c7", "7"],
            &["2024-01-02", "Site", "1", "ACME", "FALSE", "50", "50", "", "Build - c7", "7"],
        ])
        .rows()
        .unwrap();

        // window starts after the re-fetched entry, so 7 only comes back once
        let fetched =
            SyncLogic::collect(&src, &rows, SyncMode::Incremental, "", now()).unwrap();
        assert_eq!(fetched.len(), 1);
    }
}
