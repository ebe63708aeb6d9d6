//! Reconciliation of fetched time entries against the ledger.
//!
//! [`reconcile`] only decides: it reads an immutable snapshot of the ledger
//! and the fetched entries and returns a [`MergePlan`]. [`MergePlan::apply`]
//! then performs the writes in an order that keeps every planned row index
//! valid.

use crate::errors::AppResult;
use crate::ledger::Ledger;
use crate::models::{LedgerEntry, LedgerRow, TimeEntry};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

const HOURS_EPSILON: f64 = 1e-9;

/// Replacement of the tracked fields of an existing row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowUpdate {
    pub row: usize,
    pub time_entry_id: u64,
    pub date: NaiveDate,
    pub hours: f64,
    pub notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MergePlan {
    /// In ledger order.
    pub to_update: Vec<RowUpdate>,
    /// Row indices in ledger order; never contains a protected row.
    pub to_delete: Vec<usize>,
    /// In fetch order.
    pub to_insert: Vec<LedgerEntry>,
}

/// Values stamped on rows created from new entries.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertDefaults {
    pub company_sponsor: String,
    pub rate: f64,
}

/// Counters reported after a plan has been applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplySummary {
    pub updated: usize,
    pub deleted: usize,
    pub inserted: usize,
}

impl MergePlan {
    pub fn is_empty(&self) -> bool {
        self.to_update.is_empty() && self.to_delete.is_empty() && self.to_insert.is_empty()
    }

    /// Write the plan into the ledger.
    ///
    /// Updates go first, addressed by the indices read before any mutation;
    /// deletes follow from the highest index down so that no pending index
    /// shifts; inserts are appended last.
    pub fn apply(&self, ledger: &mut Ledger) -> AppResult<ApplySummary> {
        for u in &self.to_update {
            ledger.update_tracked_fields(u.row, u.date, u.hours, &u.notes)?;
        }

        let mut deletes = self.to_delete.clone();
        deletes.sort_unstable_by(|a, b| b.cmp(a));
        deletes.dedup();
        for row in &deletes {
            ledger.delete(*row)?;
        }

        for entry in &self.to_insert {
            ledger.append(entry)?;
        }

        Ok(ApplySummary {
            updated: self.to_update.len(),
            deleted: deletes.len(),
            inserted: self.to_insert.len(),
        })
    }
}

/// Compute the merge plan for one sync pass.
///
/// Matching is by time entry id only. Per ledger row:
/// - id fetched: the first row claiming it consumes it and is updated when
///   its date, hours or notes differ (protected rows are never rewritten);
/// - id not fetched (or already consumed by an earlier duplicate row):
///   deleted unless protected;
/// - no id: a manual row, left alone.
///
/// Fetched entries nobody consumed are inserted once each, in fetch order.
pub fn reconcile(
    rows: &[LedgerRow],
    fetched: &[TimeEntry],
    defaults: &InsertDefaults,
) -> MergePlan {
    let mut by_id: HashMap<u64, &TimeEntry> = HashMap::with_capacity(fetched.len());
    for entry in fetched {
        by_id.entry(entry.id).or_insert(entry);
    }

    let mut consumed: HashSet<u64> = HashSet::new();
    let mut plan = MergePlan::default();

    for row in rows {
        let Some(id) = row.entry.time_entry_id else {
            continue;
        };

        match by_id.get(&id) {
            Some(remote) if consumed.insert(id) => {
                if !row.entry.is_protected() && differs(&row.entry, remote) {
                    plan.to_update.push(RowUpdate {
                        row: row.index,
                        time_entry_id: id,
                        date: remote.spent_on,
                        hours: remote.hours,
                        notes: remote.notes(),
                    });
                }
            }
            _ => {
                if !row.entry.is_protected() {
                    plan.to_delete.push(row.index);
                }
            }
        }
    }

    for entry in fetched {
        if consumed.insert(entry.id) {
            plan.to_insert.push(new_row(entry, defaults));
        }
    }

    plan
}

fn differs(local: &LedgerEntry, remote: &TimeEntry) -> bool {
    local.date != Some(remote.spent_on)
        || (local.hours - remote.hours).abs() > HOURS_EPSILON
        || local.notes != remote.notes()
}

fn new_row(entry: &TimeEntry, defaults: &InsertDefaults) -> LedgerEntry {
    LedgerEntry {
        date: Some(entry.spent_on),
        project: entry.project.clone(),
        hours: entry.hours,
        company_sponsor: defaults.company_sponsor.clone(),
        invoiced: false,
        rate: defaults.rate,
        invoice_number: String::new(),
        notes: entry.notes(),
        time_entry_id: Some(entry.id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn ymd(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn remote(id: u64, day: u32, hours: f64) -> TimeEntry {
        TimeEntry {
            id,
            spent_on: ymd(day),
            project: "Site".into(),
            comment: format!("comment {id}"),
            work_package_title: "Build".into(),
            hours,
            user_name: "dev".into(),
            created_at: Utc.with_ymd_and_hms(2024, 1, day, 12, 0, 0).unwrap(),
        }
    }

    fn local(index: usize, id: Option<u64>, invoice_number: &str) -> LedgerRow {
        LedgerRow {
            index,
            entry: LedgerEntry {
                date: Some(ymd(1)),
                project: "Site".into(),
                hours: 1.0,
                company_sponsor: "ACME".into(),
                invoiced: !invoice_number.is_empty(),
                rate: 50.0,
                invoice_number: invoice_number.into(),
                notes: "old".into(),
                time_entry_id: id,
            },
        }
    }

    fn in_sync(index: usize, e: &TimeEntry) -> LedgerRow {
        let mut row = local(index, Some(e.id), "");
        row.entry.date = Some(e.spent_on);
        row.entry.hours = e.hours;
        row.entry.notes = e.notes();
        row
    }

    fn defaults() -> InsertDefaults {
        InsertDefaults {
            company_sponsor: "ACME Ltd".into(),
            rate: 45.0,
        }
    }

    #[test]
    fn matched_rows_are_updated_with_remote_fields() {
        let rows = vec![local(2, Some(7), "")];
        let plan = reconcile(&rows, &[remote(7, 3, 2.5)], &defaults());

        assert_eq!(plan.to_update.len(), 1);
        let u = &plan.to_update[0];
        assert_eq!(u.row, 2);
        assert_eq!(u.date, ymd(3));
        assert_eq!(u.hours, 2.5);
        assert_eq!(u.notes, "Build - comment 7");
        assert!(plan.to_delete.is_empty());
        assert!(plan.to_insert.is_empty());
    }

    #[test]
    fn unchanged_rows_produce_no_update() {
        let e = remote(7, 3, 2.5);
        let plan = reconcile(&[in_sync(2, &e)], &[e], &defaults());
        assert!(plan.is_empty());
    }

    #[test]
    fn vanished_unprotected_rows_are_deleted() {
        let rows = vec![local(2, Some(1), ""), local(3, Some(2), ""), local(4, Some(3), "")];
        let plan = reconcile(&rows, &[remote(2, 1, 1.0)], &defaults());
        assert_eq!(plan.to_delete, vec![2, 4]);
    }

    #[test]
    fn protected_rows_are_never_deleted() {
        let rows = vec![local(2, Some(5), "ABC123")];
        let plan = reconcile(&rows, &[], &defaults());
        assert!(plan.to_delete.is_empty());
        assert!(plan.is_empty());
    }

    #[test]
    fn protected_rows_are_never_overwritten() {
        let rows = vec![local(2, Some(5), "ABC123")];
        let plan = reconcile(&rows, &[remote(5, 9, 8.0)], &defaults());
        assert!(plan.is_empty(), "{plan:?}");
    }

    #[test]
    fn protected_invariant_holds_for_any_fetch() {
        let rows: Vec<LedgerRow> = (0..6)
            .map(|i| local(i + 2, Some(i as u64), if i % 2 == 0 { "INV" } else { "" }))
            .collect();
        let protected: Vec<usize> = rows
            .iter()
            .filter(|r| r.entry.is_protected())
            .map(|r| r.index)
            .collect();

        for mask in 0u32..64 {
            let fetched: Vec<TimeEntry> = (0..6u64)
                .filter(|i| mask & (1 << i) != 0)
                .map(|i| remote(i, 2, 3.0))
                .collect();
            let plan = reconcile(&rows, &fetched, &defaults());
            for idx in &protected {
                assert!(!plan.to_delete.contains(idx), "mask {mask}");
                assert!(plan.to_update.iter().all(|u| u.row != *idx), "mask {mask}");
            }
        }
    }

    #[test]
    fn new_entries_are_inserted_with_defaults() {
        let plan = reconcile(&[], &[remote(42, 4, 3.0)], &defaults());

        assert_eq!(plan.to_insert.len(), 1);
        let row = &plan.to_insert[0];
        assert_eq!(row.time_entry_id, Some(42));
        assert_eq!(row.date, Some(ymd(4)));
        assert_eq!(row.company_sponsor, "ACME Ltd");
        assert_eq!(row.rate, 45.0);
        assert_eq!(row.amount(), 3.0 * 45.0);
        assert!(!row.invoiced);
        assert!(row.invoice_number.is_empty());
        assert_eq!(row.notes, "Build - comment 42");
    }

    #[test]
    fn inserts_follow_fetch_order_and_skip_repeats() {
        let fetched = vec![remote(9, 1, 1.0), remote(3, 1, 1.0), remote(9, 2, 5.0), remote(5, 1, 1.0)];
        let plan = reconcile(&[local(2, Some(3), "")], &fetched, &defaults());

        let ids: Vec<Option<u64>> = plan.to_insert.iter().map(|r| r.time_entry_id).collect();
        assert_eq!(ids, vec![Some(9), Some(5)]);
        assert_eq!(plan.to_insert[0].hours, 1.0);
    }

    #[test]
    fn duplicate_local_ids_only_first_is_matched() {
        let rows = vec![local(2, Some(7), ""), local(3, Some(7), ""), local(4, Some(7), "INV1")];
        let plan = reconcile(&rows, &[remote(7, 3, 2.0)], &defaults());

        assert_eq!(plan.to_update.len(), 1);
        assert_eq!(plan.to_update[0].row, 2);
        assert_eq!(plan.to_delete, vec![3]);
        assert!(plan.to_insert.is_empty());
    }

    #[test]
    fn manual_rows_without_id_are_left_alone() {
        let plan = reconcile(&[local(2, None, "")], &[], &defaults());
        assert!(plan.is_empty());
    }

    #[test]
    fn updates_and_deletes_keep_ledger_order() {
        let rows = vec![
            local(2, Some(1), ""),
            local(3, Some(2), ""),
            local(4, Some(3), ""),
            local(5, Some(4), ""),
        ];
        let fetched = vec![remote(4, 2, 2.0), remote(2, 2, 2.0)];
        let plan = reconcile(&rows, &fetched, &defaults());

        let updated: Vec<usize> = plan.to_update.iter().map(|u| u.row).collect();
        assert_eq!(updated, vec![3, 5]);
        assert_eq!(plan.to_delete, vec![2, 4]);
    }

    fn ledger_from(rows: &[LedgerRow]) -> Ledger {
        let mut ledger = Ledger::from_sheet(Ledger::empty_sheet("Billable Hours")).unwrap();
        for r in rows {
            ledger.append(&r.entry).unwrap();
        }
        ledger
    }

    #[test]
    fn apply_then_reconcile_again_is_a_no_op() {
        let e1 = remote(1, 2, 1.5);
        let e3 = remote(3, 4, 2.0);
        let rows = vec![
            local(2, Some(1), ""),
            local(3, Some(2), ""),
            local(4, Some(9), "INV9"),
            local(5, None, ""),
        ];
        let mut ledger = ledger_from(&rows);
        let fetched = vec![e1, e3];

        let first = reconcile(&ledger.rows().unwrap(), &fetched, &defaults());
        assert!(!first.is_empty());
        let summary = first.apply(&mut ledger).unwrap();
        assert_eq!(
            summary,
            ApplySummary {
                updated: 1,
                deleted: 1,
                inserted: 1
            }
        );

        let second = reconcile(&ledger.rows().unwrap(), &fetched, &defaults());
        assert!(second.is_empty(), "{second:?}");
    }

    #[test]
    fn blank_comments_survive_a_round_trip_through_the_ledger() {
        let mut bare = remote(1, 2, 1.0);
        bare.comment = String::new();
        let mut padded = remote(2, 3, 2.0);
        padded.comment = "  review ".into();
        let fetched = vec![bare, padded];
        let mut ledger = ledger_from(&[]);

        let first = reconcile(&ledger.rows().unwrap(), &fetched, &defaults());
        assert_eq!(first.to_insert.len(), 2);
        first.apply(&mut ledger).unwrap();

        let second = reconcile(&ledger.rows().unwrap(), &fetched, &defaults());
        assert!(second.is_empty(), "{second:?}");
    }

    #[test]
    fn apply_writes_updates_to_the_planned_rows() {
        // row 2 is deleted, row 4 is updated: the update must land on the
        // entry that was on row 4 before the delete shifted it up.
        let rows = vec![local(2, Some(1), ""), local(3, Some(2), "INV"), local(4, Some(3), "")];
        let mut ledger = ledger_from(&rows);
        let plan = reconcile(&ledger.rows().unwrap(), &[remote(3, 7, 4.0)], &defaults());
        assert_eq!(plan.to_delete, vec![2]);
        assert_eq!(plan.to_update[0].row, 4);

        plan.apply(&mut ledger).unwrap();

        let after = ledger.rows().unwrap();
        assert_eq!(after.len(), 2);
        assert_eq!(after[0].entry.time_entry_id, Some(2));
        assert_eq!(after[0].entry.notes, "old");
        assert_eq!(after[1].entry.time_entry_id, Some(3));
        assert_eq!(after[1].entry.date, Some(ymd(7)));
        assert_eq!(after[1].entry.hours, 4.0);
    }

    #[test]
    fn apply_deletes_from_the_bottom_up() {
        let rows: Vec<LedgerRow> = (1..=5).map(|i| local(i as usize + 1, Some(i), "")).collect();
        let mut ledger = ledger_from(&rows);
        let plan = reconcile(&ledger.rows().unwrap(), &[remote(3, 1, 1.0)], &defaults());
        assert_eq!(plan.to_delete, vec![2, 3, 5, 6]);

        plan.apply(&mut ledger).unwrap();
        let ids: Vec<Option<u64>> = ledger
            .rows()
            .unwrap()
            .iter()
            .map(|r| r.entry.time_entry_id)
            .collect();
        assert_eq!(ids, vec![Some(3)]);
    }
}
