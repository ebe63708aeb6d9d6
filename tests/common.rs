#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const LEDGER_HEADER: &str =
    "Date,Project,Hours,Company Sponsor,Invoiced,Rate,Amount,Invoice Number,Notes,Time Entry ID";

pub fn bsync() -> Command {
    cargo_bin_cmd!("billsync")
}

/// Scratch workspace: audit DB and workbook directory under one temp dir.
pub struct Env {
    pub dir: TempDir,
    pub db: String,
    pub workbook: String,
}

impl Env {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let db = dir.path().join("audit.sqlite").to_string_lossy().to_string();
        let workbook = dir.path().join("workbook").to_string_lossy().to_string();
        Self { dir, db, workbook }
    }

    /// `billsync --db <db> --workbook <wb> --test <args...>`
    pub fn cmd(&self, args: &[&str]) -> Command {
        let mut c = bsync();
        c.args(["--db", &self.db, "--workbook", &self.workbook, "--test"]);
        c.args(args);
        c
    }

    pub fn init(&self) {
        self.cmd(&["init"]).assert().success();
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn sheet_path(&self, sheet: &str) -> PathBuf {
        Path::new(&self.workbook).join(format!("{sheet}.csv"))
    }

    pub fn write_ledger(&self, rows: &[&str]) {
        let mut body = String::from(LEDGER_HEADER);
        body.push('\n');
        for r in rows {
            body.push_str(r);
            body.push('\n');
        }
        fs::write(self.sheet_path("Billable Hours"), body).expect("write ledger");
    }

    pub fn read_ledger(&self) -> String {
        fs::read_to_string(self.sheet_path("Billable Hours")).expect("read ledger")
    }

    /// Settings sheet pointing the template at the one `init` wrote and the
    /// invoices at `<tmp>/invoices`.
    pub fn write_settings(&self, extra: &[(&str, &str)]) {
        let template = Path::new(&self.workbook).join("invoice_template.md");
        let folder = self.path("invoices");
        let mut pairs: Vec<(String, String)> = vec![
            ("companyName".into(), "ACME Ltd".into()),
            ("companyAddress".into(), "1 Main Road".into()),
            ("companyId".into(), "ACME".into()),
            ("rate".into(), "50".into()),
            ("apiBaseUrl".into(), "http://127.0.0.1:1".into()),
            ("apiKey".into(), "secret".into()),
            ("companyProjectString".into(), "acme".into()),
            ("invoiceTemplate".into(), template.to_string_lossy().to_string()),
            ("invoiceFolder".into(), folder.to_string_lossy().to_string()),
        ];
        for (k, v) in extra {
            pairs.retain(|(pk, _)| pk != k);
            pairs.push((k.to_string(), v.to_string()));
        }

        let mut wtr = csv::Writer::from_path(self.sheet_path("Settings")).expect("settings");
        for (k, v) in pairs {
            wtr.write_record([k, v]).expect("record");
        }
        wtr.flush().expect("flush");
    }
}
