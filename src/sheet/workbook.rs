// src/sheet/workbook.rs

use super::{Row, Sheet};
use crate::errors::{AppError, AppResult};
use std::fs;
use std::path::{Path, PathBuf};

/// A directory of sheets, one `<name>.csv` file each.
#[derive(Debug, Clone)]
pub struct Workbook {
    dir: PathBuf,
}

impl Workbook {
    pub fn open(dir: impl Into<PathBuf>) -> AppResult<Self> {
        let dir = dir.into();
        if !dir.is_dir() {
            return Err(AppError::Config(format!(
                "workbook directory not found: {} (run `billsync init`)",
                dir.display()
            )));
        }
        Ok(Self { dir })
    }

    /// Create the directory if needed.
    pub fn create(dir: impl Into<PathBuf>) -> AppResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn sheet_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.csv"))
    }

    pub fn has_sheet(&self, name: &str) -> bool {
        self.sheet_path(name).is_file()
    }

    pub fn sheet(&self, name: &str) -> AppResult<Sheet> {
        let path = self.sheet_path(name);
        if !path.is_file() {
            return Err(AppError::Sheet(format!(
                "sheet '{}' not found ({})",
                name,
                path.display()
            )));
        }

        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&path)?;

        let mut rows: Vec<Row> = Vec::new();
        for record in rdr.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(Sheet::from_rows(name, rows))
    }

    /// Write the whole sheet: temp file first, then rename over the old one.
    pub fn save_sheet(&self, sheet: &Sheet) -> AppResult<()> {
        let path = self.sheet_path(sheet.name());
        let tmp = self.dir.join(format!(".{}.csv.tmp", sheet.name()));

        {
            let mut wtr = csv::WriterBuilder::new().flexible(true).from_path(&tmp)?;
            for row in sheet.data_range() {
                wtr.write_record(row)?;
            }
            wtr.flush()?;
        }

        fs::rename(&tmp, &path)?;
        Ok(())
    }
}
