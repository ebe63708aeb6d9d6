// src/export/logic.rs

use crate::errors::{AppError, AppResult};
use crate::export::ExportFormat;
use crate::export::LedgerExport;
use crate::export::fs_utils::ensure_writable;
use crate::export::json::export_json;
use crate::export::pdf_export::export_pdf;
use crate::export::xlsx::export_xlsx;
use crate::models::LedgerRow;
use crate::ui::messages::warning;
use std::path::Path;

pub struct ExportRequest<'a> {
    pub format: ExportFormat,
    pub file: &'a str,
    pub force: bool,
    pub sheet_name: &'a str,
    pub currency: &'a str,
    pub unbilled_only: bool,
}

pub struct ExportLogic;

impl ExportLogic {
    /// Export the ledger rows. `file` must be an absolute path; an existing
    /// file is only replaced with `force` or after confirmation. Returns the
    /// number of rows written.
    pub fn export(rows: &[LedgerRow], req: &ExportRequest) -> AppResult<usize> {
        let path = Path::new(req.file);

        if !path.is_absolute() {
            return Err(AppError::Export(format!(
                "Output file path must be absolute: {}",
                req.file
            )));
        }

        let selected: Vec<LedgerExport> = rows
            .iter()
            .filter(|r| !req.unbilled_only || r.entry.is_eligible())
            .map(LedgerExport::from)
            .collect();

        if selected.is_empty() {
            warning("No ledger rows to export.");
            return Ok(0);
        }

        ensure_writable(path, req.force)?;

        match req.format {
            ExportFormat::Json => export_json(&selected, path)?,
            ExportFormat::Xlsx => export_xlsx(&selected, path, req.sheet_name, req.currency)?,
            ExportFormat::Pdf => {
                let title = if req.unbilled_only {
                    format!("{} (unbilled)", req.sheet_name)
                } else {
                    req.sheet_name.to_string()
                };
                export_pdf(&selected, path, &title, req.currency)?
            }
        }

        Ok(selected.len())
    }
}
