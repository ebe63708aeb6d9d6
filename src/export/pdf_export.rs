// src/export/pdf_export.rs

use crate::errors::{AppError, AppResult};
use crate::export::model::{HEADERS, to_cells};
use crate::export::pdf::PdfManager;
use crate::export::{LedgerExport, notify_export_success};
use crate::ui::messages::info;
use std::path::Path;

pub(crate) fn export_pdf(rows: &[LedgerExport], path: &Path, title: &str, currency: &str) -> AppResult<()> {
    info(format!("Exporting to PDF: {}", path.display()));

    let table: Vec<Vec<String>> = rows.iter().map(|r| to_cells(r, currency)).collect();

    let mut pdf = PdfManager::new();
    pdf.write_table(title, &HEADERS, &table);

    pdf.save(path)
        .map_err(|e| AppError::Export(format!("PDF export error: {e}")))?;

    notify_export_success("PDF", path);
    Ok(())
}
