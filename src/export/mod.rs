// src/export/mod.rs

mod fs_utils;
mod json;
pub mod logic;
mod model;
pub mod pdf;
mod pdf_export;
mod xlsx;

pub use logic::{ExportLogic, ExportRequest};
pub use model::LedgerExport;
pub use pdf::PdfManager;

use crate::ui::messages::success;
use clap::ValueEnum;
use std::path::Path;

pub(crate) fn notify_export_success(label: &str, path: &Path) {
    success(format!("{label} export completed: {}", path.display()));
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Json,
    Xlsx,
    Pdf,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Pdf => "pdf",
        }
    }
}
