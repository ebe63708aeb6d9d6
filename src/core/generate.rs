//! "Generate invoices": draft, render, write documents, mark rows invoiced.

use crate::core::invoice::{self, InvoiceDraft};
use crate::document::Document;
use crate::errors::{AppError, AppResult};
use crate::export::PdfManager;
use crate::ledger::Ledger;
use crate::models::Settings;
use crate::models::ledger_row::hyperlink_formula;
use crate::utils::path::{file_url, unique_file};
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

#[derive(Debug)]
pub enum InvoiceOutcome {
    /// No eligible rows.
    NothingToBill,
    /// Dry run: the template was validated, nothing written.
    Drafted(InvoiceDraft),
    Generated {
        draft: InvoiceDraft,
        markdown: PathBuf,
        pdf: PathBuf,
    },
}

pub struct InvoiceLogic;

impl InvoiceLogic {
    /// Everything that can fail on configuration is checked before the
    /// ledger is touched; the caller saves the ledger afterwards.
    pub fn generate(
        ledger: &mut Ledger,
        settings: &Settings,
        today: NaiveDate,
        dry_run: bool,
    ) -> AppResult<InvoiceOutcome> {
        let rows = ledger.rows()?;
        if invoice::select_eligible(&rows).is_empty() {
            return Ok(InvoiceOutcome::NothingToBill);
        }

        let Some(draft) = invoice::draft(&rows, settings.company_id()?, today)? else {
            return Ok(InvoiceOutcome::NothingToBill);
        };

        let mut doc = Document::open(&settings.invoice_template()?)?;
        invoice::validate_template(&doc)?;
        settings.company_name()?;
        settings.company_address()?;

        if dry_run {
            return Ok(InvoiceOutcome::Drafted(draft));
        }

        let folder = settings.invoice_folder()?;
        fs::create_dir_all(&folder)?;

        invoice::render(&mut doc, &draft, settings)?;

        let stem = format!("Invoice {}", draft.number);
        let pdf = unique_file(&folder, &stem, "pdf");
        let markdown = pdf.with_extension("md");
        doc.save(&markdown)?;

        let mut manager = PdfManager::new();
        manager.write_document(&doc);
        manager
            .save(&pdf)
            .map_err(|e| AppError::Export(format!("cannot write {}: {e}", pdf.display())))?;

        let formula = hyperlink_formula(&file_url(&pdf)?, &draft.number);
        for line in &draft.lines {
            ledger.mark_invoiced(line.row, &formula)?;
        }

        Ok(InvoiceOutcome::Generated {
            draft,
            markdown,
            pdf,
        })
    }
}
