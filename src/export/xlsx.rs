// src/export/xlsx.rs

use crate::errors::{AppError, AppResult};
use crate::export::model::HEADERS;
use crate::export::{LedgerExport, notify_export_success};
use crate::models::ledger_row::hyperlink_formula;
use crate::ui::messages::info;
use chrono::Datelike;
use rust_xlsxwriter::{
    Color, ExcelDateTime, Format, FormatAlign, FormatBorder, FormatPattern, Formula, Workbook,
    Worksheet,
};
use std::path::Path;
use unicode_width::UnicodeWidthStr;

const COL_DATE: u16 = 0;
const COL_HOURS: u16 = 2;
const COL_INVOICED: u16 = 4;
const COL_RATE: u16 = 5;
const COL_AMOUNT: u16 = 6;
const COL_INVOICE: u16 = 7;

/// Ledger as a styled worksheet: checkbox Invoiced column, live Amount
/// formulas and clickable invoice numbers.
pub(crate) fn export_xlsx(rows: &[LedgerExport], path: &Path, sheet_name: &str, currency: &str) -> AppResult<()> {
    info(format!("Exporting to XLSX: {}", path.display()));

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name).map_err(to_export_error)?;

    let header_format = Format::new()
        .set_bold()
        .set_font_color(Color::RGB(0xFFFFFF))
        .set_background_color(Color::RGB(0x2F75B5))
        .set_pattern(FormatPattern::Solid)
        .set_border(FormatBorder::Thin);

    for (col, header) in HEADERS.iter().enumerate() {
        worksheet
            .write_with_format(0, col as u16, *header, &header_format)
            .map_err(to_export_error)?;
    }
    worksheet.set_freeze_panes(1, 0).map_err(to_export_error)?;

    let mut col_widths: Vec<usize> = HEADERS.iter().map(|h| UnicodeWidthStr::width(*h)).collect();
    let money_fmt = format!("\"{}\"#,##0.00", currency.replace('"', ""));
    let rate_fmt = format!("\"{}\"0.##", currency.replace('"', ""));

    for (i, r) in rows.iter().enumerate() {
        let row = (i + 1) as u32;
        let band = if i % 2 == 0 { Color::RGB(0xEAF3FB) } else { Color::RGB(0xFFFFFF) };
        let cell = || {
            Format::new()
                .set_background_color(band)
                .set_pattern(FormatPattern::Solid)
                .set_border(FormatBorder::Thin)
        };

        if let Some(d) = r.date.as_deref().and_then(crate::utils::date::parse_date) {
            let dt = ExcelDateTime::from_ymd(d.year() as u16, d.month() as u8, d.day() as u8)
                .map_err(to_export_error)?;
            worksheet
                .write_with_format(row, COL_DATE, &dt, &cell().set_num_format("yyyy-mm-dd"))
                .map_err(to_export_error)?;
        }

        write_text(worksheet, row, 1, &r.project, &cell())?;
        worksheet
            .write_with_format(row, COL_HOURS, r.hours, &cell().set_num_format("0.00"))
            .map_err(to_export_error)?;
        write_text(worksheet, row, 3, &r.company_sponsor, &cell())?;
        worksheet
            .insert_checkbox(row, COL_INVOICED, r.invoiced)
            .map_err(to_export_error)?;
        worksheet
            .write_with_format(row, COL_RATE, r.rate, &cell().set_num_format(&rate_fmt))
            .map_err(to_export_error)?;

        let amount = Formula::new(format!(
            "={}{}*{}{}",
            column_name(COL_HOURS),
            row + 1,
            column_name(COL_RATE),
            row + 1
        ))
        .set_result(r.amount.to_string());
        worksheet
            .write_formula_with_format(row, COL_AMOUNT, amount, &cell().set_num_format(&money_fmt))
            .map_err(to_export_error)?;

        match &r.invoice_link {
            Some(url) => {
                let link = Formula::new(hyperlink_formula(url, &r.invoice_number))
                    .set_result(r.invoice_number.clone());
                worksheet
                    .write_formula_with_format(
                        row,
                        COL_INVOICE,
                        link,
                        &cell().set_font_color(Color::RGB(0x0563C1)).set_underline(
                            rust_xlsxwriter::FormatUnderline::Single,
                        ),
                    )
                    .map_err(to_export_error)?;
            }
            None => write_text(worksheet, row, COL_INVOICE, &r.invoice_number, &cell())?,
        }

        write_text(worksheet, row, 8, &r.notes, &cell())?;
        match r.time_entry_id {
            Some(id) => {
                worksheet
                    .write_with_format(row, 9, id as f64, &cell().set_align(FormatAlign::Right))
                    .map_err(to_export_error)?;
            }
            None => write_text(worksheet, row, 9, "", &cell())?,
        }

        let widths = [
            10,
            r.project.width(),
            6,
            r.company_sponsor.width(),
            3,
            6,
            10,
            r.invoice_number.width(),
            r.notes.width(),
            6,
        ];
        for (c, w) in widths.iter().enumerate() {
            col_widths[c] = col_widths[c].max(*w);
        }
    }

    for (c, w) in col_widths.iter().enumerate() {
        worksheet
            .set_column_width(c as u16, (*w).min(60) as f64 + 2.0)
            .map_err(to_export_error)?;
    }

    workbook.save(path).map_err(to_export_error)?;

    notify_export_success("XLSX", path);
    Ok(())
}

fn write_text(ws: &mut Worksheet, row: u32, col: u16, s: &str, fmt: &Format) -> AppResult<()> {
    ws.write_with_format(row, col, s, fmt).map_err(to_export_error)?;
    Ok(())
}

/// Spreadsheet column letters for a 0-based index (`0` -> `A`, `27` -> `AB`).
fn column_name(col: u16) -> String {
    let mut n = col as u32 + 1;
    let mut out = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        out.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

fn to_export_error<E: std::fmt::Display>(e: E) -> AppError {
    AppError::Export(e.to_string())
}
