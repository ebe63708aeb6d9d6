use crate::document::{Block, Document};
use pdf_writer::{Content, Name, Pdf, Rect, Ref, Str};
use std::fs::File;
use std::io::Write;
use std::path::Path;

const FONT: Name<'static> = Name(b"F1");

/// Minimal A4 PDF writer: one Helvetica font, text lines and bordered tables.
pub struct PdfManager {
    pdf: Pdf,
    catalog_id: Ref,
    pages_id: Ref,
    page_refs: Vec<Ref>,
    next_id: i32,
    font_id: Ref,

    content: Content,
    content_id: Option<Ref>,
    y: f32,

    page_w: f32,
    page_h: f32,
    margin: f32,
    row_h: f32,
    line_h: f32,
    font_size: f32,
    title_font_size: f32,
}

impl Default for PdfManager {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfManager {
    pub fn new() -> Self {
        let mut pdf = Pdf::new();

        let catalog_id = Ref::new(1);
        let pages_id = Ref::new(2);
        let font_id = Ref::new(3);

        pdf.type1_font(font_id)
            .base_font(Name(b"Helvetica"))
            .encoding_predefined(Name(b"WinAnsiEncoding"));

        Self {
            pdf,
            catalog_id,
            pages_id,
            page_refs: Vec::new(),
            next_id: 4,
            font_id,

            content: Content::new(),
            content_id: None,
            y: 0.0,

            page_w: 595.0,
            page_h: 842.0,
            margin: 50.0,
            row_h: 20.0,
            line_h: 14.0,
            font_size: 10.0,
            title_font_size: 14.0,
        }
    }

    fn fresh_ref(&mut self) -> Ref {
        let id = self.next_id;
        self.next_id += 1;
        Ref::new(id)
    }

    fn start_page(&mut self) {
        self.finish_page();

        let page_id = self.fresh_ref();
        let content_id = self.fresh_ref();
        self.page_refs.push(page_id);

        {
            let mut page = self.pdf.page(page_id);
            page.parent(self.pages_id)
                .media_box(Rect::new(0.0, 0.0, self.page_w, self.page_h))
                .contents(content_id);
            page.resources().fonts().pair(FONT, self.font_id);
        }

        self.content_id = Some(content_id);
        self.y = self.page_h - self.margin;
    }

    fn finish_page(&mut self) {
        if let Some(id) = self.content_id.take() {
            let content = std::mem::replace(&mut self.content, Content::new());
            self.pdf.stream(id, &content.finish());
        }
    }

    /// Make room for `h` points, breaking the page when needed.
    fn reserve(&mut self, h: f32) {
        if self.content_id.is_none() || self.y - h < self.margin {
            self.start_page();
        }
        self.y -= h;
    }

    fn content(&mut self) -> &mut Content {
        if self.content_id.is_none() {
            self.start_page();
        }
        &mut self.content
    }

    fn draw_text(&mut self, x: f32, y: f32, size: f32, text: &str) {
        let bytes = win_ansi(text);
        let c = self.content();
        c.begin_text();
        c.set_font(FONT, size);
        c.set_text_matrix([1.0, 0.0, 0.0, 1.0, x, y]);
        c.show(Str(&bytes));
        c.end_text();
    }

    pub fn write_line(&mut self, text: &str, size: f32) {
        self.reserve(self.line_h.max(size + 4.0));
        let (x, y) = (self.margin, self.y);
        self.draw_text(x, y, size, text);
    }

    fn draw_row(&mut self, widths: &[f32], row: &[String], shade: Option<f32>) {
        self.reserve(self.row_h);
        let (y, row_h, size) = (self.y, self.row_h, self.font_size);
        let total: f32 = widths.iter().sum();

        if let Some(gray) = shade {
            let (margin, c) = (self.margin, self.content());
            c.save_state();
            c.set_fill_rgb(gray, gray, gray);
            c.rect(margin, y, total, row_h);
            c.fill_nonzero();
            c.restore_state();
        }

        let mut x = self.margin;
        for (i, w) in widths.iter().enumerate() {
            let text = row.get(i).map(String::as_str).unwrap_or("");
            self.draw_text(x + 4.0, y + 6.0, size, text);
            let c = self.content();
            c.save_state();
            c.set_stroke_rgb(0.65, 0.65, 0.65);
            c.rect(x, y, *w, row_h);
            c.stroke();
            c.restore_state();
            x += w;
        }
    }

    /// Column widths from content length, scaled down to the printable width.
    fn col_widths(&self, rows: &[Vec<String>]) -> Vec<f32> {
        let cols = rows.iter().map(Vec::len).max().unwrap_or(0);
        let mut widths = vec![30.0_f32; cols];
        for row in rows {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.chars().count() as f32 * 5.6 + 8.0);
            }
        }

        let total: f32 = widths.iter().sum();
        let max = self.page_w - 2.0 * self.margin;
        if total > max {
            let scale = max / total;
            widths.iter_mut().for_each(|w| *w *= scale);
        }
        widths
    }

    /// Table with a shaded header row, repeated after each page break.
    pub fn write_table(&mut self, title: &str, headers: &[&str], rows: &[Vec<String>]) {
        let header_row: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
        let mut all = vec![header_row.clone()];
        all.extend(rows.iter().cloned());
        let widths = self.col_widths(&all);

        self.write_line(title, self.title_font_size);
        self.reserve(self.line_h / 2.0);
        self.draw_row(&widths, &header_row, Some(0.85));

        for (i, row) in rows.iter().enumerate() {
            if self.y - self.row_h < self.margin {
                self.start_page();
                self.draw_row(&widths, &header_row, Some(0.85));
            }
            let shade = (i % 2 == 0).then_some(0.96);
            self.draw_row(&widths, row, shade);
        }
    }

    /// Lay out a rendered document: text lines as-is, tables as bordered grids.
    pub fn write_document(&mut self, doc: &Document) {
        for block in doc.blocks() {
            match block {
                Block::Text(line) => match line.strip_prefix("# ") {
                    Some(title) => self.write_line(title, self.title_font_size),
                    None => self.write_line(line, self.font_size),
                },
                Block::Table(table) => {
                    let widths = self.col_widths(table.rows());
                    for (i, row) in table.rows().iter().enumerate() {
                        let shade = (i == 0).then_some(0.85);
                        self.draw_row(&widths, row, shade);
                    }
                }
            }
        }
    }

    pub fn save(mut self, path: &Path) -> std::io::Result<()> {
        if self.page_refs.is_empty() {
            self.start_page();
        }
        self.finish_page();

        self.pdf.catalog(self.catalog_id).pages(self.pages_id);
        self.pdf
            .pages(self.pages_id)
            .count(self.page_refs.len() as i32)
            .kids(self.page_refs.iter().copied());

        let bytes = self.pdf.finish();
        let mut f = File::create(path)?;
        f.write_all(&bytes)?;
        Ok(())
    }
}

/// Encode for the WinAnsi font encoding; unmappable characters become `?`.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '€' => 0x80,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '–' => 0x96,
            '—' => 0x97,
            c if (c as u32) < 0x80 || (0xA0..=0xFF).contains(&(c as u32)) => c as u32 as u8,
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn euro_and_latin1_map_to_win_ansi() {
        assert_eq!(win_ansi("€5"), vec![0x80, b'5']);
        assert_eq!(win_ansi("é"), vec![0xE9]);
        assert_eq!(win_ansi("✅"), vec![b'?']);
    }

    #[test]
    fn writes_a_pdf_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.pdf");

        let mut pdf = PdfManager::new();
        let rows: Vec<Vec<String>> = (0..80)
            .map(|i| vec![i.to_string(), format!("row {i}")])
            .collect();
        pdf.write_table("Ledger", &["#", "Notes"], &rows);
        pdf.write_document(&Document::parse("# Invoice\n| Details |\n| a |\nTotal: €1.00\n"));
        pdf.save(&path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
        assert!(bytes.len() > 500);
    }
}
