//! Plain-text document templates with placeholder tokens and pipe tables.
//!
//! A template is a sequence of blocks. Consecutive lines starting with `|`
//! form one table (one row per line, cells split on unescaped `|`, with
//! `\|` standing for a literal pipe inside a cell); markdown
//! separator lines such as `|---|---|` are skipped. Every other line is
//! text. Saving writes the same format back, with a separator after the
//! first row of each table so the result also reads as markdown.

use crate::errors::{AppError, AppResult};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Text(String),
    Table(Table),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn from_rows(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// All cell text, used to recognise a table by a marker word.
    pub fn text(&self) -> String {
        self.rows
            .iter()
            .map(|r| r.join(" "))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn append_row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }

    /// Remove a row by 0-based position.
    pub fn remove_row(&mut self, index: usize) -> AppResult<Vec<String>> {
        if index >= self.rows.len() {
            return Err(AppError::Template(format!(
                "table has no row {} (rows: {})",
                index,
                self.rows.len()
            )));
        }
        Ok(self.rows.remove(index))
    }

    fn replace_text(&mut self, token: &str, value: &str) -> usize {
        let mut n = 0;
        for cell in self.rows.iter_mut().flatten() {
            n += replace_in(cell, token, value);
        }
        n
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    blocks: Vec<Block>,
}

impl Document {
    pub fn parse(src: &str) -> Self {
        let mut blocks = Vec::new();
        let mut table: Option<Table> = None;

        for line in src.lines() {
            let trimmed = line.trim();
            if trimmed.starts_with('|') {
                if is_separator(trimmed) {
                    continue;
                }
                table
                    .get_or_insert_with(Table::default)
                    .append_row(split_cells(trimmed));
                continue;
            }

            if let Some(t) = table.take() {
                blocks.push(Block::Table(t));
            }
            blocks.push(Block::Text(line.to_string()));
        }

        if let Some(t) = table.take() {
            blocks.push(Block::Table(t));
        }

        Self { blocks }
    }

    pub fn open(path: &Path) -> AppResult<Self> {
        let src = fs::read_to_string(path).map_err(|e| {
            AppError::Template(format!("cannot read template {}: {}", path.display(), e))
        })?;
        Ok(Self::parse(&src))
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.blocks.iter().any(|b| match b {
            Block::Text(t) => t.contains(needle),
            Block::Table(t) => t.rows.iter().flatten().any(|c| c.contains(needle)),
        })
    }

    /// Replace every occurrence of `token`; returns how many were replaced.
    pub fn replace_text(&mut self, token: &str, value: &str) -> usize {
        self.blocks
            .iter_mut()
            .map(|b| match b {
                Block::Text(t) => replace_in(t, token, value),
                Block::Table(t) => t.replace_text(token, value),
            })
            .sum()
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Table(t) => Some(t),
            Block::Text(_) => None,
        })
    }

    /// First table whose text contains `marker`.
    pub fn find_table(&self, marker: &str) -> Option<&Table> {
        self.tables().find(|t| t.text().contains(marker))
    }

    pub fn find_table_mut(&mut self, marker: &str) -> Option<&mut Table> {
        self.blocks.iter_mut().find_map(|b| match b {
            Block::Table(t) if t.text().contains(marker) => Some(t),
            _ => None,
        })
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for block in &self.blocks {
            match block {
                Block::Text(t) => {
                    out.push_str(t);
                    out.push('\n');
                }
                Block::Table(t) => {
                    for (i, row) in t.rows.iter().enumerate() {
                        let cells: Vec<String> = row.iter().map(|c| escape_cell(c)).collect();
                        out.push_str(&format!("| {} |\n", cells.join(" | ")));
                        if i == 0 {
                            let sep = vec!["---"; row.len().max(1)].join(" | ");
                            out.push_str(&format!("| {} |\n", sep));
                        }
                    }
                }
            }
        }
        out
    }

    pub fn save(&self, path: &Path) -> AppResult<()> {
        fs::write(path, self.to_text())?;
        Ok(())
    }
}

fn replace_in(s: &mut String, token: &str, value: &str) -> usize {
    if token.is_empty() {
        return 0;
    }
    let n = s.matches(token).count();
    if n > 0 {
        *s = s.replace(token, value);
    }
    n
}

fn escape_cell(cell: &str) -> String {
    cell.replace('|', "\\|")
}

fn split_cells(line: &str) -> Vec<String> {
    let line = line.trim();
    let inner = line.strip_prefix('|').unwrap_or(line);
    let inner = match inner.strip_suffix('|') {
        Some(rest) if !rest.ends_with('\\') => rest,
        _ => inner,
    };

    let mut cells = Vec::new();
    let mut cell = String::new();
    let mut chars = inner.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' if chars.peek() == Some(&'|') => {
                cell.push('|');
                chars.next();
            }
            '|' => cells.push(std::mem::take(&mut cell).trim().to_string()),
            _ => cell.push(ch),
        }
    }
    cells.push(cell.trim().to_string());
    cells
}

fn is_separator(line: &str) -> bool {
    let cells = split_cells(line);
    !cells.is_empty()
        && cells
            .iter()
            .all(|c| !c.is_empty() && c.chars().all(|ch| matches!(ch, '-' | ':')))
}
