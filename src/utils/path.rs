//! Path utilities: expand ~, turn files into URLs for ledger hyperlinks.

use crate::errors::{AppError, AppResult};
use reqwest::Url;
use std::path::{Path, PathBuf};

pub fn expand_tilde(path: &str) -> PathBuf {
    if path.starts_with("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(path.trim_start_matches("~/"));
    }
    PathBuf::from(path)
}

/// `file://` URL of an absolute path, used as the hyperlink target of invoices.
pub fn file_url(path: &Path) -> AppResult<String> {
    let abs = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };
    Url::from_file_path(&abs)
        .map(|u| u.to_string())
        .map_err(|_| AppError::Other(format!("cannot build a URL for {}", abs.display())))
}

/// First of `dir/<stem>.<ext>`, `dir/<stem> (2).<ext>`, ... that does not exist yet.
pub fn unique_file(dir: &Path, stem: &str, ext: &str) -> PathBuf {
    let first = dir.join(format!("{stem}.{ext}"));
    if !first.exists() {
        return first;
    }
    (2..)
        .map(|n| dir.join(format!("{stem} ({n}).{ext}")))
        .find(|p| !p.exists())
        .unwrap_or(first)
}
