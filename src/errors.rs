//! Unified application error type.
//! All modules (sheet, ledger, api, core, cli) return AppError to keep the
//! error handling consistent and easy to manage.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    // ---------------------------
    // Audit database
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid duration format: {0}")]
    Format(String),

    // ---------------------------
    // Store / ledger errors
    // ---------------------------
    #[error("Sheet error: {0}")]
    Sheet(String),

    #[error("Ledger error: {0}")]
    Ledger(String),

    // ---------------------------
    // Remote API
    // ---------------------------
    #[error("Fetch error: {0}")]
    Fetch(String),

    // ---------------------------
    // Invoice template
    // ---------------------------
    #[error("Template error: {0}")]
    Template(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration")]
    ConfigLoad,

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("Export error: {0}")]
    Export(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

pub type AppResult<T> = Result<T, AppError>;
