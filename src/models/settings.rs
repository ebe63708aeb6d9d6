//! Flat key/value settings read from the settings sheet.
//!
//! Nothing is validated at load time: a missing or malformed key is reported
//! as [`AppError::Config`] by the accessor that needs it.

use crate::errors::{AppError, AppResult};
use crate::sheet::{Sheet, Workbook};
use crate::utils::path::expand_tilde;
use std::collections::BTreeMap;
use std::path::PathBuf;

pub const COMPANY_NAME: &str = "companyName";
pub const COMPANY_ADDRESS: &str = "companyAddress";
pub const COMPANY_ID: &str = "companyId";
pub const RATE: &str = "rate";
pub const API_BASE_URL: &str = "apiBaseUrl";
pub const API_KEY: &str = "apiKey";
pub const PROJECT_FILTER: &str = "companyProjectString";
pub const INVOICE_TEMPLATE: &str = "invoiceTemplate";
pub const INVOICE_FOLDER: &str = "invoiceFolder";
pub const CURRENCY: &str = "currency";

pub const DEFAULT_CURRENCY: &str = "€";

/// Keys written by `init` into a fresh settings sheet.
pub const KNOWN_KEYS: [&str; 10] = [
    COMPANY_NAME,
    COMPANY_ADDRESS,
    COMPANY_ID,
    RATE,
    API_BASE_URL,
    API_KEY,
    PROJECT_FILTER,
    INVOICE_TEMPLATE,
    INVOICE_FOLDER,
    CURRENCY,
];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    values: BTreeMap<String, String>,
}

impl Settings {
    /// Two columns (key, value), no header. Rows with an empty key are skipped;
    /// a repeated key keeps its last value.
    pub fn from_sheet(sheet: &Sheet) -> Self {
        let values = sheet
            .data_range()
            .iter()
            .filter_map(|row| {
                let key = row.first()?.trim();
                if key.is_empty() {
                    return None;
                }
                let value = row.get(1).map(|v| v.trim()).unwrap_or("");
                Some((key.to_string(), value.to_string()))
            })
            .collect();
        Self { values }
    }

    /// Fresh read of the settings sheet; nothing is cached between commands.
    pub fn load(workbook: &Workbook, sheet_name: &str) -> AppResult<Self> {
        Ok(Self::from_sheet(&workbook.sheet(sheet_name)?))
    }

    pub fn from_pairs<K: Into<String>, V: Into<String>>(pairs: impl IntoIterator<Item = (K, V)>) -> Self {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn require(&self, key: &str) -> AppResult<&str> {
        self.get(key)
            .ok_or_else(|| AppError::Config(format!("missing setting '{key}'")))
    }

    pub fn company_name(&self) -> AppResult<&str> {
        self.require(COMPANY_NAME)
    }

    pub fn company_address(&self) -> AppResult<&str> {
        self.require(COMPANY_ADDRESS)
    }

    pub fn company_id(&self) -> AppResult<&str> {
        self.require(COMPANY_ID)
    }

    /// Default hourly rate applied to newly imported entries.
    pub fn rate(&self) -> AppResult<f64> {
        let raw = self.require(RATE)?;
        raw.parse::<f64>()
            .ok()
            .filter(|r| r.is_finite() && *r >= 0.0)
            .ok_or_else(|| AppError::Config(format!("setting '{RATE}' is not a valid rate: {raw}")))
    }

    pub fn api_base_url(&self) -> AppResult<&str> {
        self.require(API_BASE_URL)
    }

    pub fn api_key(&self) -> AppResult<&str> {
        self.require(API_KEY)
    }

    pub fn project_filter(&self) -> AppResult<&str> {
        self.require(PROJECT_FILTER)
    }

    pub fn invoice_template(&self) -> AppResult<PathBuf> {
        self.require(INVOICE_TEMPLATE).map(expand_tilde)
    }

    pub fn invoice_folder(&self) -> AppResult<PathBuf> {
        self.require(INVOICE_FOLDER).map(expand_tilde)
    }

    pub fn currency(&self) -> &str {
        self.get(CURRENCY).unwrap_or(DEFAULT_CURRENCY)
    }
}
