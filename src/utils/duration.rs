//! ISO-8601 duration subset (`PT#H#M#S`) used by the tracking API for hours.

use crate::errors::{AppError, AppResult};
use regex::Regex;
use std::sync::LazyLock;

static DURATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^PT(?:(\d+(?:\.\d+)?)H)?(?:(\d+(?:\.\d+)?)M)?(?:(\d+(?:\.\d+)?)S)?$")
        .expect("duration pattern is valid")
});

/// Convert a `PT[nH][nM][nS]` duration into fractional hours.
///
/// Every component is optional, but at least one must be present: a bare
/// `PT` is rejected rather than read as zero hours.
pub fn parse_duration_hours(input: &str) -> AppResult<f64> {
    let s = input.trim();
    let caps = DURATION_RE
        .captures(s)
        .ok_or_else(|| AppError::Format(input.to_string()))?;

    if caps.iter().skip(1).all(|c| c.is_none()) {
        return Err(AppError::Format(input.to_string()));
    }

    let component = |i: usize| -> AppResult<f64> {
        match caps.get(i) {
            Some(m) => m
                .as_str()
                .parse::<f64>()
                .map_err(|_| AppError::Format(input.to_string())),
            None => Ok(0.0),
        }
    };

    Ok(component(1)? + component(2)? / 60.0 + component(3)? / 3600.0)
}
