use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Months, NaiveDate, NaiveDateTime, Utc};

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Parse a ledger date cell. Timestamps keep only their date part.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }

    let dt_formats = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.fZ"];
    dt_formats
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|dt| dt.date())
}

/// `yyyy-MM-dd`
pub fn format_iso(d: NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

/// `dd MMMMM, yyyy`, e.g. "29 February, 2024"
pub fn format_long(d: NaiveDate) -> String {
    d.format("%d %B, %Y").to_string()
}

/// `yyyyMMdd`
pub fn format_compact(d: NaiveDate) -> String {
    d.format("%Y%m%d").to_string()
}

/// One calendar month later, clamped to the last day of a shorter month.
pub fn add_one_month(d: NaiveDate) -> AppResult<NaiveDate> {
    d.checked_add_months(Months::new(1))
        .ok_or_else(|| AppError::InvalidDate(format!("{d} + 1 month")))
}

/// API timestamps, always UTC with second precision.
pub fn format_api_timestamp(dt: DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

pub fn parse_api_timestamp(s: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| AppError::InvalidDate(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn due_date_clamps_into_leap_february() {
        let due = add_one_month(ymd(2024, 1, 31)).unwrap();
        assert_eq!(due, ymd(2024, 2, 29));
        assert_eq!(format_long(due), "29 February, 2024");
    }

    #[test]
    fn due_date_month_length_edges() {
        assert_eq!(add_one_month(ymd(2023, 1, 31)).unwrap(), ymd(2023, 2, 28));
        assert_eq!(add_one_month(ymd(2024, 3, 31)).unwrap(), ymd(2024, 4, 30));
        assert_eq!(add_one_month(ymd(2024, 12, 15)).unwrap(), ymd(2025, 1, 15));
        assert_eq!(add_one_month(ymd(2024, 2, 29)).unwrap(), ymd(2024, 3, 29));
    }

    #[test]
    fn ledger_dates_accept_timestamps() {
        assert_eq!(parse_date("2024-01-02"), Some(ymd(2024, 1, 2)));
        assert_eq!(parse_date("2024-01-02T09:30:00"), Some(ymd(2024, 1, 2)));
        assert_eq!(parse_date("02/01/2024"), None);
    }

    #[test]
    fn api_timestamps_round_trip_at_second_precision() {
        let dt = parse_api_timestamp("2024-05-06T07:08:09Z").unwrap();
        assert_eq!(format_api_timestamp(dt), "2024-05-06T07:08:09Z");

        let offset = parse_api_timestamp("2024-05-06T09:08:09+02:00").unwrap();
        assert_eq!(format_api_timestamp(offset), "2024-05-06T07:08:09Z");
    }

    #[test]
    fn compact_date() {
        assert_eq!(format_compact(ymd(2024, 3, 7)), "20240307");
    }
}
