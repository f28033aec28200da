// Utility functions
use chrono::NaiveDate;

/// Parses a `YYYY-MM-DD` date string, if possible.
pub fn parse_date(date_str: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d").ok()
}

/// Rounds to two decimal places from the exact decimal expansion, ties to even.
pub fn round2(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{:.2}", value).parse().unwrap_or(value)
}
