/// Utility functions for formatting and rounding
use time::{format_description, Date, OffsetDateTime};

/// Format a timestamp for human-readable logging
///
/// Converts an OffsetDateTime to DD.MM.YYYY - HH:MM:SS format
/// Falls back to default string representation if formatting fails.
pub fn format_datetime(dt: &OffsetDateTime) -> String {
    let format = format_description::parse("[day].[month].[year] - [hour]:[minute]:[second]")
        .expect("Failed to create format description");
    dt.format(&format).unwrap_or_else(|_| dt.to_string())
}

/// Format a calendar day as YYYY-MM-DD for report lines
pub fn format_date(date: &Date) -> String {
    let format = format_description::parse("[year]-[month]-[day]")
        .expect("Failed to create format description");
    date.format(&format).unwrap_or_else(|_| date.to_string())
}

/// Convert a time::Duration to seconds as u64
///
/// Helper function to work with duration calculations in the main loop.
pub fn duration_to_seconds(duration: time::Duration) -> u64 {
    duration.whole_seconds() as u64
}

/// Round a value to the given number of decimal places
pub fn round_decimals(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}
