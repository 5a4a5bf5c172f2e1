use time::{Date, OffsetDateTime};

/// Telemetry payload exactly as ingested; only the normalizer reads it.
pub type RawRecord = serde_json::Value;

/// A validated sensor reading.
///
/// Temperature is always present and finite; humidity is kept per-field,
/// so a record with a valid temperature but unusable humidity still counts
/// for temperature aggregates.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub timestamp: OffsetDateTime,
    pub temperature: f64,
    pub humidity: Option<f64>,
}

/// Min/max/mean over one measured quantity for one day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

/// Per-day aggregation result.
#[derive(Debug, Clone, PartialEq)]
pub struct DaySummary {
    pub date: Date,
    pub reading_count: usize,
    pub temperature: FieldStats,
    /// Absent when no reading of the day carried a usable humidity value.
    pub humidity: Option<FieldStats>,
    /// Chill hours for the day, rounded to 2 decimals.
    pub chill_hours: f64,
}

/// Full aggregation output for one sector and window.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    /// Day summaries, most recent day first.
    pub days: Vec<DaySummary>,
    /// Sum of the unrounded per-day chill hours, rounded to 1 decimal.
    pub total_chill_hours: f64,
}
