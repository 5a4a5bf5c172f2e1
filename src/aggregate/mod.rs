/// Calendar-day aggregation of sector sensor readings
pub mod buckets;
pub mod exposure;
pub mod intervals;
pub mod normalize;
pub mod stats;

pub use normalize::{normalize_records, sort_chronological};

use time::macros::offset;
use time::UtcOffset;

use crate::models::{DaySummary, FieldStats, RawRecord, Report};
use crate::utils::round_decimals;

pub const DEFAULT_CHILL_THRESHOLD: f64 = 7.0; // °C, inclusive
pub const DEFAULT_MAX_GAP_HOURS: f64 = 2.0; // Gaps above this are data outages
pub const DEFAULT_NOMINAL_INTERVAL_HOURS: f64 = 1.0 / 6.0; // 10 minute sampling cadence
pub const DEFAULT_UTC_OFFSET: UtcOffset = offset!(-4); // Plantation local time

/// Tuning parameters for one aggregation run
#[derive(Debug, Clone, Copy)]
pub struct AggregateParams {
    /// Readings at or below this temperature count as chill exposure.
    pub chill_threshold: f64,
    /// Largest reading gap still counted at face value, in hours.
    pub max_gap_hours: f64,
    /// Fallback duration for capped gaps and the final reading, in hours.
    pub nominal_interval_hours: f64,
    /// Fixed local offset used to derive calendar days.
    pub utc_offset: UtcOffset,
}

impl Default for AggregateParams {
    fn default() -> Self {
        Self {
            chill_threshold: DEFAULT_CHILL_THRESHOLD,
            max_gap_hours: DEFAULT_MAX_GAP_HOURS,
            nominal_interval_hours: DEFAULT_NOMINAL_INTERVAL_HOURS,
            utc_offset: DEFAULT_UTC_OFFSET,
        }
    }
}

/// Aggregate raw telemetry records into a daily report
///
/// The input may be empty, unsorted and contain malformed entries; the
/// pipeline normalizes, sorts, estimates represented durations over the
/// full sequence, then folds each day bucket into a summary. Zero valid
/// readings produce a report with no days and a zero total.
pub fn aggregate(records: &[RawRecord], params: &AggregateParams) -> Report {
    let mut readings = normalize::normalize_records(records);
    normalize::sort_chronological(&mut readings);

    let intervals = intervals::assign_intervals(
        &readings,
        params.max_gap_hours,
        params.nominal_interval_hours,
    );
    let chill_by_day = exposure::accumulate_chill(
        &readings,
        &intervals,
        params.chill_threshold,
        params.utc_offset,
    );
    let buckets = buckets::bucketize(&readings, params.utc_offset);

    let mut days = Vec::with_capacity(buckets.len());
    for (date, bucket) in buckets.iter().rev() {
        let temperature = match FieldStats::from_values(bucket.iter().map(|r| r.temperature)) {
            Some(stats) => stats,
            None => continue,
        };
        let humidity = FieldStats::from_values(bucket.iter().filter_map(|r| r.humidity));
        let chill_hours = chill_by_day.get(date).copied().unwrap_or(0.0);

        days.push(DaySummary {
            date: *date,
            reading_count: bucket.len(),
            temperature,
            humidity,
            chill_hours: round_decimals(chill_hours, 2),
        });
    }

    // Total from the unrounded per-day values; rounding per-day first
    // would compound the error across the window.
    let total: f64 = chill_by_day.values().sum();

    Report {
        days,
        total_chill_hours: round_decimals(total, 1),
    }
}
