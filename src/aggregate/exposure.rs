/// Time-weighted chill-hour accumulation
use std::collections::BTreeMap;

use time::{Date, UtcOffset};

use crate::aggregate::buckets::local_day;
use crate::models::Reading;

/// Accumulate chill hours per local calendar day
///
/// Every reading at or below the threshold (inclusive) contributes its
/// represented duration to the day the reading itself falls on, i.e. the
/// earlier endpoint when a gap straddles midnight. Totals are kept
/// unrounded; rounding happens once at report-building time.
///
/// `intervals` must be the assignment produced for the same sorted
/// `readings` slice.
pub fn accumulate_chill(
    readings: &[Reading],
    intervals: &[f64],
    threshold: f64,
    offset: UtcOffset,
) -> BTreeMap<Date, f64> {
    let mut chill_by_day: BTreeMap<Date, f64> = BTreeMap::new();

    for (reading, hours) in readings.iter().zip(intervals) {
        if reading.temperature <= threshold {
            *chill_by_day
                .entry(local_day(reading.timestamp, offset))
                .or_insert(0.0) += hours;
        }
    }

    chill_by_day
}
