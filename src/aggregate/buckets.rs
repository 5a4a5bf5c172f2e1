/// Grouping of readings into local calendar days
use std::collections::BTreeMap;

use time::{Date, OffsetDateTime, UtcOffset};

use crate::models::Reading;

/// Calendar day of a timestamp under the configured local offset
///
/// This is the single day-derivation rule: bucketing and chill-hour
/// attribution both go through here, so readings near midnight always
/// land on the same calendar day in both views.
pub fn local_day(timestamp: OffsetDateTime, offset: UtcOffset) -> Date {
    timestamp.to_offset(offset).date()
}

/// Group sorted readings by their local calendar day
///
/// Buckets inherit chronological order from the input; iterating the map
/// in reverse yields the newest-first ordering used by the report.
pub fn bucketize(readings: &[Reading], offset: UtcOffset) -> BTreeMap<Date, Vec<Reading>> {
    let mut buckets: BTreeMap<Date, Vec<Reading>> = BTreeMap::new();

    for reading in readings {
        buckets
            .entry(local_day(reading.timestamp, offset))
            .or_insert_with(Vec::new)
            .push(reading.clone());
    }

    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime, offset};

    fn reading(timestamp: OffsetDateTime, temperature: f64) -> Reading {
        Reading {
            timestamp,
            temperature,
            humidity: None,
        }
    }

    #[test]
    fn readings_group_by_calendar_day() {
        let readings = vec![
            reading(datetime!(2025-06-09 23:50:00 UTC), 4.0),
            reading(datetime!(2025-06-10 00:10:00 UTC), 5.0),
            reading(datetime!(2025-06-10 12:00:00 UTC), 15.0),
        ];

        let buckets = bucketize(&readings, offset!(UTC));

        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[&date!(2025-06-09)].len(), 1);
        assert_eq!(buckets[&date!(2025-06-10)].len(), 2);
    }

    #[test]
    fn local_offset_shifts_the_day_boundary() {
        // 02:30 UTC is 22:30 of the previous day at UTC-4
        let timestamp = datetime!(2025-06-10 02:30:00 UTC);

        assert_eq!(local_day(timestamp, offset!(UTC)), date!(2025-06-10));
        assert_eq!(local_day(timestamp, offset!(-4)), date!(2025-06-09));
    }

    #[test]
    fn buckets_keep_chronological_order() {
        let readings = vec![
            reading(datetime!(2025-06-10 01:00:00 UTC), 1.0),
            reading(datetime!(2025-06-10 02:00:00 UTC), 2.0),
            reading(datetime!(2025-06-10 03:00:00 UTC), 3.0),
        ];

        let buckets = bucketize(&readings, offset!(UTC));

        let temps: Vec<f64> = buckets[&date!(2025-06-10)]
            .iter()
            .map(|r| r.temperature)
            .collect();
        assert_eq!(temps, vec![1.0, 2.0, 3.0]);
    }
}
