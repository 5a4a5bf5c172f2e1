/// Represented-duration estimation for irregularly spaced readings
use crate::models::Reading;

/// Assign each reading the number of hours it represents
///
/// Works over the full sorted sequence so gaps are measured across day
/// boundaries. The duration is the raw gap to the next reading, except:
/// - gaps longer than `max_gap_hours` fall back to the nominal interval,
///   so a data outage is not counted as sustained measurement;
/// - non-positive gaps (duplicate or skewed timestamps) fall back to the
///   nominal interval;
/// - the last reading, having no successor, gets the nominal interval.
///
/// The result is parallel to `readings`.
pub fn assign_intervals(
    readings: &[Reading],
    max_gap_hours: f64,
    nominal_interval_hours: f64,
) -> Vec<f64> {
    let mut intervals = Vec::with_capacity(readings.len());

    for pair in readings.windows(2) {
        let gap_hours = (pair[1].timestamp - pair[0].timestamp).as_seconds_f64() / 3600.0;
        if gap_hours <= 0.0 || gap_hours > max_gap_hours {
            intervals.push(nominal_interval_hours);
        } else {
            intervals.push(gap_hours);
        }
    }

    if !readings.is_empty() {
        intervals.push(nominal_interval_hours);
    }

    intervals
}
