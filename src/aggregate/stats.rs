/// Descriptive statistics over one day of readings
use crate::models::FieldStats;

impl FieldStats {
    /// Compute min, max and arithmetic mean over a value set
    ///
    /// Returns `None` for an empty set so callers never divide by zero;
    /// a day without usable humidity simply reports no humidity stats.
    pub fn from_values<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        let mut count = 0usize;

        for value in values {
            min = min.min(value);
            max = max.max(value);
            sum += value;
            count += 1;
        }

        if count == 0 {
            return None;
        }

        Some(FieldStats {
            min,
            max,
            mean: sum / count as f64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_set_has_no_stats() {
        assert_eq!(FieldStats::from_values(std::iter::empty()), None);
    }

    #[test]
    fn single_value_is_its_own_extremes() {
        let stats = FieldStats::from_values([5.5]).unwrap();

        assert_eq!(stats.min, 5.5);
        assert_eq!(stats.max, 5.5);
        assert_eq!(stats.mean, 5.5);
    }

    #[test]
    fn min_max_mean_over_a_set() {
        let stats = FieldStats::from_values([4.0, -2.0, 10.0, 8.0]).unwrap();

        assert_eq!(stats.min, -2.0);
        assert_eq!(stats.max, 10.0);
        assert_eq!(stats.mean, 5.0);
    }
}
