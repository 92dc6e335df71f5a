//! Coordinate Aggregation Service
//!
//! Pure domain logic for combining provider readings into one coordinate.
//! This service has NO external dependencies - it's pure Rust.

use crate::domain::entities::{Aggregate, GeoRecord, LookupResult};

/// Median of a set of readings.
///
/// Sorts ascending; an odd count yields the middle element, an even count the
/// mean of the two middle elements. Returns `None` for an empty input.
/// Callers are expected to have filtered out non-finite values.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    }
}

/// Compute the aggregate coordinate from a full set of provider results.
///
/// Each axis is aggregated independently over successful results whose value
/// for that axis is a finite number. A `0.0` reading counts like any other.
pub fn aggregate(results: &[LookupResult]) -> Aggregate {
    let readings = |axis: fn(&GeoRecord) -> Option<f64>| -> Vec<f64> {
        results
            .iter()
            .filter_map(LookupResult::record)
            .filter_map(axis)
            .filter(|v| v.is_finite())
            .collect()
    };

    Aggregate {
        latitude: median(&readings(|r| r.latitude)),
        longitude: median(&readings(|r| r.longitude)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn located(lat: Option<f64>, lon: Option<f64>) -> LookupResult {
        LookupResult::success(
            "p",
            "P",
            GeoRecord {
                latitude: lat,
                longitude: lon,
                ..Default::default()
            },
        )
    }

    fn failed() -> LookupResult {
        LookupResult::failure("f", "F", "HTTP 500")
    }

    // ===== median =====

    #[test]
    fn test_median_empty_is_none() {
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn test_median_single() {
        assert_eq!(median(&[42.5]), Some(42.5));
    }

    #[test]
    fn test_median_odd_unsorted() {
        assert_eq!(median(&[30.0, 10.0, 20.0]), Some(20.0));
        assert_eq!(median(&[5.0, -1.0, 3.0, 9.0, 0.0]), Some(3.0));
    }

    #[test]
    fn test_median_even_is_mean_of_middle() {
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(&[-10.0, 10.0]), Some(0.0));
    }

    #[test]
    fn test_median_does_not_mutate_input() {
        let values = [3.0, 1.0, 2.0];
        median(&values);
        assert_eq!(values, [3.0, 1.0, 2.0]);
    }

    // ===== aggregate =====

    #[test]
    fn test_aggregate_skips_failures() {
        let results = vec![
            located(Some(10.0), Some(1.0)),
            failed(),
            located(Some(30.0), Some(3.0)),
            failed(),
            located(Some(20.0), Some(2.0)),
        ];

        let agg = aggregate(&results);
        assert_eq!(agg.latitude, Some(20.0));
        assert_eq!(agg.longitude, Some(2.0));
    }

    #[test]
    fn test_aggregate_even_count() {
        let results = vec![
            located(Some(1.0), Some(1.0)),
            located(Some(2.0), Some(2.0)),
            located(Some(3.0), Some(3.0)),
            located(Some(4.0), Some(4.0)),
            failed(),
        ];

        let agg = aggregate(&results);
        assert_eq!(agg.latitude, Some(2.5));
        assert_eq!(agg.longitude, Some(2.5));
    }

    #[test]
    fn test_aggregate_all_failed_is_null() {
        let results = vec![failed(), failed(), failed(), failed(), failed()];
        assert_eq!(aggregate(&results), Aggregate::default());
    }

    #[test]
    fn test_aggregate_axes_are_independent() {
        let results = vec![
            located(Some(10.0), None),
            located(Some(20.0), None),
            located(None, Some(5.0)),
        ];

        let agg = aggregate(&results);
        assert_eq!(agg.latitude, Some(15.0));
        assert_eq!(agg.longitude, Some(5.0));
    }

    #[test]
    fn test_aggregate_ignores_non_finite() {
        let results = vec![
            located(Some(f64::NAN), Some(f64::INFINITY)),
            located(Some(12.0), Some(7.0)),
        ];

        let agg = aggregate(&results);
        assert_eq!(agg.latitude, Some(12.0));
        assert_eq!(agg.longitude, Some(7.0));
    }

    #[test]
    fn test_aggregate_counts_zero_readings() {
        let results = vec![located(Some(0.0), Some(0.0)), located(Some(10.0), Some(10.0))];

        let agg = aggregate(&results);
        assert_eq!(agg.latitude, Some(5.0));
        assert_eq!(agg.longitude, Some(5.0));
    }
}
