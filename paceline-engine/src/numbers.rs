//! Numeric conversion helpers centralizing safe numeric casts.

use chrono::TimeDelta;
use num_traits::cast::cast;

use crate::constants::MICROS_PER_HOUR;

/// Convert decimal hours to a microsecond-resolution duration.
///
/// Non-finite input collapses to zero; out-of-range values clamp to the
/// representable microsecond range.
#[must_use]
pub fn hours_to_delta(hours: f64) -> TimeDelta {
    if !hours.is_finite() {
        return TimeDelta::zero();
    }
    let micros = (hours * MICROS_PER_HOUR).round();
    let min = cast::<i64, f64>(i64::MIN).unwrap_or(f64::MIN);
    let max = cast::<i64, f64>(i64::MAX).unwrap_or(f64::MAX);
    let clamped = cast::<f64, i64>(micros.clamp(min, max)).unwrap_or(0);
    TimeDelta::microseconds(clamped)
}

/// Convert a duration to decimal hours.
#[must_use]
pub fn delta_to_hours(delta: TimeDelta) -> f64 {
    let micros = delta.num_microseconds().unwrap_or_else(|| {
        if delta < TimeDelta::zero() {
            i64::MIN
        } else {
            i64::MAX
        }
    });
    i64_to_f64(micros) / MICROS_PER_HOUR
}

/// Number of whole `chunk`s that fit in `distance`, floored at zero.
#[must_use]
pub fn whole_chunks(distance: f64, chunk: f64) -> usize {
    if !distance.is_finite() || !chunk.is_finite() || chunk <= 0.0 {
        return 0;
    }
    cast::<f64, usize>((distance / chunk).floor().max(0.0)).unwrap_or(0)
}

/// Convert usize to f64 while allowing precision loss in a single location.
#[must_use]
pub fn usize_to_f64(value: usize) -> f64 {
    cast::<usize, f64>(value).unwrap_or(0.0)
}

/// Convert i64 to f64 while allowing precision loss in a single location.
#[must_use]
pub fn i64_to_f64(value: i64) -> f64 {
    cast::<i64, f64>(value).unwrap_or(0.0)
}

/// Divide, returning zero when the denominator is zero or the result is not finite.
#[must_use]
pub fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator.abs() <= f64::EPSILON {
        return 0.0;
    }
    let ratio = numerator / denominator;
    if ratio.is_finite() { ratio } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hours_round_trip_at_microsecond_resolution() {
        let delta = hours_to_delta(1.5);
        assert_eq!(delta, TimeDelta::minutes(90));
        assert!((delta_to_hours(delta) - 1.5).abs() < 1e-12);
    }

    #[test]
    fn hours_to_delta_handles_non_finite() {
        assert_eq!(hours_to_delta(f64::NAN), TimeDelta::zero());
        assert_eq!(hours_to_delta(f64::INFINITY), TimeDelta::zero());
    }

    #[test]
    fn negative_hours_stay_negative() {
        let delta = hours_to_delta(-0.25);
        assert_eq!(delta, TimeDelta::minutes(-15));
        assert!((delta_to_hours(delta) + 0.25).abs() < 1e-12);
    }

    #[test]
    fn whole_chunks_floors_and_guards() {
        assert_eq!(whole_chunks(173.0, 50.0), 3);
        assert_eq!(whole_chunks(150.0, 50.0), 3);
        assert_eq!(whole_chunks(10.0, 50.0), 0);
        assert_eq!(whole_chunks(10.0, 0.0), 0);
        assert_eq!(whole_chunks(f64::NAN, 5.0), 0);
    }

    #[test]
    fn safe_ratio_avoids_division_by_zero() {
        assert!((safe_ratio(10.0, 4.0) - 2.5).abs() < f64::EPSILON);
        assert!(safe_ratio(10.0, 0.0).abs() < f64::EPSILON);
    }
}
