//! Computed output records produced by a simulation run.
use chrono::{NaiveDateTime, TimeDelta};
use serde::Serialize;

use crate::constants::HOURS_PER_DAY;
use crate::numbers::{delta_to_hours, safe_ratio};
use crate::rest_stop::RestStop;

/// Timing for one distance chunk.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubSplitDetail {
    pub distance: f64,
    pub start_distance: f64,
    pub start_time: NaiveDateTime,
    /// Arrival with every adjustment included.
    pub end_time: NaiveDateTime,
    pub moving_speed: f64,
    #[serde(with = "crate::serde_hours")]
    pub moving_time: TimeDelta,
    #[serde(with = "crate::serde_hours")]
    pub down_time: TimeDelta,
    /// Moving plus down-time.
    #[serde(with = "crate::serde_hours")]
    pub split_time: TimeDelta,
    /// Split time plus adjustment; equal to `split_time` for sub-splits.
    #[serde(with = "crate::serde_hours")]
    pub total_time: TimeDelta,
    /// Distance per elapsed hour.
    pub pace: f64,
}

impl SubSplitDetail {
    /// Start and end distance markers.
    #[must_use]
    pub fn span(&self) -> (f64, f64) {
        (self.start_distance, self.start_distance + self.distance)
    }

    #[must_use]
    pub fn end_distance(&self) -> f64 {
        self.start_distance + self.distance
    }
}

/// Distance per hour over `elapsed`, zero when no time elapsed.
#[must_use]
pub fn pace_for(distance: f64, elapsed: TimeDelta) -> f64 {
    safe_ratio(distance, delta_to_hours(elapsed))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SplitDetail {
    #[serde(flatten)]
    pub leg: SubSplitDetail,
    pub sub_splits: Vec<SubSplitDetail>,
    #[serde(with = "crate::serde_hours")]
    pub adjustment_time: TimeDelta,
    /// When the adjustment (or rest) begins.
    pub adjustment_start: NaiveDateTime,
    /// Copy of the split's rest stop with its arrival stamped.
    pub rest_stop: Option<RestStop>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentDetail {
    pub split_details: Vec<SplitDetail>,
    pub distance: f64,
    pub start_distance: f64,
    pub start_time: NaiveDateTime,
    /// Arrival at the end of the last split, before sleep.
    pub end_time: NaiveDateTime,
    #[serde(with = "crate::serde_hours")]
    pub total_elapsed_time: TimeDelta,
    #[serde(with = "crate::serde_hours")]
    pub total_moving_time: TimeDelta,
    #[serde(with = "crate::serde_hours")]
    pub total_down_time: TimeDelta,
    #[serde(with = "crate::serde_hours")]
    pub total_sleep_time: TimeDelta,
    #[serde(with = "crate::serde_hours")]
    pub total_adjustment_time: TimeDelta,
}

impl SegmentDetail {
    /// Aggregate split details. Totals are sums of per-split fields.
    pub(crate) fn assemble(
        split_details: Vec<SplitDetail>,
        sleep_time: TimeDelta,
        entry_time: NaiveDateTime,
        entry_distance: f64,
    ) -> Self {
        let start_time = split_details
            .first()
            .map_or(entry_time, |s| s.leg.start_time);
        let end_time = split_details.last().map_or(entry_time, |s| s.leg.end_time);
        let distance = split_details.iter().map(|s| s.leg.distance).sum();
        let total_moving_time = sum_deltas(split_details.iter().map(|s| s.leg.moving_time));
        let total_down_time = sum_deltas(split_details.iter().map(|s| s.leg.down_time));
        let total_adjustment_time = sum_deltas(split_details.iter().map(|s| s.adjustment_time));
        let total_elapsed_time =
            sum_deltas(split_details.iter().map(|s| s.leg.total_time)) + sleep_time;
        Self {
            split_details,
            distance,
            start_distance: entry_distance,
            start_time,
            end_time,
            total_elapsed_time,
            total_moving_time,
            total_down_time,
            total_sleep_time: sleep_time,
            total_adjustment_time,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseDetail {
    pub segment_details: Vec<SegmentDetail>,
    pub distance: f64,
    pub start_time: NaiveDateTime,
    /// Final clock time, after the last segment's sleep.
    pub end_time: NaiveDateTime,
    #[serde(with = "crate::serde_hours")]
    pub total_elapsed_time: TimeDelta,
    #[serde(with = "crate::serde_hours")]
    pub total_moving_time: TimeDelta,
    #[serde(with = "crate::serde_hours")]
    pub total_down_time: TimeDelta,
    #[serde(with = "crate::serde_hours")]
    pub total_sleep_time: TimeDelta,
    #[serde(with = "crate::serde_hours")]
    pub total_adjustment_time: TimeDelta,
}

impl CourseDetail {
    pub(crate) fn assemble(
        segment_details: Vec<SegmentDetail>,
        start_time: NaiveDateTime,
        end_time: NaiveDateTime,
    ) -> Self {
        let distance = segment_details.iter().map(|s| s.distance).sum();
        let total = |field: fn(&SegmentDetail) -> TimeDelta| {
            sum_deltas(segment_details.iter().map(field))
        };
        let total_elapsed_time = total(|s| s.total_elapsed_time);
        let total_moving_time = total(|s| s.total_moving_time);
        let total_down_time = total(|s| s.total_down_time);
        let total_sleep_time = total(|s| s.total_sleep_time);
        let total_adjustment_time = total(|s| s.total_adjustment_time);
        Self {
            segment_details,
            distance,
            start_time,
            end_time,
            total_elapsed_time,
            total_moving_time,
            total_down_time,
            total_sleep_time,
            total_adjustment_time,
        }
    }

    /// Every split in course order.
    pub fn split_details(&self) -> impl Iterator<Item = &SplitDetail> {
        self.segment_details
            .iter()
            .flat_map(|segment| segment.split_details.iter())
    }

    /// Headline numbers and ratios for the whole course.
    #[must_use]
    pub fn summary(&self) -> CourseSummary {
        let elapsed = delta_to_hours(self.total_elapsed_time);
        let moving = delta_to_hours(self.total_moving_time);
        let down = delta_to_hours(self.total_down_time);
        let adjustment = delta_to_hours(self.total_adjustment_time);
        CourseSummary {
            distance: self.distance,
            start_time: self.start_time,
            end_time: self.end_time,
            moving_hours: moving,
            down_hours: down,
            adjustment_hours: adjustment,
            sleep_hours: delta_to_hours(self.total_sleep_time),
            elapsed_hours: elapsed,
            pace: safe_ratio(self.distance, elapsed),
            distance_per_day: safe_ratio(self.distance, elapsed / HOURS_PER_DAY),
            moving_to_elapsed: safe_ratio(moving, elapsed),
            down_to_elapsed: safe_ratio(down, elapsed),
            adjustment_to_elapsed: safe_ratio(adjustment, elapsed),
            down_to_moving: safe_ratio(down, moving),
            adjustment_to_moving: safe_ratio(adjustment, moving),
        }
    }
}

/// Course-wide totals in decimal hours plus derived ratios.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseSummary {
    pub distance: f64,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub moving_hours: f64,
    pub down_hours: f64,
    pub adjustment_hours: f64,
    pub sleep_hours: f64,
    pub elapsed_hours: f64,
    pub pace: f64,
    pub distance_per_day: f64,
    pub moving_to_elapsed: f64,
    pub down_to_elapsed: f64,
    pub adjustment_to_elapsed: f64,
    pub down_to_moving: f64,
    pub adjustment_to_moving: f64,
}

pub(crate) fn sum_deltas(deltas: impl Iterator<Item = TimeDelta>) -> TimeDelta {
    deltas.fold(TimeDelta::zero(), |acc, delta| acc + delta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 7, 12)
            .and_then(|d| d.and_hms_opt(hour, 0, 0))
            .unwrap()
    }

    fn leg(start: u32, hours: i64, distance: f64, start_distance: f64) -> SubSplitDetail {
        let total = TimeDelta::hours(hours);
        SubSplitDetail {
            distance,
            start_distance,
            start_time: at(start),
            end_time: at(start) + total,
            moving_speed: 20.0,
            moving_time: TimeDelta::hours(hours - 1),
            down_time: TimeDelta::hours(1),
            split_time: total,
            total_time: total,
            pace: pace_for(distance, total),
        }
    }

    fn split(start: u32, hours: i64, distance: f64, start_distance: f64) -> SplitDetail {
        let leg = leg(start, hours, distance, start_distance);
        SplitDetail {
            adjustment_start: leg.end_time,
            sub_splits: vec![leg.clone()],
            leg,
            adjustment_time: TimeDelta::zero(),
            rest_stop: None,
        }
    }

    #[test]
    fn span_reports_start_and_end_markers() {
        let detail = leg(6, 2, 40.0, 100.0);
        assert_eq!(detail.span(), (100.0, 140.0));
        assert!((detail.pace - 20.0).abs() < 1e-9);
    }

    #[test]
    fn segment_totals_sum_split_fields() {
        let splits = vec![split(6, 3, 60.0, 0.0), split(9, 2, 40.0, 60.0)];
        let segment = SegmentDetail::assemble(splits, TimeDelta::hours(4), at(6), 0.0);
        assert_eq!(segment.start_time, at(6));
        assert_eq!(segment.end_time, at(11));
        assert_eq!(segment.total_moving_time, TimeDelta::hours(3));
        assert_eq!(segment.total_down_time, TimeDelta::hours(2));
        assert_eq!(segment.total_elapsed_time, TimeDelta::hours(9));
        assert!((segment.distance - 100.0).abs() < 1e-9);
    }

    #[test]
    fn summary_ratios_guard_zero_time() {
        let segment = SegmentDetail::assemble(Vec::new(), TimeDelta::zero(), at(6), 0.0);
        let course = CourseDetail::assemble(vec![segment], at(6), at(6));
        let summary = course.summary();
        assert!(summary.pace.abs() < f64::EPSILON);
        assert!(summary.down_to_moving.abs() < f64::EPSILON);
    }

    #[test]
    fn summary_reports_daily_distance() {
        let splits = vec![split(0, 12, 240.0, 0.0)];
        let segment = SegmentDetail::assemble(splits, TimeDelta::hours(12), at(0), 0.0);
        let course = CourseDetail::assemble(vec![segment], at(0), at(0) + TimeDelta::hours(24));
        let summary = course.summary();
        assert!((summary.elapsed_hours - 24.0).abs() < 1e-9);
        assert!((summary.distance_per_day - 240.0).abs() < 1e-9);
        assert!((summary.pace - 10.0).abs() < 1e-9);
        assert!((summary.down_to_moving - 1.0 / 11.0).abs() < 1e-9);
    }
}
