//! Course simulation: a fold over splits carrying clock, speed and distance.
//!
//! Each split is computed by [`step_split`], a pure function from the carry
//! and the split's resolved settings to a [`SplitDetail`] and the next carry.
//! Overrides cascade course → segment → split through [`resolve`].
use chrono::{NaiveDateTime, TimeDelta};
use log::{debug, trace};

use crate::calculator::{EvenDownTimeCalculator, SubSplitCalculator, SubSplitContext};
use crate::course::{Course, Segment, Split};
use crate::detail::{CourseDetail, SegmentDetail, SplitDetail, SubSplitDetail, pace_for};
use crate::error::PlanError;
use crate::numbers::{delta_to_hours, hours_to_delta};

/// State threaded from one split to the next.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationCarry {
    pub time: NaiveDateTime,
    pub speed: f64,
    pub distance: f64,
}

impl SimulationCarry {
    #[must_use]
    pub const fn start(course: &Course) -> Self {
        Self {
            time: course.start_time,
            speed: course.init_moving_speed,
            distance: 0.0,
        }
    }
}

/// Pick the most specific value: split, then segment, then course.
#[must_use]
pub fn resolve<T: Copy>(course_value: T, segment_override: Option<T>, split_override: Option<T>) -> T {
    split_override.or(segment_override).unwrap_or(course_value)
}

/// Segment-level settings after applying segment overrides to course defaults.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentSettings {
    pub down_time_ratio: f64,
    pub split_decay: f64,
    pub min_moving_speed: f64,
    pub no_end_down_time: bool,
}

impl SegmentSettings {
    #[must_use]
    pub fn resolve(course: &Course, segment: &Segment) -> Self {
        Self {
            down_time_ratio: resolve(course.down_time_ratio, segment.down_time_ratio, None),
            split_decay: resolve(course.split_decay, segment.split_decay, None),
            min_moving_speed: resolve(course.min_moving_speed, segment.min_moving_speed, None),
            no_end_down_time: segment.no_end_down_time,
        }
    }
}

/// Position of a split inside the course, used for error reporting and the
/// last-split rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitPosition {
    pub segment: usize,
    pub split: usize,
    pub is_last: bool,
}

/// Down-time for a split: fixed split value, else ratio of moving time,
/// forced to zero on a segment's last split when suppression is on.
#[must_use]
pub fn down_time_for(
    split: &Split,
    settings: &SegmentSettings,
    moving_time: TimeDelta,
    is_last: bool,
) -> TimeDelta {
    if is_last && settings.no_end_down_time {
        return TimeDelta::zero();
    }
    split.down_time.unwrap_or_else(|| {
        hours_to_delta(delta_to_hours(moving_time) * settings.down_time_ratio)
    })
}

/// Speed carried into the next split.
#[must_use]
pub fn decayed_speed(speed: f64, settings: &SegmentSettings) -> f64 {
    (speed - settings.split_decay).max(settings.min_moving_speed)
}

/// Compute one split and advance the carry.
///
/// # Errors
///
/// Returns [`PlanError::NonPositiveSpeed`] when the effective speed is not
/// positive, or [`PlanError::ClockOverflow`] if the clock leaves the
/// representable range.
pub fn step_split<C: SubSplitCalculator + ?Sized>(
    carry: SimulationCarry,
    split: &Split,
    settings: &SegmentSettings,
    position: SplitPosition,
    calculator: &C,
) -> Result<(SplitDetail, SimulationCarry), PlanError> {
    let speed = resolve(carry.speed, None, split.moving_speed);
    if !speed.is_finite() || speed <= 0.0 {
        return Err(PlanError::NonPositiveSpeed {
            segment: position.segment,
            split: position.split,
            speed,
        });
    }

    let moving_time = hours_to_delta(split.distance / speed);
    let down_time = down_time_for(split, settings, moving_time, position.is_last);
    let split_time = moving_time + down_time;
    let total_time = split_time + split.adjusted_time;

    let sub_splits = calculator.sub_split_details(
        split,
        SubSplitContext {
            start_distance: carry.distance,
            start_time: carry.time,
            moving_time,
            down_time,
            moving_speed: speed,
        },
    )?;

    let end_time = advance(carry.time, total_time)?;
    let adjustment_start = advance(carry.time, split_time)?;
    let detail = SplitDetail {
        leg: SubSplitDetail {
            distance: split.distance,
            start_distance: carry.distance,
            start_time: carry.time,
            end_time,
            moving_speed: speed,
            moving_time,
            down_time,
            split_time,
            total_time,
            pace: pace_for(split.distance, total_time),
        },
        sub_splits,
        adjustment_time: split.adjusted_time,
        adjustment_start,
        rest_stop: split.rest_stop.as_ref().map(|stop| stop.arrived_at(end_time)),
    };

    let next = SimulationCarry {
        time: end_time,
        speed: decayed_speed(carry.speed, settings),
        distance: carry.distance + split.distance,
    };
    trace!(
        "segment {} split {}: carry speed {:.3} -> {:.3}, distance {:.2}",
        position.segment, position.split, carry.speed, next.speed, next.distance
    );
    Ok((detail, next))
}

/// Fold a segment's splits, then add its sleep time to the clock.
///
/// # Errors
///
/// Propagates errors from [`step_split`].
pub fn simulate_segment<C: SubSplitCalculator + ?Sized>(
    course: &Course,
    segment_idx: usize,
    segment: &Segment,
    carry: SimulationCarry,
    calculator: &C,
) -> Result<(SegmentDetail, SimulationCarry), PlanError> {
    let settings = SegmentSettings::resolve(course, segment);
    let entry = SimulationCarry {
        speed: resolve(carry.speed, segment.moving_speed, None),
        ..carry
    };
    debug!(
        "segment {segment_idx}: {} splits from {:.2} at {} ({:.2} speed)",
        segment.splits.len(),
        entry.distance,
        entry.time,
        entry.speed
    );

    let last_idx = segment.splits.len().saturating_sub(1);
    let (split_details, carry) = segment.splits.iter().enumerate().try_fold(
        (Vec::with_capacity(segment.splits.len()), entry),
        |(mut details, carry), (split_idx, split)| {
            let position = SplitPosition {
                segment: segment_idx,
                split: split_idx,
                is_last: split_idx == last_idx,
            };
            let (detail, next) = step_split(carry, split, &settings, position, calculator)?;
            details.push(detail);
            Ok::<_, PlanError>((details, next))
        },
    )?;

    let rested = SimulationCarry {
        time: advance(carry.time, segment.sleep_time)?,
        ..carry
    };
    let detail =
        SegmentDetail::assemble(split_details, segment.sleep_time, entry.time, entry.distance);
    Ok((detail, rested))
}

/// Simulate the course with the default even down-time calculator.
///
/// # Errors
///
/// Returns a validation error before any simulation work, or a
/// [`PlanError::NonPositiveSpeed`] met during the run. No partial detail is
/// returned.
pub fn compute_course_details(course: &Course) -> Result<CourseDetail, PlanError> {
    compute_course_details_with(course, &EvenDownTimeCalculator)
}

/// Simulate the course with a caller-supplied sub-split calculator.
///
/// # Errors
///
/// See [`compute_course_details`].
pub fn compute_course_details_with<C: SubSplitCalculator + ?Sized>(
    course: &Course,
    calculator: &C,
) -> Result<CourseDetail, PlanError> {
    course.validate()?;
    debug!(
        "simulating {} segments, {} splits, {:.2} total distance",
        course.segments.len(),
        course.split_count(),
        course.total_distance()
    );

    let (segment_details, carry) = course.segments.iter().enumerate().try_fold(
        (Vec::with_capacity(course.segments.len()), SimulationCarry::start(course)),
        |(mut details, carry), (segment_idx, segment)| {
            let (detail, next) = simulate_segment(course, segment_idx, segment, carry, calculator)?;
            details.push(detail);
            Ok::<_, PlanError>((details, next))
        },
    )?;

    Ok(CourseDetail::assemble(
        segment_details,
        course.start_time,
        carry.time,
    ))
}

fn advance(time: NaiveDateTime, by: TimeDelta) -> Result<NaiveDateTime, PlanError> {
    time.checked_add_signed(by).ok_or(PlanError::ClockOverflow)
}
