//! Course input model: a course of segments, each a run of splits.
use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_NO_END_DOWN_TIME;
use crate::error::PlanError;
use crate::numbers::delta_to_hours;
use crate::rest_stop::RestStop;
use crate::sub_split::{ModeViolation, SubSplitMode};

const SAMPLE_COURSE_DATA: &str = include_str!("../data/sample_course.json");

/// Top-level planning input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub segments: Vec<Segment>,
    pub init_moving_speed: f64,
    /// Floor for speed decay.
    pub min_moving_speed: f64,
    #[serde(default)]
    pub down_time_ratio: f64,
    /// Speed lost after every split.
    #[serde(default)]
    pub split_decay: f64,
    pub start_time: NaiveDateTime,
}

/// One leg of the course, typically a day, followed by `sleep_time`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub splits: Vec<Split>,
    #[serde(default)]
    pub down_time_ratio: Option<f64>,
    #[serde(default)]
    pub split_decay: Option<f64>,
    /// Resets the running speed on entry.
    #[serde(default)]
    pub moving_speed: Option<f64>,
    #[serde(default)]
    pub min_moving_speed: Option<f64>,
    #[serde(default = "TimeDelta::zero", with = "crate::serde_hours")]
    pub sleep_time: TimeDelta,
    /// Drops down-time on the last split since a rest follows anyway.
    #[serde(default = "Segment::default_no_end_down_time")]
    pub no_end_down_time: bool,
}

/// Atomic distance chunk between two control points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Split {
    pub distance: f64,
    #[serde(default)]
    pub sub_split_mode: SubSplitMode,
    #[serde(default)]
    pub rest_stop: Option<RestStop>,
    /// Fixed down-time; wins over any ratio.
    #[serde(default, with = "crate::serde_hours::option")]
    pub down_time: Option<TimeDelta>,
    /// Speed for this split only.
    #[serde(default)]
    pub moving_speed: Option<f64>,
    /// Extra time after moving and down-time, e.g. a ferry wait.
    #[serde(default = "TimeDelta::zero", with = "crate::serde_hours")]
    pub adjusted_time: TimeDelta,
}

impl Course {
    #[must_use]
    pub const fn new(
        segments: Vec<Segment>,
        init_moving_speed: f64,
        min_moving_speed: f64,
        start_time: NaiveDateTime,
    ) -> Self {
        Self {
            segments,
            init_moving_speed,
            min_moving_speed,
            down_time_ratio: 0.0,
            split_decay: 0.0,
            start_time,
        }
    }

    #[must_use]
    pub const fn with_down_time_ratio(mut self, ratio: f64) -> Self {
        self.down_time_ratio = ratio;
        self
    }

    #[must_use]
    pub const fn with_split_decay(mut self, decay: f64) -> Self {
        self.split_decay = decay;
        self
    }

    /// Load a course from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into a course.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The bundled two-day sample course.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled data fails to parse.
    pub fn sample() -> Result<Self, serde_json::Error> {
        Self::from_json(SAMPLE_COURSE_DATA)
    }

    #[must_use]
    pub fn total_distance(&self) -> f64 {
        self.segments.iter().map(Segment::distance).sum()
    }

    #[must_use]
    pub fn split_count(&self) -> usize {
        self.segments.iter().map(|s| s.splits.len()).sum()
    }

    /// Check every precondition the simulation relies on.
    ///
    /// # Errors
    ///
    /// Returns the first violation found, in course order.
    pub fn validate(&self) -> Result<(), PlanError> {
        if self.segments.is_empty() {
            return Err(PlanError::EmptyCourse);
        }
        check_non_negative("course.down_time_ratio", self.down_time_ratio)?;
        check_non_negative("course.split_decay", self.split_decay)?;
        for (segment_idx, segment) in self.segments.iter().enumerate() {
            segment.validate(segment_idx)?;
        }
        Ok(())
    }
}

impl Segment {
    #[must_use]
    pub fn new(splits: Vec<Split>) -> Self {
        Self {
            splits,
            down_time_ratio: None,
            split_decay: None,
            moving_speed: None,
            min_moving_speed: None,
            sleep_time: TimeDelta::zero(),
            no_end_down_time: Self::default_no_end_down_time(),
        }
    }

    const fn default_no_end_down_time() -> bool {
        DEFAULT_NO_END_DOWN_TIME
    }

    #[must_use]
    pub const fn with_sleep_time(mut self, sleep_time: TimeDelta) -> Self {
        self.sleep_time = sleep_time;
        self
    }

    #[must_use]
    pub const fn with_no_end_down_time(mut self, enabled: bool) -> Self {
        self.no_end_down_time = enabled;
        self
    }

    #[must_use]
    pub const fn with_moving_speed(mut self, speed: f64) -> Self {
        self.moving_speed = Some(speed);
        self
    }

    #[must_use]
    pub const fn with_min_moving_speed(mut self, speed: f64) -> Self {
        self.min_moving_speed = Some(speed);
        self
    }

    #[must_use]
    pub const fn with_down_time_ratio(mut self, ratio: f64) -> Self {
        self.down_time_ratio = Some(ratio);
        self
    }

    #[must_use]
    pub const fn with_split_decay(mut self, decay: f64) -> Self {
        self.split_decay = Some(decay);
        self
    }

    #[must_use]
    pub fn distance(&self) -> f64 {
        self.splits.iter().map(|s| s.distance).sum()
    }

    fn validate(&self, segment: usize) -> Result<(), PlanError> {
        if self.splits.is_empty() {
            return Err(PlanError::EmptySegment { segment });
        }
        if let Some(ratio) = self.down_time_ratio {
            check_non_negative("segment.down_time_ratio", ratio)?;
        }
        if let Some(decay) = self.split_decay {
            check_non_negative("segment.split_decay", decay)?;
        }
        check_duration(segment, None, "sleep_time", self.sleep_time)?;
        for (split_idx, split) in self.splits.iter().enumerate() {
            split.validate(segment, split_idx)?;
        }
        Ok(())
    }
}

impl Split {
    #[must_use]
    pub fn new(distance: f64, sub_split_mode: SubSplitMode) -> Self {
        Self {
            distance,
            sub_split_mode,
            rest_stop: None,
            down_time: None,
            moving_speed: None,
            adjusted_time: TimeDelta::zero(),
        }
    }

    #[must_use]
    pub fn with_rest_stop(mut self, rest_stop: RestStop) -> Self {
        self.rest_stop = Some(rest_stop);
        self
    }

    #[must_use]
    pub const fn with_down_time(mut self, down_time: TimeDelta) -> Self {
        self.down_time = Some(down_time);
        self
    }

    #[must_use]
    pub const fn with_moving_speed(mut self, speed: f64) -> Self {
        self.moving_speed = Some(speed);
        self
    }

    #[must_use]
    pub const fn with_adjusted_time(mut self, adjusted_time: TimeDelta) -> Self {
        self.adjusted_time = adjusted_time;
        self
    }

    fn validate(&self, segment: usize, split: usize) -> Result<(), PlanError> {
        if !self.distance.is_finite() || self.distance <= 0.0 {
            return Err(PlanError::InvalidSplitDistance {
                segment,
                split,
                distance: self.distance,
            });
        }
        if let Some(down_time) = self.down_time {
            check_duration(segment, Some(split), "down_time", down_time)?;
        }
        check_duration(segment, Some(split), "adjusted_time", self.adjusted_time)?;
        self.sub_split_mode
            .validate(self.distance)
            .map_err(|violation| match violation {
                ModeViolation::Invalid(reason) => PlanError::InvalidSubSplitMode {
                    segment,
                    split,
                    reason,
                },
                ModeViolation::SumMismatch { expected, actual } => {
                    PlanError::CustomDistanceMismatch {
                        segment,
                        split,
                        expected,
                        actual,
                    }
                }
            })
    }
}

fn check_non_negative(field: &'static str, value: f64) -> Result<(), PlanError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(PlanError::InvalidRatio { field, value })
    }
}

fn check_duration(
    segment: usize,
    split: Option<usize>,
    field: &'static str,
    value: TimeDelta,
) -> Result<(), PlanError> {
    if value < TimeDelta::zero() {
        return Err(PlanError::InvalidDuration {
            segment,
            split,
            field,
            hours: delta_to_hours(value),
        });
    }
    Ok(())
}
