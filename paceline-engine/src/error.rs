use thiserror::Error;

/// Errors raised when a course cannot be planned.
///
/// Segment and split positions are zero-based indices into the course.
#[derive(Debug, Error, PartialEq)]
pub enum PlanError {
    #[error("course has no segments")]
    EmptyCourse,
    #[error("segment {segment} has no splits")]
    EmptySegment { segment: usize },
    #[error("segment {segment} split {split}: distance must be positive (got {distance:.3})")]
    InvalidSplitDistance {
        segment: usize,
        split: usize,
        distance: f64,
    },
    #[error("{field} must be a finite, non-negative value (got {value:.3})")]
    InvalidRatio { field: &'static str, value: f64 },
    #[error(
        "segment {segment}{}: {field} must not be negative (got {hours:.3} h)",
        .split.map(|split| format!(" split {split}")).unwrap_or_default()
    )]
    InvalidDuration {
        segment: usize,
        split: Option<usize>,
        field: &'static str,
        hours: f64,
    },
    #[error("segment {segment} split {split}: invalid sub-split mode ({reason})")]
    InvalidSubSplitMode {
        segment: usize,
        split: usize,
        reason: &'static str,
    },
    #[error(
        "segment {segment} split {split}: custom sub-splits sum to {actual:.3}, expected {expected:.3}"
    )]
    CustomDistanceMismatch {
        segment: usize,
        split: usize,
        expected: f64,
        actual: f64,
    },
    #[error("segment {segment} split {split}: moving speed must be positive (got {speed:.3})")]
    NonPositiveSpeed {
        segment: usize,
        split: usize,
        speed: f64,
    },
    #[error("arrival date is not set for rest stop '{name}'")]
    UnsetArrival { name: String },
    #[error("simulation clock overflowed")]
    ClockOverflow,
}
