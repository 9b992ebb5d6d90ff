//! Centralized numeric constants for the paceline simulation.
//!
//! These values define the tolerances and unit conversions used by the
//! engine. Course-specific tuning lives in course files, not here.

// Time units ---------------------------------------------------------------
pub(crate) const MICROS_PER_HOUR: f64 = 3_600_000_000.0;
pub(crate) const HOURS_PER_DAY: f64 = 24.0;

// Distance tolerances ------------------------------------------------------
/// Remainders shorter than this are treated as zero when chunking a split.
pub(crate) const CHUNK_REMAINDER_EPSILON: f64 = 1e-9;
/// Relative tolerance applied when checking custom chunk sums.
pub(crate) const CUSTOM_SUM_TOLERANCE: f64 = 1e-6;

// Rest stops ---------------------------------------------------------------
/// Hours string reported when a rest stop has no hours for the arrival day.
pub const CLOSED_HOURS: &str = "CLOSED";

// Defaults -----------------------------------------------------------------
pub(crate) const DEFAULT_SUB_SPLIT_COUNT: u32 = 1;
pub(crate) const DEFAULT_NO_END_DOWN_TIME: bool = true;
