//! Sub-split breakdown of a single split.
use chrono::{NaiveDateTime, TimeDelta};

use crate::course::Split;
use crate::detail::{SubSplitDetail, pace_for};
use crate::error::PlanError;
use crate::numbers::{delta_to_hours, hours_to_delta, usize_to_f64};
use crate::sub_split::sub_splits_for;

/// Where and how a split starts, as seen by a sub-split calculator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubSplitContext {
    pub start_distance: f64,
    pub start_time: NaiveDateTime,
    /// Moving time already computed for the whole split.
    pub moving_time: TimeDelta,
    /// Down-time already allotted to the whole split.
    pub down_time: TimeDelta,
    /// Effective speed for the split, after any per-split override.
    pub moving_speed: f64,
}

/// Strategy turning a split into sub-split details.
///
/// Implementations must cover the split's distance, moving time and
/// down-time exactly; adjustment time is never passed down.
pub trait SubSplitCalculator {
    /// Compute the sub-split breakdown of `split`.
    ///
    /// # Errors
    ///
    /// Returns an error if the clock cannot be advanced.
    fn sub_split_details(
        &self,
        split: &Split,
        ctx: SubSplitContext,
    ) -> Result<Vec<SubSplitDetail>, PlanError>;
}

/// Spreads the split's down-time evenly over its chunks, regardless of
/// chunk length. The last chunk takes whatever rounding left over, so the
/// chunks end exactly where the split's down-time ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvenDownTimeCalculator;

impl SubSplitCalculator for EvenDownTimeCalculator {
    fn sub_split_details(
        &self,
        split: &Split,
        ctx: SubSplitContext,
    ) -> Result<Vec<SubSplitDetail>, PlanError> {
        let chunks = sub_splits_for(&split.sub_split_mode, split.distance);
        if chunks.is_empty() {
            return Ok(Vec::new());
        }
        let count = chunks.len();
        let share = hours_to_delta(delta_to_hours(ctx.down_time) / usize_to_f64(count));

        let mut start_time = ctx.start_time;
        let mut start_distance = ctx.start_distance;
        let mut moving_left = ctx.moving_time;
        let mut down_left = ctx.down_time;
        let mut details = Vec::with_capacity(count);
        for (idx, distance) in chunks.into_iter().enumerate() {
            let (moving_time, down_time) = if idx + 1 == count {
                (moving_left, down_left)
            } else {
                (hours_to_delta(distance / ctx.moving_speed), share)
            };
            moving_left = moving_left - moving_time;
            down_left = down_left - down_time;
            let total_time = moving_time + down_time;
            let end_time = start_time
                .checked_add_signed(total_time)
                .ok_or(PlanError::ClockOverflow)?;
            details.push(SubSplitDetail {
                distance,
                start_distance,
                start_time,
                end_time,
                moving_speed: ctx.moving_speed,
                moving_time,
                down_time,
                split_time: total_time,
                total_time,
                pace: pace_for(distance, total_time),
            });
            start_time = end_time;
            start_distance += distance;
        }
        Ok(details)
    }
}
