use chrono::{NaiveDateTime, TimeDelta};
use paceline_engine::numbers::i64_to_f64;

const MICROS_PER_SECOND: i64 = 1_000_000;
const MICROS_PER_MINUTE: i64 = 60 * MICROS_PER_SECOND;
const MICROS_PER_HOUR: i64 = 60 * MICROS_PER_MINUTE;
const MICROS_PER_DAY: i64 = 24 * MICROS_PER_HOUR;

/// Clock format used in report cells, e.g. `12/13 08:00:00 AM`.
pub const CLOCK_FORMAT: &str = "%m/%d %I:%M:%S %p";

pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

/// Render a duration as ` Dd HHh MMm SS.SSs`, with a leading `-` when negative.
pub fn pretty_duration(delta: TimeDelta) -> String {
    let micros = delta.num_microseconds().unwrap_or(i64::MAX);
    let sign = if micros < 0 { '-' } else { ' ' };
    let micros = micros.checked_abs().unwrap_or(i64::MAX);

    let days = micros / MICROS_PER_DAY;
    let hours = (micros % MICROS_PER_DAY) / MICROS_PER_HOUR;
    let minutes = (micros % MICROS_PER_HOUR) / MICROS_PER_MINUTE;
    let seconds = i64_to_f64(micros % MICROS_PER_MINUTE) / i64_to_f64(MICROS_PER_SECOND);
    format!("{sign}{days:2}d {hours:2}h {minutes:2}m {seconds:5.2}s")
}

/// Start and end distance markers, right-aligned.
pub fn pretty_span((start, end): (f64, f64)) -> String {
    format!("{start:7.2}, {end:7.2}")
}

pub fn pretty_clock(time: NaiveDateTime) -> String {
    time.format(CLOCK_FORMAT).to_string()
}
