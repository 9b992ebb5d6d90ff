use std::collections::HashMap;

use paceline_engine::numbers::delta_to_hours;
use paceline_engine::{CLOSED_HOURS, RestStop, SplitDetail, SubSplitDetail};
use thiserror::Error;

use crate::util::{pretty_clock, pretty_duration, pretty_span};

/// Column separator for console tables.
pub const SPACER: &str = " │ ";

/// A report column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Distance,
    Span,
    MovingSpeed,
    MovingTime,
    DownTime,
    Pace,
    StartTime,
    SplitTime,
    AdjustmentTime,
    AdjustmentStart,
    TotalTime,
    EndTime,
    StopName,
    StopHours,
    StopAddress,
    StopAlt,
}

/// How a cell value is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellStyle {
    /// Human-readable: pretty durations and 12-hour clock times.
    Display,
    /// Machine-readable: decimal hours and ISO timestamps.
    Machine,
}

/// A table row: either a whole split or one of its sub-splits.
#[derive(Debug, Clone, Copy)]
pub enum Row<'a> {
    Split(&'a SplitDetail),
    SubSplit(&'a SubSplitDetail),
}

impl<'a> Row<'a> {
    const fn leg(self) -> &'a SubSplitDetail {
        match self {
            Self::Split(split) => &split.leg,
            Self::SubSplit(leg) => leg,
        }
    }

    fn rest_stop(self) -> Option<&'a RestStop> {
        match self {
            Self::Split(split) => split.rest_stop.as_ref(),
            Self::SubSplit(_) => None,
        }
    }
}

impl Field {
    pub const ALL: [Self; 16] = [
        Self::Distance,
        Self::Span,
        Self::MovingSpeed,
        Self::MovingTime,
        Self::DownTime,
        Self::Pace,
        Self::StartTime,
        Self::SplitTime,
        Self::AdjustmentTime,
        Self::AdjustmentStart,
        Self::TotalTime,
        Self::EndTime,
        Self::StopName,
        Self::StopHours,
        Self::StopAddress,
        Self::StopAlt,
    ];

    pub const fn key(self) -> &'static str {
        match self {
            Self::Distance => "distance",
            Self::Span => "span",
            Self::MovingSpeed => "moving_speed",
            Self::MovingTime => "moving_time",
            Self::DownTime => "down_time",
            Self::Pace => "pace",
            Self::StartTime => "start_time",
            Self::SplitTime => "split_time",
            Self::AdjustmentTime => "adjustment_time",
            Self::AdjustmentStart => "adjustment_start",
            Self::TotalTime => "total_time",
            Self::EndTime => "end_time",
            Self::StopName => "name",
            Self::StopHours => "hours",
            Self::StopAddress => "address",
            Self::StopAlt => "alt",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Distance => "Distance",
            Self::Span => "  Start,     End",
            Self::MovingSpeed => "Moving Speed",
            Self::MovingTime => "Moving Time",
            Self::DownTime => "Down Time",
            Self::Pace => "Pace",
            Self::StartTime => "Start Time",
            Self::SplitTime => "Split Time",
            Self::AdjustmentTime => "Adjustment Time",
            Self::AdjustmentStart => "Adjustment Start",
            Self::TotalTime => "Total Time",
            Self::EndTime => "End Time",
            Self::StopName => "Rest Stop Name",
            Self::StopHours => "Rest Stop Hours",
            Self::StopAddress => "Rest Stop Address",
            Self::StopAlt => "Alternate URL",
        }
    }

    pub const fn width(self) -> usize {
        match self {
            Self::Distance => 8,
            Self::Span => 16,
            Self::MovingSpeed => 12,
            Self::Pace => 6,
            Self::MovingTime
            | Self::DownTime
            | Self::SplitTime
            | Self::AdjustmentTime
            | Self::TotalTime => 19,
            Self::StartTime | Self::AdjustmentStart | Self::EndTime => 17,
            Self::StopName => 20,
            Self::StopHours => 15,
            Self::StopAddress => 40,
            Self::StopAlt => 50,
        }
    }

    pub const fn is_stop(self) -> bool {
        matches!(
            self,
            Self::StopName | Self::StopHours | Self::StopAddress | Self::StopAlt
        )
    }

    pub const fn left_aligned(self) -> bool {
        matches!(self, Self::StopName | Self::StopAlt)
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.key() == key)
    }

    /// Unpadded cell text for `row`. Cells that do not apply to the row are empty.
    pub fn cell(self, row: Row<'_>, style: CellStyle) -> String {
        let leg = row.leg();
        let duration = |delta| match style {
            CellStyle::Display => pretty_duration(delta),
            CellStyle::Machine => format!("{:.6}", delta_to_hours(delta)),
        };
        let clock = |time| match style {
            CellStyle::Display => pretty_clock(time),
            CellStyle::Machine => format!("{time:?}"),
        };
        match self {
            Self::Distance => format!("{:.2}", leg.distance),
            Self::Span => match style {
                CellStyle::Display => pretty_span(leg.span()),
                CellStyle::Machine => {
                    let (start, end) = leg.span();
                    format!("{start:.2}-{end:.2}")
                }
            },
            Self::MovingSpeed => format!("{:.2}", leg.moving_speed),
            Self::MovingTime => duration(leg.moving_time),
            Self::DownTime => duration(leg.down_time),
            Self::Pace => format!("{:.2}", leg.pace),
            Self::StartTime => clock(leg.start_time),
            Self::SplitTime => duration(leg.split_time),
            Self::TotalTime => duration(leg.total_time),
            Self::EndTime => clock(leg.end_time),
            Self::AdjustmentTime => match row {
                Row::Split(split) => duration(split.adjustment_time),
                Row::SubSplit(_) => String::new(),
            },
            Self::AdjustmentStart => match row {
                Row::Split(split) => clock(split.adjustment_start),
                Row::SubSplit(_) => String::new(),
            },
            Self::StopName => row.rest_stop().map(|s| s.name.clone()).unwrap_or_default(),
            Self::StopHours => row
                .rest_stop()
                .map(|s| s.hours().unwrap_or(CLOSED_HOURS).to_string())
                .unwrap_or_default(),
            Self::StopAddress => row
                .rest_stop()
                .map(|s| s.address.clone())
                .unwrap_or_default(),
            Self::StopAlt => row
                .rest_stop()
                .and_then(|s| s.alt.clone())
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FieldError {
    #[error("unknown field '{0}' (see --list-fields)")]
    UnknownField(String),
    #[error("rename '{0}' must look like key=Label")]
    MalformedRename(String),
}

/// Columns chosen for a report, in display order, with any header overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSelection {
    fields: Vec<Field>,
    renames: HashMap<Field, String>,
}

impl FieldSelection {
    /// Build a selection from `--exclude` keys and `--rename key=Label` pairs.
    pub fn new(
        excluded: &[String],
        renames: &[String],
        include_stops: bool,
    ) -> Result<Self, FieldError> {
        let excluded = excluded
            .iter()
            .map(|key| Field::from_key(key).ok_or_else(|| FieldError::UnknownField(key.clone())))
            .collect::<Result<Vec<_>, _>>()?;
        let renames = renames
            .iter()
            .map(|pair| parse_rename(pair))
            .collect::<Result<HashMap<_, _>, _>>()?;
        let fields = Field::ALL
            .into_iter()
            .filter(|field| include_stops || !field.is_stop())
            .filter(|field| !excluded.contains(field))
            .collect();
        Ok(Self { fields, renames })
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn header(&self, field: Field) -> &str {
        self.renames
            .get(&field)
            .map_or_else(|| field.label(), String::as_str)
    }

    /// Table width including spacers.
    pub fn table_width(&self) -> usize {
        let columns: usize = self.fields.iter().map(|f| self.column_width(*f)).sum();
        columns + SPACER.chars().count() * self.fields.len().saturating_sub(1)
    }

    pub fn column_width(&self, field: Field) -> usize {
        field.width().max(self.header(field).chars().count())
    }
}

fn parse_rename(pair: &str) -> Result<(Field, String), FieldError> {
    let (key, label) = pair
        .split_once('=')
        .ok_or_else(|| FieldError::MalformedRename(pair.to_string()))?;
    let key = key.trim();
    let label = label.trim();
    if label.is_empty() {
        return Err(FieldError::MalformedRename(pair.to_string()));
    }
    let field = Field::from_key(key).ok_or_else(|| FieldError::UnknownField(key.to_string()))?;
    Ok((field, label.to_string()))
}
