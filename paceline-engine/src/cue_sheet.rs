//! Cue sheet derived from a computed course: start, reached rest stops, finish.
use chrono::NaiveDateTime;
use serde::Serialize;

use crate::constants::CLOSED_HOURS;
use crate::detail::CourseDetail;

/// Kind of marker on a cue sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CueKind {
    Start,
    RestStop,
    OptionalRestStop,
    Finish,
}

impl CueKind {
    /// Legend order.
    pub const ALL: [Self; 4] = [
        Self::Start,
        Self::RestStop,
        Self::OptionalRestStop,
        Self::Finish,
    ];

    #[must_use]
    pub const fn glyph(self) -> &'static str {
        match self {
            Self::Start | Self::Finish => "🏁",
            Self::RestStop => "★",
            Self::OptionalRestStop => "☆",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Start => "Start",
            Self::RestStop => "Rest Stop",
            Self::OptionalRestStop => "Optional Rest Stop",
            Self::Finish => "Finish",
        }
    }
}

/// Glyph and description for every marker kind, in legend order.
#[must_use]
pub fn legend_entries() -> Vec<(&'static str, &'static str)> {
    CueKind::ALL
        .iter()
        .map(|kind| (kind.glyph(), kind.description()))
        .collect()
}

/// One rest stop as it appears on a cue sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestStopLine {
    /// Distance marker at the stop.
    pub mile_mark: f64,
    /// Distance since the previous stop, or since the start.
    pub distance_from_previous: f64,
    pub name: String,
    pub address: String,
    pub hours: String,
    pub eta: NaiveDateTime,
    pub optional: bool,
}

impl RestStopLine {
    #[must_use]
    pub const fn kind(&self) -> CueKind {
        if self.optional {
            CueKind::OptionalRestStop
        } else {
            CueKind::RestStop
        }
    }

    /// Legend glyph: filled star for planned stops, hollow for optional ones.
    #[must_use]
    pub const fn legend(&self) -> &'static str {
        self.kind().glyph()
    }
}

/// One marker of the full cue sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CueLine {
    pub kind: CueKind,
    pub mile_mark: f64,
    /// Distance since the previous marker.
    pub distance_from_previous: f64,
    pub name: String,
    /// Rest stops only.
    pub address: Option<String>,
    /// Rest stops only.
    pub hours: Option<String>,
    pub eta: NaiveDateTime,
}

impl CueLine {
    #[must_use]
    pub const fn legend(&self) -> &'static str {
        self.kind.glyph()
    }
}

impl From<RestStopLine> for CueLine {
    fn from(line: RestStopLine) -> Self {
        Self {
            kind: line.kind(),
            mile_mark: line.mile_mark,
            distance_from_previous: line.distance_from_previous,
            name: line.name,
            address: Some(line.address),
            hours: Some(line.hours),
            eta: line.eta,
        }
    }
}

impl CourseDetail {
    /// Every reached rest stop in course order.
    #[must_use]
    pub fn rest_stop_lines(&self) -> Vec<RestStopLine> {
        let mut previous_mark = 0.0;
        let mut lines = Vec::new();
        for split in self.split_details() {
            let Some(stop) = split.rest_stop.as_ref() else {
                continue;
            };
            let mile_mark = split.leg.end_distance();
            lines.push(RestStopLine {
                mile_mark,
                distance_from_previous: mile_mark - previous_mark,
                name: stop.name.clone(),
                address: stop.address.clone(),
                hours: stop.hours().unwrap_or(CLOSED_HOURS).to_string(),
                eta: split.leg.end_time,
                optional: stop.optional,
            });
            previous_mark = mile_mark;
        }
        lines
    }

    /// Start marker, every reached rest stop, then the finish at the last arrival.
    #[must_use]
    pub fn cue_sheet(&self) -> Vec<CueLine> {
        let mut lines = vec![CueLine {
            kind: CueKind::Start,
            mile_mark: 0.0,
            distance_from_previous: 0.0,
            name: CueKind::Start.description().to_string(),
            address: None,
            hours: None,
            eta: self.start_time,
        }];
        lines.extend(self.rest_stop_lines().into_iter().map(CueLine::from));

        let previous_mark = lines.last().map_or(0.0, |line| line.mile_mark);
        let arrival = self
            .split_details()
            .last()
            .map_or(self.end_time, |split| split.leg.end_time);
        lines.push(CueLine {
            kind: CueKind::Finish,
            mile_mark: self.distance,
            distance_from_previous: self.distance - previous_mark,
            name: CueKind::Finish.description().to_string(),
            address: None,
            hours: None,
            eta: arrival,
        });
        lines
    }
}
