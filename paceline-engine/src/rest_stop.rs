//! Rest stops and their weekday opening hours.
use chrono::{Datelike, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::constants::CLOSED_HOURS;
use crate::error::PlanError;

/// Opening-hours policy for a rest stop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OpenHours {
    /// One optional hours string per weekday; `None` means closed.
    Weekly {
        #[serde(default)]
        mon: Option<String>,
        #[serde(default)]
        tue: Option<String>,
        #[serde(default)]
        wed: Option<String>,
        #[serde(default)]
        thu: Option<String>,
        #[serde(default)]
        fri: Option<String>,
        #[serde(default)]
        sat: Option<String>,
        #[serde(default)]
        sun: Option<String>,
    },
    /// The same hours every day of the week.
    Fixed { hours: String },
}

impl OpenHours {
    /// Weekly hours with every day closed.
    #[must_use]
    pub const fn closed() -> Self {
        Self::Weekly {
            mon: None,
            tue: None,
            wed: None,
            thu: None,
            fri: None,
            sat: None,
            sun: None,
        }
    }

    #[must_use]
    pub fn fixed(hours: impl Into<String>) -> Self {
        Self::Fixed {
            hours: hours.into(),
        }
    }
}

/// Hours string for `weekday`, or `None` when closed.
#[must_use]
pub fn open_hours_for(policy: &OpenHours, weekday: Weekday) -> Option<&str> {
    match policy {
        OpenHours::Fixed { hours } => Some(hours.as_str()),
        OpenHours::Weekly {
            mon,
            tue,
            wed,
            thu,
            fri,
            sat,
            sun,
        } => {
            let day = match weekday {
                Weekday::Mon => mon,
                Weekday::Tue => tue,
                Weekday::Wed => wed,
                Weekday::Thu => thu,
                Weekday::Fri => fri,
                Weekday::Sat => sat,
                Weekday::Sun => sun,
            };
            day.as_deref()
        }
    }
}

/// A point of interest reached at the end of a split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestStop {
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub alt: Option<String>,
    pub open_hours: OpenHours,
    /// Marks a stop the rider may skip.
    #[serde(default)]
    pub optional: bool,
    #[serde(skip_deserializing)]
    arrival_date: Option<NaiveDateTime>,
}

impl RestStop {
    #[must_use]
    pub fn new(name: impl Into<String>, address: impl Into<String>, open_hours: OpenHours) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            alt: None,
            open_hours,
            optional: false,
            arrival_date: None,
        }
    }

    #[must_use]
    pub fn with_alt(mut self, alt: impl Into<String>) -> Self {
        self.alt = Some(alt.into());
        self
    }

    #[must_use]
    pub const fn with_optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    /// Copy of this stop stamped with the engine-computed arrival time.
    #[must_use]
    pub(crate) fn arrived_at(&self, arrival: NaiveDateTime) -> Self {
        Self {
            arrival_date: Some(arrival),
            ..self.clone()
        }
    }

    #[must_use]
    pub const fn arrival_date(&self) -> Option<NaiveDateTime> {
        self.arrival_date
    }

    /// Opening hours on the arrival weekday, or [`CLOSED_HOURS`].
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::UnsetArrival`] when the stop has not been reached
    /// by a simulation yet.
    pub fn hours(&self) -> Result<&str, PlanError> {
        let arrival = self.arrival_date.ok_or_else(|| PlanError::UnsetArrival {
            name: self.name.clone(),
        })?;
        Ok(open_hours_for(&self.open_hours, arrival.weekday()).unwrap_or(CLOSED_HOURS))
    }
}
