//! Serde adapters storing `TimeDelta` values as decimal hours.

use chrono::TimeDelta;
use serde::{Deserialize, Deserializer, Serializer};

use crate::numbers::{delta_to_hours, hours_to_delta};

/// `#[serde(with = "crate::serde_hours")]` for plain durations.
///
/// # Errors
///
/// Propagates serializer errors.
pub fn serialize<S>(delta: &TimeDelta, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_f64(delta_to_hours(*delta))
}

/// # Errors
///
/// Returns an error if the value is not a number.
pub fn deserialize<'de, D>(deserializer: D) -> Result<TimeDelta, D::Error>
where
    D: Deserializer<'de>,
{
    let hours = f64::deserialize(deserializer)?;
    Ok(hours_to_delta(hours))
}

/// `#[serde(with = "crate::serde_hours::option")]` for optional durations.
pub mod option {
    use super::{Deserialize, Deserializer, Serializer, TimeDelta, delta_to_hours, hours_to_delta};

    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S>(delta: &Option<TimeDelta>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match delta {
            Some(value) => serializer.serialize_some(&delta_to_hours(*value)),
            None => serializer.serialize_none(),
        }
    }

    /// # Errors
    ///
    /// Returns an error if the value is neither null nor a number.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<TimeDelta>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hours = Option::<f64>::deserialize(deserializer)?;
        Ok(hours.map(hours_to_delta))
    }
}
