//! Result records returned by the query engine.

use serde::{Deserialize, Serialize};

use super::sentinel::Reading;
use super::wind::Heading;

/// A station present in the store, with its display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationEntry {
    pub station: String,
    #[serde(rename = "stationName")]
    pub station_name: String,
}

/// A date for which a station has an observation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateEntry {
    pub date: String,
}

/// One observation with sentinel handling applied.
///
/// Missing measurements serialize as `"N/A"`; wind direction is a compass
/// sector label rather than degrees.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Observation {
    pub station: String,
    #[serde(rename = "stationName")]
    pub station_name: String,
    pub date: String,
    /// Air temperature (K).
    pub temperature: Reading<f64>,
    /// Sea-level pressure (Pa).
    pub pression_ocean: Reading<i64>,
    pub wind_direction: Reading<Heading>,
    /// Mean wind speed (m/s).
    pub wind_speed: Reading<f64>,
    /// Dew point (K).
    pub dew_point: Reading<f64>,
    /// Relative humidity (%).
    pub humidity: Reading<i64>,
    /// Horizontal visibility (m).
    pub horizontal_visibility: Reading<i64>,
    /// Total cloud cover (%).
    pub couldiness: Reading<f64>,
    pub min_temperature: Reading<f64>,
    pub max_temperature: Reading<f64>,
}
