//! Predicate vocabulary of the weather namespace.

use std::fmt;

/// Namespace shared by every observation predicate.
pub const NAMESPACE: &str = "http://example.org/weather#";

/// Local name of the station identifier predicate.
pub const STATION: &str = "station";

/// Local name of the observation date predicate.
pub const DATE: &str = "date";

/// Full IRI for a predicate local name.
#[must_use]
pub fn predicate_iri(local_name: &str) -> String {
    format!("{NAMESPACE}{local_name}")
}

/// The measured variables an observation may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Measurement {
    Temperature,
    PressionOcean,
    WindDirection,
    WindSpeed,
    DewPoint,
    Humidity,
    HorizontalVisibility,
    Couldiness,
    MinTemperature,
    MaxTemperature,
}

impl Measurement {
    /// Every measurement, in response order.
    pub const ALL: [Self; 10] = [
        Self::Temperature,
        Self::PressionOcean,
        Self::WindDirection,
        Self::WindSpeed,
        Self::DewPoint,
        Self::Humidity,
        Self::HorizontalVisibility,
        Self::Couldiness,
        Self::MinTemperature,
        Self::MaxTemperature,
    ];

    /// Predicate local name, also used as the binding variable and JSON key.
    #[must_use]
    pub const fn local_name(self) -> &'static str {
        match self {
            Self::Temperature => "temperature",
            Self::PressionOcean => "pression_ocean",
            Self::WindDirection => "wind_direction",
            Self::WindSpeed => "wind_speed",
            Self::DewPoint => "dew_point",
            Self::Humidity => "humidity",
            Self::HorizontalVisibility => "horizontal_visibility",
            Self::Couldiness => "couldiness",
            Self::MinTemperature => "min_temperature",
            Self::MaxTemperature => "max_temperature",
        }
    }

    /// Full predicate IRI.
    #[must_use]
    pub fn iri(self) -> String {
        predicate_iri(self.local_name())
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.local_name())
    }
}
