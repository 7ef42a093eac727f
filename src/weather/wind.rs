//! Wind direction bucketing into sixteen compass sectors.

use serde::{Serialize, Serializer};

use super::sentinel::{resolve, Reading};

/// Label for a bearing that parses but lies outside the compass.
pub const UNKNOWN_DIRECTION: &str = "Unknown";

/// One of the sixteen 22.5° compass sectors, centered on its point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CompassPoint {
    N,
    NNE,
    NE,
    ENE,
    E,
    ESE,
    SE,
    SSE,
    S,
    SSW,
    SW,
    WSW,
    W,
    WNW,
    NW,
    NNW,
}

impl CompassPoint {
    /// Sectors clockwise from north.
    pub const ALL: [Self; 16] = [
        Self::N,
        Self::NNE,
        Self::NE,
        Self::ENE,
        Self::E,
        Self::ESE,
        Self::SE,
        Self::SSE,
        Self::S,
        Self::SSW,
        Self::SW,
        Self::WSW,
        Self::W,
        Self::WNW,
        Self::NW,
        Self::NNW,
    ];

    /// Short label, e.g. `"NNE"`.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::N => "N",
            Self::NNE => "NNE",
            Self::NE => "NE",
            Self::ENE => "ENE",
            Self::E => "E",
            Self::ESE => "ESE",
            Self::SE => "SE",
            Self::SSE => "SSE",
            Self::S => "S",
            Self::SSW => "SSW",
            Self::SW => "SW",
            Self::WSW => "WSW",
            Self::W => "W",
            Self::WNW => "WNW",
            Self::NW => "NW",
            Self::NNW => "NNW",
        }
    }
}

/// A classified bearing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Heading {
    Point(CompassPoint),
    /// The value was a number, but not a compass bearing.
    Unknown,
}

impl Heading {
    /// Label written to responses.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Point(point) => point.label(),
            Self::Unknown => UNKNOWN_DIRECTION,
        }
    }
}

impl Serialize for Heading {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Bucket an integer bearing in degrees.
///
/// Sector `k` covers `[22.5k - 11.25, 22.5k + 11.25)`; north wraps across 0.
/// 360 is north. Anything below 0 or above 360 is [`Heading::Unknown`].
#[must_use]
pub fn heading_for_degrees(degrees: i64) -> Heading {
    if !(0..=360).contains(&degrees) {
        return Heading::Unknown;
    }
    // floor((d + 11.25) / 22.5) in integer arithmetic, scaled by 4.
    let sector = ((degrees * 4 + 45) / 90) % 16;
    usize::try_from(sector).map_or(Heading::Unknown, |index| {
        Heading::Point(CompassPoint::ALL[index])
    })
}

/// Classify a raw stored wind direction.
///
/// Sentinel, absent and non-integer values are missing; this never fails.
#[must_use]
pub fn classify(raw: Option<&str>) -> Reading<Heading> {
    let Some(value) = resolve(raw) else {
        return Reading::Missing;
    };
    match value.trim().parse::<i64>() {
        Ok(degrees) => Reading::Value(heading_for_degrees(degrees)),
        Err(_) => {
            tracing::debug!(value = value, "Unparseable wind direction");
            Reading::Missing
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(degrees: i64) -> &'static str {
        heading_for_degrees(degrees).label()
    }

    #[test]
    fn test_cardinal_points() {
        assert_eq!(label(0), "N");
        assert_eq!(label(90), "E");
        assert_eq!(label(180), "S");
        assert_eq!(label(270), "W");
    }

    #[test]
    fn test_north_wraps() {
        assert_eq!(label(359), "N");
        assert_eq!(label(349), "N");
        assert_eq!(label(360), "N");
        assert_eq!(label(11), "N");
    }

    #[test]
    fn test_sector_boundaries() {
        // Lower bounds are inclusive at x.25 / x.75, so integers land on either side.
        assert_eq!(label(12), "NNE");
        assert_eq!(label(33), "NNE");
        assert_eq!(label(34), "NE");
        assert_eq!(label(56), "NE");
        assert_eq!(label(57), "ENE");
        assert_eq!(label(101), "E");
        assert_eq!(label(102), "ESE");
        assert_eq!(label(191), "S");
        assert_eq!(label(192), "SSW");
        assert_eq!(label(326), "NW");
        assert_eq!(label(327), "NNW");
        assert_eq!(label(348), "NNW");
    }

    #[test]
    fn test_every_sector_reachable() {
        for (index, point) in CompassPoint::ALL.iter().enumerate() {
            let center = i64::try_from(index).unwrap() * 45 / 2;
            assert_eq!(heading_for_degrees(center), Heading::Point(*point));
        }
    }

    #[test]
    fn test_out_of_range_is_unknown() {
        assert_eq!(heading_for_degrees(-1), Heading::Unknown);
        assert_eq!(heading_for_degrees(361), Heading::Unknown);
        assert_eq!(heading_for_degrees(720), Heading::Unknown);
    }

    #[test]
    fn test_classify_raw_values() {
        assert_eq!(classify(Some("180")), Reading::Value(Heading::Point(CompassPoint::S)));
        assert_eq!(classify(Some("mq")), Reading::Missing);
        assert_eq!(classify(None), Reading::Missing);
        assert_eq!(classify(Some("north-ish")), Reading::Missing);
        assert_eq!(classify(Some("12.5")), Reading::Missing);
        assert_eq!(classify(Some("400")), Reading::Value(Heading::Unknown));
    }

    #[test]
    fn test_heading_serialization() {
        let json = serde_json::to_string(&Heading::Point(CompassPoint::WSW)).unwrap();
        assert_eq!(json, "\"WSW\"");
        let json = serde_json::to_string(&Reading::Value(Heading::Unknown)).unwrap();
        assert_eq!(json, "\"Unknown\"");
        let json = serde_json::to_string(&Reading::<Heading>::Missing).unwrap();
        assert_eq!(json, "\"N/A\"");
    }
}
