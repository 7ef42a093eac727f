//! Sentinel handling and typed value accessors.
//!
//! A stored value of `"mq"` and an unbound variable both mean "not measured".
//! The accessors below fold both into [`Reading::Missing`], and a value that
//! fails to parse as the field's type is treated the same way.

use serde::{Serialize, Serializer};

/// Stored token meaning "measure unavailable".
pub const SENTINEL: &str = "mq";

/// Marker serialized in place of a missing reading.
pub const MISSING_MARKER: &str = "N/A";

/// A measurement value, or the missing marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reading<T> {
    Value(T),
    Missing,
}

impl<T> Reading<T> {
    /// Whether the reading is the missing marker.
    #[must_use]
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

impl<T> From<Option<T>> for Reading<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Missing, Self::Value)
    }
}

impl<T: Serialize> Serialize for Reading<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Value(value) => value.serialize(serializer),
            Self::Missing => serializer.serialize_str(MISSING_MARKER),
        }
    }
}

/// Fold the sentinel token and absence into `None`.
#[must_use]
pub fn resolve(raw: Option<&str>) -> Option<&str> {
    raw.filter(|value| *value != SENTINEL)
}

/// Read a decimal field.
#[must_use]
pub fn as_number(field: &str, raw: Option<&str>) -> Reading<f64> {
    let Some(value) = resolve(raw) else {
        return Reading::Missing;
    };
    match value.trim().parse::<f64>() {
        Ok(number) if number.is_finite() => Reading::Value(number),
        _ => malformed(field, value),
    }
}

/// Read an integer field.
///
/// Integral decimals such as `"87.0"` are accepted.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn as_integer(field: &str, raw: Option<&str>) -> Reading<i64> {
    let Some(value) = resolve(raw) else {
        return Reading::Missing;
    };
    let trimmed = value.trim();
    if let Ok(number) = trimmed.parse::<i64>() {
        return Reading::Value(number);
    }
    match trimmed.parse::<f64>() {
        Ok(number)
            if number.is_finite()
                && number.fract() == 0.0
                && number.abs() < 9_007_199_254_740_992.0 =>
        {
            Reading::Value(number as i64)
        }
        _ => malformed(field, value),
    }
}

/// Read a text field.
#[must_use]
pub fn as_text(raw: Option<&str>) -> Reading<String> {
    resolve(raw).map(str::to_string).into()
}

fn malformed<T>(field: &str, value: &str) -> Reading<T> {
    tracing::debug!(
        field = field,
        value = value,
        "Malformed measurement value, substituting missing marker"
    );
    Reading::Missing
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_folds_sentinel_and_absence() {
        assert_eq!(resolve(Some("mq")), None);
        assert_eq!(resolve(None), None);
        assert_eq!(resolve(Some("278.35")), Some("278.35"));
        // Only the exact token is a sentinel.
        assert_eq!(resolve(Some("MQ")), Some("MQ"));
    }

    #[test]
    fn test_as_number() {
        assert_eq!(as_number("temperature", Some("278.35")), Reading::Value(278.35));
        assert_eq!(as_number("temperature", Some(" -2.5 ")), Reading::Value(-2.5));
        assert_eq!(as_number("temperature", Some("mq")), Reading::Missing);
        assert_eq!(as_number("temperature", None), Reading::Missing);
        assert_eq!(as_number("temperature", Some("warm")), Reading::Missing);
        assert_eq!(as_number("temperature", Some("NaN")), Reading::Missing);
    }

    #[test]
    fn test_as_integer() {
        assert_eq!(as_integer("humidity", Some("87")), Reading::Value(87));
        assert_eq!(as_integer("humidity", Some("87.0")), Reading::Value(87));
        assert_eq!(as_integer("humidity", Some("87.5")), Reading::Missing);
        assert_eq!(as_integer("humidity", Some("mq")), Reading::Missing);
        assert_eq!(as_integer("humidity", Some("")), Reading::Missing);
    }

    #[test]
    fn test_as_text() {
        assert_eq!(as_text(Some("20241113")), Reading::Value("20241113".to_string()));
        assert_eq!(as_text(Some("mq")), Reading::Missing);
        assert_eq!(as_text(None), Reading::Missing);
    }

    #[test]
    fn test_reading_serialization() {
        assert_eq!(serde_json::to_string(&Reading::Value(278.35)).unwrap(), "278.35");
        assert_eq!(serde_json::to_string(&Reading::Value(87_i64)).unwrap(), "87");
        assert_eq!(
            serde_json::to_string(&Reading::<f64>::Missing).unwrap(),
            "\"N/A\""
        );
    }

    #[test]
    fn test_reading_helpers() {
        assert!(!Reading::Value(3).is_missing());
        assert_eq!(Reading::from(Some(3)), Reading::Value(3));
        assert!(Reading::<i32>::from(None).is_missing());
    }
}
