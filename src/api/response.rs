//! Response bodies that are not query results.

use serde::{Deserialize, Serialize};

/// Body returned for every failed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    /// Create an error body.
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Response for GET /api/health.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    /// Number of triples in the store.
    pub triples: u64,
}

impl HealthResponse {
    /// A healthy response.
    #[must_use]
    pub fn ok(triples: u64) -> Self {
        Self {
            status: "ok".to_string(),
            triples,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_body_shape() {
        let json = serde_json::to_string(&ErrorBody::new("No station has been found")).unwrap();
        assert_eq!(json, r#"{"error":"No station has been found"}"#);
    }

    #[test]
    fn test_error_body_escapes_message() {
        let body = ErrorBody::new(r#"No data found for stationId: "x""#);
        let json = serde_json::to_string(&body).unwrap();
        let parsed: ErrorBody = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, body);
    }

    #[test]
    fn test_health_response() {
        let json = serde_json::to_string(&HealthResponse::ok(12)).unwrap();
        assert_eq!(json, r#"{"status":"ok","triples":12}"#);
    }
}
