//! HTTP handlers for the weather API.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use super::response::{ErrorBody, HealthResponse};
use crate::config::ErrorStatus;
use crate::weather::{DateEntry, Observation, ObservationQueryEngine, QueryError, StationEntry};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Query engine backing every route.
    pub engine: Arc<ObservationQueryEngine>,
    /// Status code mapping for error bodies.
    pub error_status: ErrorStatus,
}

impl AppState {
    /// Create new app state with the default error mapping.
    #[must_use]
    pub fn new(engine: Arc<ObservationQueryEngine>) -> Self {
        Self {
            engine,
            error_status: ErrorStatus::default(),
        }
    }

    /// Set the error status mapping (builder pattern).
    #[must_use]
    pub fn with_error_status(mut self, error_status: ErrorStatus) -> Self {
        self.error_status = error_status;
        self
    }

    fn reject(&self, error: QueryError) -> ApiError {
        ApiError {
            error,
            mode: self.error_status,
        }
    }
}

/// A failed query, rendered as `{"error": "..."}`.
#[derive(Debug)]
pub struct ApiError {
    error: QueryError,
    mode: ErrorStatus,
}

impl ApiError {
    /// Status code for this error under the configured mapping.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self.mode {
            ErrorStatus::Legacy => StatusCode::OK,
            ErrorStatus::Http => match self.error {
                QueryError::NotFound { .. } => StatusCode::NOT_FOUND,
                QueryError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
                QueryError::StoreUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    /// The underlying query error.
    #[must_use]
    pub fn error(&self) -> &QueryError {
        &self.error
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.error.is_not_found() {
            tracing::debug!(error = %self.error, "No matching observations");
        } else {
            tracing::error!(error = %self.error, "Query failed");
        }
        (self.status(), Json(ErrorBody::new(self.error.to_string()))).into_response()
    }
}

/// GET /api/weather/stations - List stations with observations.
pub async fn get_stations(
    State(state): State<AppState>,
) -> Result<Json<Vec<StationEntry>>, ApiError> {
    state
        .engine
        .list_stations()
        .await
        .map(Json)
        .map_err(|e| state.reject(e))
}

/// GET /api/weather/:station_id - List dates observed at a station.
pub async fn get_dates(
    State(state): State<AppState>,
    Path(station_id): Path<String>,
) -> Result<Json<Vec<DateEntry>>, ApiError> {
    state
        .engine
        .list_dates(&station_id)
        .await
        .map(Json)
        .map_err(|e| state.reject(e))
}

/// GET /api/weather/:station_id/:date - Fetch one observation.
pub async fn get_observation(
    State(state): State<AppState>,
    Path((station_id, date)): Path<(String, String)>,
) -> Result<Json<Observation>, ApiError> {
    state
        .engine
        .get_observation(&station_id, &date)
        .await
        .map(Json)
        .map_err(|e| state.reject(e))
}

/// GET /api/health - Store liveness and size.
pub async fn get_health(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    let triples = state
        .engine
        .store()
        .count_triples()
        .await
        .map_err(|e| state.reject(e.into()))?;
    Ok(Json(HealthResponse::ok(triples)))
}
