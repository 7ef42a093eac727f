//! HTTP server with axum router and graceful shutdown.

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::error::ServerError;
use super::handlers::{get_dates, get_health, get_observation, get_stations, AppState};
use crate::config::ServerConfig;
use crate::weather::ObservationQueryEngine;

/// Default port for the weather API.
pub const DEFAULT_PORT: u16 = 8080;

/// HTTP server exposing the observation queries.
pub struct WeatherServer {
    /// Server configuration.
    config: ServerConfig,
    /// Application state shared across handlers.
    state: AppState,
    /// Triggers graceful shutdown.
    cancel: CancellationToken,
}

impl WeatherServer {
    /// Create a new server with default configuration.
    #[must_use]
    pub fn new(engine: ObservationQueryEngine) -> Self {
        let config = ServerConfig::default();
        Self {
            state: AppState::new(Arc::new(engine)).with_error_status(config.error_status),
            config,
            cancel: CancellationToken::new(),
        }
    }

    /// Set the server configuration (builder pattern).
    #[must_use]
    pub fn with_config(mut self, config: ServerConfig) -> Self {
        self.state = self.state.with_error_status(config.error_status);
        self.config = config;
        self
    }

    /// Token that stops the server when cancelled.
    #[must_use]
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Get the configured address as a string.
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    /// Build the axum router with all routes and middleware.
    pub fn build_router(&self) -> Router {
        let router = Router::new()
            .route("/api/health", get(get_health))
            .route("/api/weather/stations", get(get_stations))
            .route("/api/weather/:station_id", get(get_dates))
            .route("/api/weather/:station_id/:date", get(get_observation))
            .with_state(self.state.clone())
            .layer(TraceLayer::new_for_http());

        if self.config.cors_permissive {
            router.layer(CorsLayer::permissive())
        } else {
            router
        }
    }

    /// Run the server, binding to the configured address.
    ///
    /// The server will run until the cancellation token is triggered,
    /// at which point it will perform a graceful shutdown.
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind or serve.
    pub async fn run(self) -> Result<(), ServerError> {
        let addr = self.address();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| ServerError::BindError {
                address: addr.clone(),
                source,
            })?;
        self.serve(listener).await
    }

    /// Serve on an already bound listener.
    ///
    /// # Errors
    ///
    /// Returns an error if serving fails.
    pub async fn serve(self, listener: TcpListener) -> Result<(), ServerError> {
        let cancel = self.cancel.clone();
        let app = self.build_router();

        tracing::info!(
            address = %listener.local_addr()?,
            "Starting weather API server"
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                cancel.cancelled().await;
                tracing::info!("Weather API server shutting down gracefully");
            })
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ErrorStatus;
    use crate::store::FactStore;
    use crate::weather::StationDirectory;

    async fn server() -> WeatherServer {
        let store = FactStore::open_in_memory().await.unwrap();
        let engine = ObservationQueryEngine::new(store, Arc::new(StationDirectory::builtin()));
        WeatherServer::new(engine)
    }

    #[tokio::test]
    async fn test_server_default_address() {
        let server = server().await;
        assert_eq!(server.address(), "127.0.0.1:8080");
        assert_eq!(server.state.error_status, ErrorStatus::Http);
    }

    #[tokio::test]
    async fn test_server_with_config() {
        let server = server().await.with_config(ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 9000,
            cors_permissive: false,
            query_timeout_ms: 100,
            error_status: ErrorStatus::Legacy,
        });

        assert_eq!(server.address(), "0.0.0.0:9000");
        assert!(!server.config.cors_permissive);
        assert_eq!(server.state.error_status, ErrorStatus::Legacy);
    }

    #[tokio::test]
    async fn test_build_router() {
        let server = server().await;
        // Just verify the router builds without panicking
        let _router = server.build_router();
    }

    #[tokio::test]
    async fn test_shutdown_on_cancel() {
        let server = server().await;
        let cancel = server.cancel_token();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();

        let handle = tokio::spawn(server.serve(listener));
        cancel.cancel();

        let result = tokio::time::timeout(std::time::Duration::from_secs(2), handle)
            .await
            .unwrap()
            .unwrap();
        assert!(result.is_ok());
    }
}
