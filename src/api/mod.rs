//! HTTP dispatcher for the observation query engine.

mod error;
mod handlers;
mod response;
mod server;

pub use error::ServerError;
pub use handlers::{get_dates, get_health, get_observation, get_stations, ApiError, AppState};
pub use response::{ErrorBody, HealthResponse};
pub use server::{WeatherServer, DEFAULT_PORT};
