//! Observation queries over the fact store.

mod directory;
mod engine;
mod error;
mod sentinel;
mod types;
mod vocab;
mod wind;

pub use directory::{StationDirectory, BUILTIN_STATIONS, UNKNOWN_STATION};
pub use engine::{ObservationQueryEngine, QueryOptions, DEFAULT_QUERY_TIMEOUT};
pub use error::QueryError;
pub use sentinel::{as_integer, as_number, as_text, resolve, Reading, MISSING_MARKER, SENTINEL};
pub use types::{DateEntry, Observation, StationEntry};
pub use vocab::{predicate_iri, Measurement, DATE, NAMESPACE, STATION};
pub use wind::{classify, heading_for_degrees, CompassPoint, Heading, UNKNOWN_DIRECTION};
