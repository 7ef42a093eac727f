//! Batch loading of Turtle documents into the fact store.

mod error;
mod loader;
mod turtle;

pub use error::IngestError;
pub use loader::{IngestReport, TurtleLoader};
pub use turtle::parse_turtle;
