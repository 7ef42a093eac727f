//! Fact store: subject-predicate-object triples kept in `SQLite`.

mod error;
mod facts;
mod pattern;
mod schema;

pub use error::StoreError;
pub use facts::{default_store_path, FactStore, Triple, DEFAULT_READ_CONNECTIONS};
pub use pattern::{Binding, GroupPattern};
pub use schema::{SCHEMA, SCHEMA_VERSION};
