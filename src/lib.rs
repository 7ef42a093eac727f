//! Weather Triples - Historical weather observations stored as RDF triples, served as JSON.

pub mod api;
pub mod config;
pub mod ingest;
pub mod store;
pub mod weather;
