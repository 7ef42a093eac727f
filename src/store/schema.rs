//! Database schema for the fact store.

/// Current schema version for migrations.
pub const SCHEMA_VERSION: u32 = 1;

/// SQL schema for the fact store.
pub const SCHEMA: &str = r"
PRAGMA journal_mode = WAL;

-- One row per triple; the primary key gives RDF set semantics
CREATE TABLE IF NOT EXISTS triples (
    subject TEXT NOT NULL,
    predicate TEXT NOT NULL,
    object TEXT NOT NULL,
    PRIMARY KEY (subject, predicate, object)
) WITHOUT ROWID;

CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY NOT NULL,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);

INSERT OR IGNORE INTO schema_version (version) VALUES (1);

-- Lookups by predicate and bound object (station = ?, date = ?)
CREATE INDEX IF NOT EXISTS idx_triples_predicate_object ON triples(predicate, object);
-- Joins from a subject to its other attributes
CREATE INDEX IF NOT EXISTS idx_triples_subject_predicate ON triples(subject, predicate);
";
