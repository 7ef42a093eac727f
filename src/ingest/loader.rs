//! One-shot Turtle loader.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use rusqlite::{params, Transaction};
use serde::Serialize;
use uuid::Uuid;

use super::error::IngestError;
use super::turtle::parse_turtle;
use crate::store::{FactStore, Triple};
use crate::weather::{predicate_iri, DATE, STATION};

/// Outcome of a successful load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    /// Triples read from the document.
    pub triples_parsed: usize,
    /// Triples not already present in the store.
    pub triples_inserted: usize,
    /// Subjects carrying a station after the load.
    pub observations: u64,
    /// (station, date) pairs shared by more than one subject after the load.
    pub duplicate_keys: u64,
}

/// Loads Turtle documents into a [`FactStore`].
///
/// The whole document is parsed before anything is written, then inserted in
/// a single write transaction: a failed load leaves the store untouched.
#[derive(Debug, Clone)]
pub struct TurtleLoader {
    store: FactStore,
}

impl TurtleLoader {
    /// Create a loader writing to `store`.
    #[must_use]
    pub fn new(store: FactStore) -> Self {
        Self { store }
    }

    /// Load a Turtle file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or the triples
    /// cannot be stored.
    pub async fn load_file(&self, path: impl AsRef<Path>) -> Result<IngestReport, IngestError> {
        let path = path.as_ref().to_path_buf();
        tracing::info!(path = %path.display(), "Loading Turtle document");

        let scope = load_scope();
        let triples = tokio::task::spawn_blocking(move || -> Result<Vec<Triple>, IngestError> {
            let file = File::open(&path).map_err(|source| IngestError::Read { path, source })?;
            Ok(parse_turtle(BufReader::new(file), &scope)?)
        })
        .await
        .map_err(|_| IngestError::TaskCancelled)??;

        self.load_triples(triples).await
    }

    /// Load a Turtle document held in memory.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be parsed or stored.
    pub async fn load_str(&self, document: &str) -> Result<IngestReport, IngestError> {
        let triples = parse_turtle(document.as_bytes(), &load_scope())?;
        self.load_triples(triples).await
    }

    async fn load_triples(&self, triples: Vec<Triple>) -> Result<IngestReport, IngestError> {
        let triples_parsed = triples.len();

        let report = self
            .store
            .write(move |tx| {
                let triples_inserted = FactStore::insert_triples(tx, &triples)?;
                let (observations, duplicate_keys) = key_statistics(tx)?;
                Ok(IngestReport {
                    triples_parsed,
                    triples_inserted,
                    observations,
                    duplicate_keys,
                })
            })
            .await?;

        tracing::info!(
            parsed = report.triples_parsed,
            inserted = report.triples_inserted,
            observations = report.observations,
            "Turtle document loaded"
        );
        if report.duplicate_keys > 0 {
            tracing::warn!(
                duplicate_keys = report.duplicate_keys,
                "Several observations share a station and date; queries use the first"
            );
        }

        Ok(report)
    }
}

/// Blank node scope for one load.
fn load_scope() -> String {
    Uuid::new_v4().simple().to_string()
}

fn key_statistics(tx: &Transaction<'_>) -> Result<(u64, u64), rusqlite::Error> {
    let station = predicate_iri(STATION);
    let date = predicate_iri(DATE);

    let observations: i64 = tx.query_row(
        "SELECT COUNT(DISTINCT subject) FROM triples WHERE predicate = ?1",
        params![station],
        |row| row.get(0),
    )?;
    let duplicates: i64 = tx.query_row(
        "SELECT COUNT(*) FROM (
             SELECT s.object, d.object FROM triples s
             JOIN triples d ON d.subject = s.subject AND d.predicate = ?2
             WHERE s.predicate = ?1
             GROUP BY s.object, d.object
             HAVING COUNT(DISTINCT s.subject) > 1
         )",
        params![station, date],
        |row| row.get(0),
    )?;

    Ok((
        u64::try_from(observations).unwrap_or(0),
        u64::try_from(duplicates).unwrap_or(0),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"
        @prefix ex: <http://example.org/weather#> .

        ex:obs1 ex:station "07005" ; ex:date "20241113" ; ex:temperature "278.35" .
        ex:obs2 ex:station "07015" ; ex:date "20241114" ; ex:temperature "mq" .
    "#;

    #[tokio::test]
    async fn test_load_str_reports_counts() {
        let store = FactStore::open_in_memory().await.unwrap();
        let loader = TurtleLoader::new(store.clone());

        let report = loader.load_str(DOC).await.unwrap();

        assert_eq!(
            report,
            IngestReport {
                triples_parsed: 6,
                triples_inserted: 6,
                observations: 2,
                duplicate_keys: 0,
            }
        );
        assert_eq!(store.count_triples().await.unwrap(), 6);
    }

    #[tokio::test]
    async fn test_reload_inserts_nothing() {
        let store = FactStore::open_in_memory().await.unwrap();
        let loader = TurtleLoader::new(store);

        loader.load_str(DOC).await.unwrap();
        let report = loader.load_str(DOC).await.unwrap();

        assert_eq!(report.triples_parsed, 6);
        assert_eq!(report.triples_inserted, 0);
    }

    #[tokio::test]
    async fn test_duplicate_keys_counted() {
        let store = FactStore::open_in_memory().await.unwrap();
        let loader = TurtleLoader::new(store);
        let doc = r#"
            @prefix ex: <http://example.org/weather#> .
            ex:a ex:station "07005" ; ex:date "20241113" .
            ex:b ex:station "07005" ; ex:date "20241113" .
        "#;

        let report = loader.load_str(doc).await.unwrap();
        assert_eq!(report.observations, 2);
        assert_eq!(report.duplicate_keys, 1);
    }

    #[tokio::test]
    async fn test_blank_nodes_from_separate_loads_stay_apart() {
        let store = FactStore::open_in_memory().await.unwrap();
        let loader = TurtleLoader::new(store.clone());
        let first = r#"
            @prefix ex: <http://example.org/weather#> .
            _:o ex:station "07005" ; ex:date "20241113" ; ex:temperature "278.35" .
        "#;
        let second = r#"
            @prefix ex: <http://example.org/weather#> .
            _:o ex:station "07015" ; ex:date "20241114" ; ex:temperature "281.0" .
        "#;

        loader.load_str(first).await.unwrap();
        let report = loader.load_str(second).await.unwrap();

        assert_eq!(report.triples_inserted, 3);
        assert_eq!(report.observations, 2);
        assert_eq!(report.duplicate_keys, 0);

        let subjects = store
            .read(|tx| {
                tx.query_row(
                    "SELECT COUNT(DISTINCT subject) FROM triples",
                    [],
                    |row| row.get::<_, i64>(0),
                )
            })
            .await
            .unwrap();
        assert_eq!(subjects, 2);
    }

    #[tokio::test]
    async fn test_parse_error_writes_nothing() {
        let store = FactStore::open_in_memory().await.unwrap();
        let loader = TurtleLoader::new(store.clone());

        let broken = format!("{DOC}\nex:obs3 ex:station");
        let err = loader.load_str(&broken).await.unwrap_err();

        assert!(matches!(err, IngestError::Parse(_)));
        assert_eq!(store.count_triples().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_missing_file() {
        let store = FactStore::open_in_memory().await.unwrap();
        let loader = TurtleLoader::new(store);

        let err = loader
            .load_file("/nonexistent/result-triples.ttl")
            .await
            .unwrap_err();
        assert!(matches!(err, IngestError::Read { .. }));
    }
}
