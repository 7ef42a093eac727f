//! Fact store with scoped `SQLite` transactions run on blocking threads.

use std::ffi::c_int;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rusqlite::{params, Connection, ErrorCode, OpenFlags, Transaction, TransactionBehavior};
use tokio::sync::Mutex;

use super::error::StoreError;
use super::pattern::{Binding, GroupPattern};
use super::schema::SCHEMA;

/// Default number of read-only connections opened for a file-backed store.
pub const DEFAULT_READ_CONNECTIONS: usize = 4;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// VM instructions between deadline checks during a bounded read.
const PROGRESS_STEPS: c_int = 1_000;

/// Returns the default path for the fact store database.
///
/// This is `~/.local/share/weather-triples/facts.db` on Unix systems.
#[must_use]
pub fn default_store_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("weather-triples")
        .join("facts.db")
}

/// A single subject-predicate-object statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Triple {
    pub subject: String,
    pub predicate: String,
    pub object: String,
}

impl Triple {
    /// Create a new triple.
    #[must_use]
    pub fn new(
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }
}

/// Triple store backed by `SQLite`.
///
/// Every operation runs inside one transaction on a `spawn_blocking` thread.
/// File-backed stores keep one writer connection and a small set of read-only
/// connections so concurrent readers do not queue behind each other.
#[derive(Debug, Clone)]
pub struct FactStore {
    writer: Arc<Mutex<Connection>>,
    readers: Arc<Vec<Arc<Mutex<Connection>>>>,
    next_reader: Arc<AtomicUsize>,
    path: Option<PathBuf>,
}

impl FactStore {
    /// Open a fact store at the specified path.
    ///
    /// Creates parent directories if they don't exist and initializes the schema.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or the schema cannot be applied.
    pub async fn open(path: impl AsRef<Path>, read_connections: usize) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                tokio::fs::create_dir_all(parent).await.map_err(|source| {
                    StoreError::CreateDir {
                        path: parent.to_path_buf(),
                        source,
                    }
                })?;
            }
        }

        let path_clone = path.clone();
        let (writer, readers) = tokio::task::spawn_blocking(
            move || -> Result<(Connection, Vec<Connection>), StoreError> {
                let open_err = |source| StoreError::DatabaseOpen {
                    path: path_clone.clone(),
                    source,
                };

                let writer = Connection::open(&path_clone).map_err(open_err)?;
                writer.busy_timeout(BUSY_TIMEOUT)?;
                writer.execute_batch(SCHEMA)?;

                let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
                let mut readers = Vec::with_capacity(read_connections.max(1));
                for _ in 0..read_connections.max(1) {
                    let reader = Connection::open_with_flags(&path_clone, flags).map_err(open_err)?;
                    reader.busy_timeout(BUSY_TIMEOUT)?;
                    readers.push(reader);
                }
                Ok((writer, readers))
            },
        )
        .await
        .map_err(|_| StoreError::TaskCancelled)??;

        tracing::debug!(
            path = %path.display(),
            readers = readers.len(),
            "Opened fact store"
        );

        Ok(Self {
            writer: Arc::new(Mutex::new(writer)),
            readers: Arc::new(
                readers
                    .into_iter()
                    .map(|conn| Arc::new(Mutex::new(conn)))
                    .collect(),
            ),
            next_reader: Arc::new(AtomicUsize::new(0)),
            path: Some(path),
        })
    }

    /// Open an in-memory fact store for testing.
    ///
    /// Reads and writes share the single connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be created or the schema cannot be applied.
    pub async fn open_in_memory() -> Result<Self, StoreError> {
        let conn = tokio::task::spawn_blocking(|| -> Result<Connection, StoreError> {
            let conn = Connection::open_in_memory()?;
            conn.execute_batch(SCHEMA)?;
            Ok(conn)
        })
        .await
        .map_err(|_| StoreError::TaskCancelled)??;

        let writer = Arc::new(Mutex::new(conn));
        Ok(Self {
            readers: Arc::new(vec![writer.clone()]),
            writer,
            next_reader: Arc::new(AtomicUsize::new(0)),
            path: None,
        })
    }

    /// Returns the path to the database, if opened from a file.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn reader(&self) -> Arc<Mutex<Connection>> {
        let index = self.next_reader.fetch_add(1, Ordering::Relaxed) % self.readers.len();
        self.readers[index].clone()
    }

    /// Run `f` inside a read transaction.
    ///
    /// The transaction is released when `f` returns, on success and on error.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction cannot be opened or `f` fails.
    pub async fn read<F, T>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T, rusqlite::Error> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.reader();
        tokio::task::spawn_blocking(move || -> Result<T, StoreError> {
            let mut conn = conn.blocking_lock();
            Ok(read_transaction(&mut conn, f)?)
        })
        .await
        .map_err(|_| StoreError::TaskCancelled)?
    }

    /// Run `f` inside a read transaction that is aborted once `budget` has
    /// elapsed.
    ///
    /// The deadline is checked by `SQLite` while statements run, so an overrun
    /// query stops and hands its connection back instead of finishing in the
    /// background. Time spent waiting for a connection counts against the
    /// budget.
    ///
    /// # Errors
    ///
    /// Returns `Interrupted` when the budget runs out, or an error if the
    /// transaction cannot be opened or `f` fails.
    pub async fn read_within<F, T>(&self, budget: Duration, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T, rusqlite::Error> + Send + 'static,
        T: Send + 'static,
    {
        let budget_ms = u64::try_from(budget.as_millis()).unwrap_or(u64::MAX);
        let deadline = Instant::now().checked_add(budget);
        let expired = move || deadline.is_some_and(|deadline| Instant::now() >= deadline);

        let conn = self.reader();
        let task = tokio::task::spawn_blocking(move || -> Result<T, StoreError> {
            let mut conn = conn.blocking_lock();
            if expired() {
                return Err(StoreError::Interrupted { budget_ms });
            }

            conn.progress_handler(PROGRESS_STEPS, Some(expired));
            let result = read_transaction(&mut conn, f);
            conn.progress_handler(0, None::<fn() -> bool>);

            result.map_err(|e| match e.sqlite_error_code() {
                Some(ErrorCode::OperationInterrupted) => StoreError::Interrupted { budget_ms },
                _ => StoreError::Query(e),
            })
        });

        match tokio::time::timeout(budget, task).await {
            Ok(joined) => joined.map_err(|_| StoreError::TaskCancelled)?,
            Err(_) => Err(StoreError::Interrupted { budget_ms }),
        }
    }

    /// Run `f` inside a write transaction, committing only if it succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction cannot be opened, `f` fails, or the
    /// commit fails. Nothing is written in any of those cases.
    pub async fn write<F, T>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T, rusqlite::Error> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.writer.clone();
        tokio::task::spawn_blocking(move || -> Result<T, StoreError> {
            let mut conn = conn.blocking_lock();
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            let value = f(&tx)?;
            tx.commit()?;
            Ok(value)
        })
        .await
        .map_err(|_| StoreError::TaskCancelled)?
    }

    /// Match a group pattern in its own read transaction, within `budget`.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction or query fails, or `Interrupted`
    /// if it overruns the budget.
    pub async fn match_pattern(
        &self,
        pattern: GroupPattern,
        budget: Duration,
    ) -> Result<Vec<Binding>, StoreError> {
        self.read_within(budget, move |tx| pattern.execute(tx)).await
    }

    /// Total number of stored triples.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn count_triples(&self) -> Result<u64, StoreError> {
        let count = self
            .read(|tx| tx.query_row("SELECT COUNT(*) FROM triples", [], |row| row.get::<_, i64>(0)))
            .await?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    /// Insert triples through an open transaction, ignoring ones already stored.
    ///
    /// Returns the number of triples actually added.
    ///
    /// # Errors
    ///
    /// Returns an error if an insert fails.
    pub fn insert_triples(tx: &Transaction<'_>, triples: &[Triple]) -> Result<usize, rusqlite::Error> {
        let mut stmt = tx.prepare_cached(
            "INSERT OR IGNORE INTO triples (subject, predicate, object) VALUES (?1, ?2, ?3)",
        )?;
        let mut inserted = 0;
        for triple in triples {
            inserted += stmt.execute(params![triple.subject, triple.predicate, triple.object])?;
        }
        Ok(inserted)
    }
}

fn read_transaction<F, T>(conn: &mut Connection, f: F) -> Result<T, rusqlite::Error>
where
    F: FnOnce(&Transaction<'_>) -> Result<T, rusqlite::Error>,
{
    let tx = conn.transaction_with_behavior(TransactionBehavior::Deferred)?;
    let value = f(&tx)?;
    tx.commit()?;
    Ok(value)
}
