//! Observation query engine.
//!
//! Each operation matches exactly one fixed group pattern inside its own read
//! transaction, then post-processes the bindings: station names from the
//! [`StationDirectory`], sentinel substitution, and wind direction sectors.

use std::sync::Arc;
use std::time::{Duration, Instant};

use super::directory::StationDirectory;
use super::error::QueryError;
use super::sentinel::{as_integer, as_number};
use super::types::{DateEntry, Observation, StationEntry};
use super::vocab::{predicate_iri, Measurement, DATE, STATION};
use super::wind::classify;
use crate::store::{Binding, FactStore, GroupPattern, StoreError};

/// Default time budget for a single query.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Tunables for the query engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOptions {
    /// Only consider fact-groups carrying all ten measurement predicates.
    pub require_complete_records: bool,
    /// Time budget for each query.
    pub timeout: Duration,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            require_complete_records: false,
            timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }
}

/// Read-only query engine over observations in a [`FactStore`].
#[derive(Debug, Clone)]
pub struct ObservationQueryEngine {
    store: FactStore,
    directory: Arc<StationDirectory>,
    options: QueryOptions,
}

impl ObservationQueryEngine {
    /// Create an engine with default options.
    #[must_use]
    pub fn new(store: FactStore, directory: Arc<StationDirectory>) -> Self {
        Self {
            store,
            directory,
            options: QueryOptions::default(),
        }
    }

    /// Set the engine options (builder pattern).
    #[must_use]
    pub fn with_options(mut self, options: QueryOptions) -> Self {
        self.options = options;
        self
    }

    /// The station directory used for display names.
    #[must_use]
    pub fn directory(&self) -> &StationDirectory {
        &self.directory
    }

    /// The underlying fact store.
    #[must_use]
    pub fn store(&self) -> &FactStore {
        &self.store
    }

    /// Current options.
    #[must_use]
    pub fn options(&self) -> &QueryOptions {
        &self.options
    }

    /// List every station that has at least one observation.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the store holds no qualifying observation, or a
    /// store/timeout error if the query cannot run.
    pub async fn list_stations(&self) -> Result<Vec<StationEntry>, QueryError> {
        let pattern = self
            .observation_pattern(GroupPattern::new().require(predicate_iri(STATION), STATION))
            .require(predicate_iri(DATE), DATE)
            .select([STATION])
            .distinct();

        let bindings = self.run(pattern).await?;
        let stations: Vec<StationEntry> = bindings
            .iter()
            .filter_map(|binding| binding.get(STATION))
            .map(|station| StationEntry {
                station: station.to_string(),
                station_name: self.directory.resolve(station).to_string(),
            })
            .collect();

        if stations.is_empty() {
            return Err(QueryError::not_found("No station has been found"));
        }

        tracing::debug!(count = stations.len(), "Listed stations");
        Ok(stations)
    }

    /// List the dates observed at `station`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when no observation has that station, or a
    /// store/timeout error if the query cannot run.
    pub async fn list_dates(&self, station: &str) -> Result<Vec<DateEntry>, QueryError> {
        let not_found = || QueryError::not_found(format!("No data found for stationId: {station}"));
        if station.is_empty() {
            return Err(not_found());
        }

        let pattern = self
            .observation_pattern(GroupPattern::new().bind(predicate_iri(STATION), station))
            .require(predicate_iri(DATE), DATE)
            .select([DATE])
            .distinct();

        let bindings = self.run(pattern).await?;
        let dates: Vec<DateEntry> = bindings
            .iter()
            .filter_map(|binding| binding.get(DATE))
            .map(|date| DateEntry {
                date: date.to_string(),
            })
            .collect();

        if dates.is_empty() {
            return Err(not_found());
        }

        tracing::debug!(station = %station, count = dates.len(), "Listed dates");
        Ok(dates)
    }

    /// Fetch the observation for `station` on `date`.
    ///
    /// Matching is exact string equality on both keys. If several
    /// observations share the pair, the first one in subject order is used.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when no observation matches, or a store/timeout
    /// error if the query cannot run.
    pub async fn get_observation(
        &self,
        station: &str,
        date: &str,
    ) -> Result<Observation, QueryError> {
        let not_found = || {
            QueryError::not_found(format!(
                "No data found for stationId: {station} and date: {date}"
            ))
        };
        if station.is_empty() || date.is_empty() {
            return Err(not_found());
        }

        let mut pattern = GroupPattern::new()
            .bind(predicate_iri(STATION), station)
            .bind(predicate_iri(DATE), date);
        for measurement in Measurement::ALL {
            pattern = if self.options.require_complete_records {
                pattern.require(measurement.iri(), measurement.local_name())
            } else {
                pattern.optional(measurement.iri(), measurement.local_name())
            };
        }
        // Solutions are ordered by subject; only the first is used.
        let pattern = pattern
            .select(Measurement::ALL.map(Measurement::local_name))
            .limit(1);

        let bindings = self.run(pattern).await?;
        let binding = bindings.into_iter().next().ok_or_else(not_found)?;

        Ok(self.build_observation(station, date, &binding))
    }

    fn build_observation(&self, station: &str, date: &str, binding: &Binding) -> Observation {
        let raw = |m: Measurement| binding.get(m.local_name());
        let number = |m: Measurement| as_number(m.local_name(), raw(m));
        let integer = |m: Measurement| as_integer(m.local_name(), raw(m));

        Observation {
            station: station.to_string(),
            station_name: self.directory.resolve(station).to_string(),
            date: date.to_string(),
            temperature: number(Measurement::Temperature),
            pression_ocean: integer(Measurement::PressionOcean),
            wind_direction: classify(raw(Measurement::WindDirection)),
            wind_speed: number(Measurement::WindSpeed),
            dew_point: number(Measurement::DewPoint),
            humidity: integer(Measurement::Humidity),
            horizontal_visibility: integer(Measurement::HorizontalVisibility),
            couldiness: number(Measurement::Couldiness),
            min_temperature: number(Measurement::MinTemperature),
            max_temperature: number(Measurement::MaxTemperature),
        }
    }

    /// Add the measurement constraints when complete records are required.
    fn observation_pattern(&self, pattern: GroupPattern) -> GroupPattern {
        if !self.options.require_complete_records {
            return pattern;
        }
        Measurement::ALL
            .into_iter()
            .fold(pattern, |pattern, m| pattern.require(m.iri(), m.local_name()))
    }

    async fn run(&self, pattern: GroupPattern) -> Result<Vec<Binding>, QueryError> {
        let started = Instant::now();
        match self.store.match_pattern(pattern, self.options.timeout).await {
            Ok(bindings) => Ok(bindings),
            Err(StoreError::Interrupted { .. }) => {
                let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
                tracing::warn!(elapsed_ms, "Query exceeded its time budget");
                Err(QueryError::Timeout { elapsed_ms })
            }
            Err(e) => Err(e.into()),
        }
    }
}
