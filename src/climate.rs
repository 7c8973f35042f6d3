//! This module provides the main entry point for querying the climate dataset.
//! It composes date resolution and aggregation into the four published operations:
//! precipitation, stations, temperature observations and temperature statistics.

use crate::aggregation::AggregationEngine;
use crate::date_resolver::{parse_date, DateResolver};
use crate::error::ClimateError;
use crate::store::data_loader::{DataSource, DataStore};
use crate::types::responses::{
    PrecipitationByDate, StationEntry, TemperatureObservation, TemperatureStats,
};
use crate::types::station::Station;
use bon::bon;
use chrono::NaiveDate;
use log::debug;
use std::path::PathBuf;

/// Location of the SQLite database opened by [`ClimateQuery::new`].
pub const DEFAULT_DATABASE_PATH: &str = "Resources/hawaii.sqlite";

/// The query facade over a loaded climate dataset.
///
/// All data is read once when the facade is created. Every query afterwards is
/// synchronous and read-only, so a `ClimateQuery` can be shared behind an `Arc`
/// between threads or tasks.
///
/// Create an instance using [`ClimateQuery::new()`] for the default database,
/// [`ClimateQuery::open()`] for any [`DataSource`], or [`ClimateQuery::from_store()`]
/// for data that is already in memory.
///
/// # Examples
///
/// ```rust,no_run
/// # use climate_query::{ClimateQuery, ClimateError};
/// # async fn run() -> Result<(), ClimateError> {
/// let climate = ClimateQuery::new().await?;
/// let stations = climate.get_stations()?;
/// println!("{} stations", stations.len());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ClimateQuery {
    store: DataStore,
}

#[bon]
impl ClimateQuery {
    /// Opens the SQLite database at [`DEFAULT_DATABASE_PATH`], relative to the
    /// working directory.
    ///
    /// # Errors
    ///
    /// Returns [`ClimateError::DataStoreUnavailable`] if the file is missing or does not
    /// contain the `station` and `measurement` tables.
    pub async fn new() -> Result<Self, ClimateError> {
        Self::with_database(PathBuf::from(DEFAULT_DATABASE_PATH)).await
    }

    /// Opens a SQLite database with the `station` and `measurement` tables.
    pub async fn with_database(path: impl Into<PathBuf>) -> Result<Self, ClimateError> {
        Self::open(DataSource::sqlite(path)).await
    }

    /// Opens any supported [`DataSource`].
    pub async fn open(source: DataSource) -> Result<Self, ClimateError> {
        let store = DataStore::open(&source).await?;
        Ok(Self::from_store(store))
    }

    /// Wraps an already loaded store.
    pub fn from_store(store: DataStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &DataStore {
        &self.store
    }

    pub fn date_resolver(&self) -> DateResolver<'_> {
        DateResolver::new(&self.store)
    }

    pub fn engine(&self) -> AggregationEngine<'_> {
        AggregationEngine::new(&self.store)
    }

    /// Precipitation for every measurement in the year ending at the latest observation.
    ///
    /// Keys are observation dates in ascending order. When several stations report the
    /// same date, the row stored last wins. Unrecorded precipitation is kept as `None`.
    ///
    /// # Errors
    ///
    /// Returns [`ClimateError::EmptyDataset`] if there are no measurements.
    pub fn get_precipitation(&self) -> Result<PrecipitationByDate, ClimateError> {
        let since = self.date_resolver().one_year_window_start()?;
        debug!("Collecting precipitation since {}", since);

        let pairs = self.engine().precipitation_series(since).collect()?;
        Ok(pairs.into_iter().collect())
    }

    /// The station directory as `(identifier, name)` entries, in stored order.
    pub fn get_stations(&self) -> Result<Vec<StationEntry>, ClimateError> {
        Ok(self
            .stations()?
            .into_iter()
            .map(|station| StationEntry {
                station: station.id,
                name: station.name,
            })
            .collect())
    }

    /// Full station records, including location and elevation.
    pub fn stations(&self) -> Result<Vec<Station>, ClimateError> {
        Ok(self.store.station_records()?)
    }

    /// Temperature observations of the most active station over the last year.
    ///
    /// The station is the one with the most measurement rows in the whole dataset
    /// (ties go to the smallest identifier); the year ends at the latest observation
    /// of any station.
    ///
    /// # Errors
    ///
    /// Returns [`ClimateError::EmptyDataset`] if there are no measurements.
    pub fn get_tobs(&self) -> Result<Vec<TemperatureObservation>, ClimateError> {
        let engine = self.engine();
        let station = engine.most_active_station()?;
        let since = self.date_resolver().one_year_window_start()?;
        debug!("Collecting temperatures for {} since {}", station, since);

        Ok(engine
            .temperature_series(&station, since)
            .collect()?
            .into_iter()
            .map(|(date, temperature)| TemperatureObservation { date, temperature })
            .collect())
    }

    /// Minimum, average and maximum temperature from `start`, optionally up to `end`.
    ///
    /// Both bounds are inclusive `YYYY-MM-DD` dates. The result always holds exactly one
    /// element; its fields are `None` when no temperature falls inside the range,
    /// including when `end` is before `start`.
    ///
    /// This method uses a builder pattern.
    ///
    /// # Arguments
    ///
    /// * `.start(&str)`: **Required.** First date of the range.
    /// * `.end(&str)` / `.maybe_end(Option<&str>)`: Optional. Last date of the range.
    ///
    /// # Errors
    ///
    /// Returns [`ClimateError::InvalidDateFormat`] if either text is not a `YYYY-MM-DD` date.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// # use climate_query::{ClimateQuery, ClimateError};
    /// # async fn run() -> Result<(), ClimateError> {
    /// let climate = ClimateQuery::new().await?;
    ///
    /// let since = climate.get_stats().start("2017-01-01").call()?;
    /// let august = climate
    ///     .get_stats()
    ///     .start("2017-08-01")
    ///     .end("2017-08-23")
    ///     .call()?;
    /// println!("{:?} {:?}", since[0], august[0]);
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub fn get_stats(
        &self,
        start: &str,
        end: Option<&str>,
    ) -> Result<Vec<TemperatureStats>, ClimateError> {
        let start = parse_date(start)?;
        let end = end.map(parse_date).transpose()?;
        self.get_stats_between(start, end)
    }

    /// [`ClimateQuery::get_stats`] for already parsed dates.
    pub fn get_stats_between(
        &self,
        start: NaiveDate,
        end: Option<NaiveDate>,
    ) -> Result<Vec<TemperatureStats>, ClimateError> {
        Ok(vec![self.engine().aggregate_stats(start, end)?])
    }
}
