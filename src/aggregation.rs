//! Grouping and range aggregation over the measurement table.

use crate::error::ClimateError;
use crate::filtering::MeasurementFilter;
use crate::frames::measurement_frame::MeasurementLazyFrame;
use crate::frames::series::ObservationSeries;
use crate::store::data_loader::DataStore;
use crate::store::schema::{COL_STATION, COL_TOBS};
use crate::types::responses::TemperatureStats;
use chrono::NaiveDate;
use log::{debug, warn};
use polars::prelude::*;

const COUNT_COLUMN: &str = "count";

/// Query engine over a borrowed [`DataStore`].
#[derive(Clone, Copy)]
pub struct AggregationEngine<'a> {
    store: &'a DataStore,
}

impl<'a> AggregationEngine<'a> {
    pub fn new(store: &'a DataStore) -> Self {
        Self { store }
    }

    /// Every measurement row as a [`MeasurementLazyFrame`].
    pub fn measurements(&self) -> MeasurementLazyFrame {
        MeasurementLazyFrame::new(self.store.measurements())
    }

    /// Number of measurement rows per station, most active first.
    ///
    /// Stations with equal counts are ordered by identifier, so the first entry is
    /// always the one [`AggregationEngine::most_active_station`] returns. Rows without
    /// a station are not counted.
    pub fn station_activity(&self) -> Result<Vec<(String, u64)>, ClimateError> {
        let df = self.activity_frame().collect()?;
        let stations = df.column(COL_STATION)?.str()?;
        let counts = df.column(COUNT_COLUMN)?.u64()?;

        Ok(stations
            .into_iter()
            .zip(counts)
            .filter_map(|(station, count)| Some((station?.to_string(), count?)))
            .collect())
    }

    /// The station with the most measurement rows; ties go to the smallest identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ClimateError::EmptyDataset`] if there are no measurements.
    pub fn most_active_station(&self) -> Result<String, ClimateError> {
        let df = self.activity_frame().limit(1).collect()?;
        // Zero groups when there are no measurements; `get(0)` would be out of bounds.
        let station = df
            .column(COL_STATION)?
            .str()?
            .into_iter()
            .next()
            .flatten()
            .map(str::to_string);

        match station {
            Some(station) => {
                debug!("Most active station is {}", station);
                Ok(station)
            }
            None => {
                warn!("Most active station requested but the dataset has no measurements");
                Err(ClimateError::EmptyDataset)
            }
        }
    }

    /// Min, mean and max of `tobs` over rows dated `>= start` and, if given, `<= end`.
    ///
    /// Null temperatures are ignored. A window without any temperature, including a
    /// reversed one, yields [`TemperatureStats::default`].
    pub fn aggregate_stats(
        &self,
        start: NaiveDate,
        end: Option<NaiveDate>,
    ) -> Result<TemperatureStats, ClimateError> {
        let df = self
            .store
            .measurements_where(&MeasurementFilter::between(start, end))
            .select([
                col(COL_TOBS).min().alias("min"),
                col(COL_TOBS).mean().alias("avg"),
                col(COL_TOBS).max().alias("max"),
            ])
            .collect()?;

        let value = |name: &str| -> PolarsResult<Option<f64>> {
            Ok(df.column(name)?.f64()?.get(0))
        };

        Ok(TemperatureStats {
            min: value("min")?,
            avg: value("avg")?,
            max: value("max")?,
        })
    }

    /// `(date, prcp)` for every row dated on or after `since`, in stored order.
    pub fn precipitation_series(&self, since: NaiveDate) -> ObservationSeries {
        self.measurements().get_since(since).precipitation()
    }

    /// `(date, tobs)` for the rows of `station` dated on or after `since`, in stored order.
    pub fn temperature_series(&self, station: &str, since: NaiveDate) -> ObservationSeries {
        self.measurements()
            .get_station(station)
            .get_since(since)
            .temperature()
    }

    fn activity_frame(&self) -> LazyFrame {
        self.store
            .measurements()
            .filter(col(COL_STATION).is_not_null())
            .group_by([col(COL_STATION)])
            .agg([len().cast(DataType::UInt64).alias(COUNT_COLUMN)])
            .sort_by_exprs(
                [col(COUNT_COLUMN), col(COL_STATION)],
                SortMultipleOptions::default().with_order_descending_multi([true, false]),
            )
    }
}
