use crate::filtering::{MeasurementFilter, MeasurementFrameFilterExt};
use crate::store::error::DataStoreError;
use crate::store::schema::{
    conform_frame, csv_schema_overwrite, Table, COL_DATE, COL_ELEVATION, COL_LATITUDE,
    COL_LONGITUDE, COL_NAME, COL_PRCP, COL_STATION, COL_TOBS,
};
use crate::store::sqlite;
use crate::types::measurement::Measurement;
use crate::types::station::{Location, Station};
use crate::utils::{date_from_epoch_days, ensure_source_file};
use chrono::NaiveDate;
use log::info;
use polars::prelude::*;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task;

/// Where the station and measurement records are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// A SQLite database with `station` and `measurement` tables.
    Sqlite(PathBuf),
    /// Two headered CSV files.
    Csv {
        stations: PathBuf,
        measurements: PathBuf,
    },
    /// Two parquet files.
    Parquet {
        stations: PathBuf,
        measurements: PathBuf,
    },
}

impl DataSource {
    pub fn sqlite(path: impl Into<PathBuf>) -> Self {
        DataSource::Sqlite(path.into())
    }

    pub fn csv(stations: impl Into<PathBuf>, measurements: impl Into<PathBuf>) -> Self {
        DataSource::Csv {
            stations: stations.into(),
            measurements: measurements.into(),
        }
    }

    pub fn parquet(stations: impl Into<PathBuf>, measurements: impl Into<PathBuf>) -> Self {
        DataSource::Parquet {
            stations: stations.into(),
            measurements: measurements.into(),
        }
    }

    fn paths(&self) -> Vec<&Path> {
        match self {
            DataSource::Sqlite(path) => vec![path.as_path()],
            DataSource::Csv {
                stations,
                measurements,
            }
            | DataSource::Parquet {
                stations,
                measurements,
            } => vec![stations.as_path(), measurements.as_path()],
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Sqlite(path) => write!(f, "sqlite:{}", path.display()),
            DataSource::Csv {
                stations,
                measurements,
            } => write!(
                f,
                "csv:{} + {}",
                stations.display(),
                measurements.display()
            ),
            DataSource::Parquet {
                stations,
                measurements,
            } => write!(
                f,
                "parquet:{} + {}",
                stations.display(),
                measurements.display()
            ),
        }
    }
}

/// Read-only, in-memory snapshot of the station and measurement tables.
///
/// Both frames are conformed to the static schema when the store is built and never
/// change afterwards. Cloning is cheap; the underlying column buffers are shared.
#[derive(Clone)]
pub struct DataStore {
    stations: DataFrame,
    measurements: DataFrame,
}

impl DataStore {
    /// Opens `source`, reads both tables on a blocking task and validates them.
    pub async fn open(source: &DataSource) -> Result<Self, DataStoreError> {
        for path in source.paths() {
            ensure_source_file(path).await?;
        }

        let owned = source.clone();
        let (stations, measurements) = task::spawn_blocking(move || match owned {
            DataSource::Sqlite(path) => sqlite::read_tables(&path),
            DataSource::Csv {
                stations,
                measurements,
            } => Ok((
                read_csv(Table::Station, &stations)?,
                read_csv(Table::Measurement, &measurements)?,
            )),
            DataSource::Parquet {
                stations,
                measurements,
            } => Ok((
                read_parquet(Table::Station, &stations)?,
                read_parquet(Table::Measurement, &measurements)?,
            )),
        })
        .await??;

        let store = Self {
            stations,
            measurements,
        };
        info!(
            "Opened {} with {} stations and {} measurements",
            source,
            store.station_count(),
            store.measurement_count()
        );
        Ok(store)
    }

    /// Builds a store from already loaded frames, checking them against the schema.
    pub fn from_frames(
        stations: DataFrame,
        measurements: DataFrame,
    ) -> Result<Self, DataStoreError> {
        Ok(Self {
            stations: conform_frame(Table::Station, stations)?,
            measurements: conform_frame(Table::Measurement, measurements)?,
        })
    }

    pub fn from_records(
        stations: &[Station],
        measurements: &[Measurement],
    ) -> Result<Self, DataStoreError> {
        let station_frame = DataFrame::new(vec![
            Column::new(
                COL_STATION.into(),
                stations.iter().map(|s| s.id.as_str()).collect::<Vec<_>>(),
            ),
            Column::new(
                COL_NAME.into(),
                stations.iter().map(|s| s.name.as_str()).collect::<Vec<_>>(),
            ),
            Column::new(
                COL_LATITUDE.into(),
                stations
                    .iter()
                    .map(|s| s.location.latitude)
                    .collect::<Vec<_>>(),
            ),
            Column::new(
                COL_LONGITUDE.into(),
                stations
                    .iter()
                    .map(|s| s.location.longitude)
                    .collect::<Vec<_>>(),
            ),
            Column::new(
                COL_ELEVATION.into(),
                stations
                    .iter()
                    .map(|s| s.location.elevation)
                    .collect::<Vec<_>>(),
            ),
        ])
        .map_err(|e| DataStoreError::Frame {
            table: Table::Station,
            source: e,
        })?;

        let measurement_frame = DataFrame::new(vec![
            Column::new(
                COL_STATION.into(),
                measurements
                    .iter()
                    .map(|m| m.station.as_str())
                    .collect::<Vec<_>>(),
            ),
            Column::new(
                COL_DATE.into(),
                measurements.iter().map(|m| m.date).collect::<Vec<_>>(),
            ),
            Column::new(
                COL_PRCP.into(),
                measurements
                    .iter()
                    .map(|m| m.precipitation)
                    .collect::<Vec<_>>(),
            ),
            Column::new(
                COL_TOBS.into(),
                measurements
                    .iter()
                    .map(|m| m.temperature)
                    .collect::<Vec<_>>(),
            ),
        ])
        .map_err(|e| DataStoreError::Frame {
            table: Table::Measurement,
            source: e,
        })?;

        Self::from_frames(station_frame, measurement_frame)
    }

    pub fn station_count(&self) -> usize {
        self.stations.height()
    }

    pub fn measurement_count(&self) -> usize {
        self.measurements.height()
    }

    /// All stations, in stored order.
    pub fn stations(&self) -> LazyFrame {
        self.stations.clone().lazy()
    }

    /// All measurements, in stored order.
    pub fn measurements(&self) -> LazyFrame {
        self.measurements.clone().lazy()
    }

    /// Measurements matching `filter`, in stored order.
    pub fn measurements_where(&self, filter: &MeasurementFilter) -> LazyFrame {
        self.measurements().filter_measurements(filter)
    }

    /// The latest observation date, or `None` if there are no measurements.
    pub fn max_date(&self) -> PolarsResult<Option<NaiveDate>> {
        let df = self
            .measurements()
            .select([col(COL_DATE).max()])
            .collect()?;
        let days = df.column(COL_DATE)?.date()?.get(0);
        Ok(days.and_then(date_from_epoch_days))
    }

    /// The full station records, in stored order. Rows without an identifier are
    /// skipped.
    pub fn station_records(&self) -> PolarsResult<Vec<Station>> {
        let ids = self.stations.column(COL_STATION)?.str()?;
        let names = self.stations.column(COL_NAME)?.str()?;
        let latitudes = self.stations.column(COL_LATITUDE)?.f64()?;
        let longitudes = self.stations.column(COL_LONGITUDE)?.f64()?;
        let elevations = self.stations.column(COL_ELEVATION)?.f64()?;

        let records = (0..self.stations.height())
            .filter_map(|idx| {
                let id = ids.get(idx)?;
                Some(Station::new(
                    id,
                    names.get(idx).unwrap_or_default(),
                    Location {
                        latitude: latitudes.get(idx),
                        longitude: longitudes.get(idx),
                        elevation: elevations.get(idx),
                    },
                ))
            })
            .collect();
        Ok(records)
    }
}

fn read_csv(table: Table, path: &Path) -> Result<DataFrame, DataStoreError> {
    let csv_error = |e: PolarsError| DataStoreError::CsvRead {
        path: path.to_path_buf(),
        source: e,
    };

    // Inferred types are unreliable: an all-empty column comes back as `str`.
    let header = CsvReadOptions::default()
        .with_has_header(true)
        .with_n_rows(Some(1))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .and_then(|reader| reader.finish())
        .map_err(csv_error)?
        .get_column_names_owned();
    let overwrite = csv_schema_overwrite(table, &header);

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_schema_overwrite(Some(Arc::new(overwrite)))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(csv_error)?
        .finish()
        .map_err(csv_error)?;
    conform_frame(table, df)
}

fn read_parquet(table: Table, path: &Path) -> Result<DataFrame, DataStoreError> {
    let df = LazyFrame::scan_parquet(path, Default::default())
        .and_then(|frame| frame.collect())
        .map_err(|e| DataStoreError::ParquetScan {
            path: path.to_path_buf(),
            source: e,
        })?;
    conform_frame(table, df)
}
