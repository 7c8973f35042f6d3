//! Static column layout of the station and measurement tables.
//!
//! Every source (SQLite, CSV, parquet, in-memory records) is conformed to this layout
//! once, at load time. Anything that does not match fails the load instead of
//! surfacing later as a query error.

use crate::store::error::DataStoreError;
use log::debug;
use polars::prelude::*;
use std::fmt;

pub(crate) const COL_STATION: &str = "station";
pub(crate) const COL_NAME: &str = "name";
pub(crate) const COL_LATITUDE: &str = "latitude";
pub(crate) const COL_LONGITUDE: &str = "longitude";
pub(crate) const COL_ELEVATION: &str = "elevation";
pub(crate) const COL_DATE: &str = "date";
pub(crate) const COL_PRCP: &str = "prcp"; // Precipitation
pub(crate) const COL_TOBS: &str = "tobs"; // Observed temperature

/// The two record collections held by the data store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Station,
    Measurement,
}

/// Storage class a column must be convertible from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ColumnKind {
    Text,
    Float,
    Date,
}

impl ColumnKind {
    fn target(self) -> DataType {
        match self {
            ColumnKind::Text => DataType::String,
            ColumnKind::Float => DataType::Float64,
            ColumnKind::Date => DataType::Date,
        }
    }

    /// Type the CSV reader parses the column as. Dates stay text until `conform_frame`.
    fn csv_dtype(self) -> DataType {
        match self {
            ColumnKind::Text | ColumnKind::Date => DataType::String,
            ColumnKind::Float => DataType::Float64,
        }
    }

    fn describe(self) -> &'static str {
        match self {
            ColumnKind::Text => "text",
            ColumnKind::Float => "numeric",
            ColumnKind::Date => "date or YYYY-MM-DD text",
        }
    }

    /// All-null columns (`DataType::Null`) are accepted for every kind.
    fn accepts(self, dtype: &DataType) -> bool {
        match self {
            ColumnKind::Text => matches!(dtype, DataType::String | DataType::Null),
            ColumnKind::Float => matches!(
                dtype,
                DataType::Float64
                    | DataType::Float32
                    | DataType::Int64
                    | DataType::Int32
                    | DataType::Int16
                    | DataType::Int8
                    | DataType::UInt64
                    | DataType::UInt32
                    | DataType::UInt16
                    | DataType::UInt8
                    | DataType::Null
            ),
            ColumnKind::Date => matches!(dtype, DataType::Date | DataType::String | DataType::Null),
        }
    }
}

impl Table {
    pub(crate) fn table_name(&self) -> &'static str {
        match self {
            Table::Station => "station",
            Table::Measurement => "measurement",
        }
    }

    pub(crate) fn get_schema_columns(&self) -> Vec<(&'static str, ColumnKind)> {
        match self {
            Table::Station => vec![
                (COL_STATION, ColumnKind::Text),
                (COL_NAME, ColumnKind::Text),
                (COL_LATITUDE, ColumnKind::Float),
                (COL_LONGITUDE, ColumnKind::Float),
                (COL_ELEVATION, ColumnKind::Float),
            ],
            Table::Measurement => vec![
                (COL_STATION, ColumnKind::Text),
                (COL_DATE, ColumnKind::Date),
                (COL_PRCP, ColumnKind::Float),
                (COL_TOBS, ColumnKind::Float),
            ],
        }
    }

    pub(crate) fn get_schema_column_names(&self) -> Vec<&'static str> {
        self.get_schema_columns()
            .into_iter()
            .map(|(name, _)| name)
            .collect()
    }
}

/// Reader schema for the schema columns named in `header`.
///
/// Columns absent from the header are left out, so a missing column still surfaces as
/// `MissingColumn` from `conform_frame`. Every overwrite name is present in the file,
/// so the reader never falls back to renaming columns by position.
pub(crate) fn csv_schema_overwrite(table: Table, header: &[PlSmallStr]) -> Schema {
    table
        .get_schema_columns()
        .into_iter()
        .filter(|(name, _)| header.iter().any(|h| h.as_str() == *name))
        .map(|(name, kind)| (PlSmallStr::from(name), kind.csv_dtype()))
        .collect()
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.table_name())
    }
}

/// Checks `df` against the layout of `table` and returns a frame holding exactly the
/// schema columns, in schema order, cast to their target types.
pub(crate) fn conform_frame(table: Table, df: DataFrame) -> Result<DataFrame, DataStoreError> {
    let schema = table.get_schema_columns();

    for &(name, kind) in &schema {
        let column = df.column(name).map_err(|_| DataStoreError::MissingColumn {
            table,
            column: name,
        })?;
        if !kind.accepts(column.dtype()) {
            return Err(DataStoreError::ColumnType {
                table,
                column: name,
                expected: kind.describe(),
                found: column.dtype().to_string(),
            });
        }
    }

    let extra = df.width().saturating_sub(schema.len());
    if extra > 0 {
        debug!("Ignoring {} extra column(s) in {} table", extra, table);
    }

    let projection: Vec<Expr> = schema
        .iter()
        .map(|&(name, kind)| col(name).strict_cast(kind.target()))
        .collect();

    df.lazy()
        .select(projection)
        .collect()
        .map_err(|e| DataStoreError::Frame { table, source: e })
}
