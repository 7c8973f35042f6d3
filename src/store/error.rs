use crate::store::schema::Table;
use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DataStoreError {
    #[error("Data source '{0}' does not exist")]
    SourceNotFound(PathBuf),

    #[error("Failed to read metadata for data source '{0}'")]
    SourceMetadata(PathBuf, #[source] std::io::Error),

    #[error("Data source path '{0}' exists but is not a file")]
    NotAFile(PathBuf),

    #[error("SQLite read failed for '{path}'")]
    Sqlite {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Failed to read CSV file '{path}'")]
    CsvRead {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },

    #[error("Failed to scan parquet file '{path}'")]
    ParquetScan {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },

    #[error("Required column '{column}' not found in {table} table")]
    MissingColumn { table: Table, column: &'static str },

    #[error("Column '{column}' in {table} table has type {found}, expected {expected}")]
    ColumnType {
        table: Table,
        column: &'static str,
        expected: &'static str,
        found: String,
    },

    #[error("Failed building {table} frame: {source}")]
    Frame {
        table: Table,
        #[source]
        source: PolarsError,
    },

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}
