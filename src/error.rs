use crate::store::error::DataStoreError;
use chrono::NaiveDate;
use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClimateError {
    /// Caller-supplied date text is not a `YYYY-MM-DD` calendar date.
    #[error("Invalid date '{input}', expected YYYY-MM-DD")]
    InvalidDateFormat {
        input: String,
        #[source]
        source: Option<chrono::ParseError>,
    },

    /// The store holds no measurements, so no latest date or most-active station exists.
    #[error("Dataset contains no measurements")]
    EmptyDataset,

    #[error(transparent)]
    DataStoreUnavailable(#[from] DataStoreError),

    #[error("Query evaluation failed")]
    Query(#[from] PolarsError),

    #[error("Date arithmetic out of range from {0}")]
    DateOutOfRange(NaiveDate),
}

impl ClimateError {
    /// `true` for errors caused by caller input rather than by the dataset or store.
    pub fn is_client_error(&self) -> bool {
        matches!(self, ClimateError::InvalidDateFormat { .. })
    }
}
