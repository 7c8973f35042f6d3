mod aggregation;
pub mod api;
mod climate;
mod date_resolver;
mod error;
mod filtering;
mod frames;
mod store;
mod types;
mod utils;

#[cfg(test)]
mod test_support;

pub use climate::*;
pub use error::ClimateError;

pub use aggregation::AggregationEngine;
pub use date_resolver::{parse_date, window_start_from, DateResolver, DATE_FORMAT, ONE_YEAR_DAYS};
pub use filtering::{MeasurementFilter, MeasurementFrameFilterExt, Predicate};

pub use frames::measurement_frame::MeasurementLazyFrame;
pub use frames::series::ObservationSeries;

pub use store::data_loader::{DataSource, DataStore};
pub use store::error::DataStoreError;
pub use store::schema::Table;

pub use types::measurement::Measurement;
pub use types::responses::*;
pub use types::station::*;
