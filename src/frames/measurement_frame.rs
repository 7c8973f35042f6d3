//! Contains the `MeasurementLazyFrame` structure for lazy operations on measurement rows.

use crate::filtering::{MeasurementFilter, MeasurementFrameFilterExt};
use crate::frames::series::ObservationSeries;
use crate::store::schema::{COL_PRCP, COL_TOBS};
use chrono::NaiveDate;
use polars::prelude::{Expr, LazyFrame};

/// A wrapper around a Polars `LazyFrame` holding rows of the `measurement` table.
///
/// Every method returns a *new* frame; the original is left untouched. Nothing is
/// evaluated until a series or the underlying frame is collected.
///
/// Instances are typically obtained via [`crate::AggregationEngine::measurements`].
///
/// # Errors
///
/// Operations that trigger computation on the underlying `LazyFrame` (e.g. `collect()`)
/// can return a [`polars::prelude::PolarsError`].
#[derive(Clone)]
pub struct MeasurementLazyFrame {
    /// The underlying Polars LazyFrame containing the measurement rows.
    pub frame: LazyFrame,
}

impl MeasurementLazyFrame {
    pub fn new(frame: LazyFrame) -> Self {
        Self { frame }
    }

    /// Filters the rows with an arbitrary Polars predicate expression.
    pub fn filter(&self, predicate: Expr) -> MeasurementLazyFrame {
        MeasurementLazyFrame::new(self.frame.clone().filter(predicate))
    }

    /// Applies a [`MeasurementFilter`].
    pub fn filter_with(&self, filter: &MeasurementFilter) -> MeasurementLazyFrame {
        MeasurementLazyFrame::new(self.frame.clone().filter_measurements(filter))
    }

    /// Rows dated within `[start, end]` (inclusive).
    pub fn get_range(&self, start: NaiveDate, end: NaiveDate) -> MeasurementLazyFrame {
        self.filter_with(&MeasurementFilter::between(start, Some(end)))
    }

    /// Rows dated on or after `since`.
    pub fn get_since(&self, since: NaiveDate) -> MeasurementLazyFrame {
        self.filter_with(&MeasurementFilter::all().on_or_after(since))
    }

    /// Rows recorded by a single station.
    pub fn get_station(&self, station: &str) -> MeasurementLazyFrame {
        self.filter_with(&MeasurementFilter::all().station(station))
    }

    /// `(date, prcp)` pairs in row order.
    pub fn precipitation(&self) -> ObservationSeries {
        ObservationSeries::new(self.frame.clone(), COL_PRCP)
    }

    /// `(date, tobs)` pairs in row order.
    pub fn temperature(&self) -> ObservationSeries {
        ObservationSeries::new(self.frame.clone(), COL_TOBS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{date, scenario_store};
    use polars::prelude::{col, lit, PolarsResult};

    fn frame() -> MeasurementLazyFrame {
        MeasurementLazyFrame::new(scenario_store().measurements())
    }

    #[test]
    fn test_get_range() -> PolarsResult<()> {
        let df = frame()
            .get_range(date("2017-08-20"), date("2017-08-22"))
            .frame
            .collect()?;
        assert_eq!(df.height(), 1);
        Ok(())
    }

    #[test]
    fn test_station_then_since() -> PolarsResult<()> {
        let pairs = frame()
            .get_station("S1")
            .get_since(date("2017-01-01"))
            .temperature()
            .collect()?;
        assert_eq!(
            pairs,
            vec![
                (date("2017-08-20"), Some(70.0)),
                (date("2017-08-23"), Some(75.0))
            ]
        );
        Ok(())
    }

    #[test]
    fn test_arbitrary_filter() -> PolarsResult<()> {
        let df = frame().filter(col("prcp").gt(lit(0.9))).frame.collect()?;
        assert_eq!(df.height(), 2);
        Ok(())
    }
}
