use crate::store::schema::COL_DATE;
use crate::utils::date_from_epoch_days;
use chrono::NaiveDate;
use polars::prelude::*;

/// A lazy `(date, value)` sequence over measurement rows.
///
/// Holding a series costs nothing; the query only runs on [`ObservationSeries::collect`].
/// The series is restartable: collecting twice evaluates the same plan twice and yields
/// the same pairs.
#[derive(Clone)]
pub struct ObservationSeries {
    frame: LazyFrame,
    value_column: &'static str,
}

impl ObservationSeries {
    pub(crate) fn new(frame: LazyFrame, value_column: &'static str) -> Self {
        Self {
            frame: frame.select([col(COL_DATE), col(value_column)]),
            value_column,
        }
    }

    /// Name of the column the values are read from.
    pub fn value_column(&self) -> &'static str {
        self.value_column
    }

    /// The two-column plan backing this series.
    pub fn frame(&self) -> LazyFrame {
        self.frame.clone()
    }

    /// Evaluates the plan. Null values are kept as `None`; a null date is an error.
    pub fn collect(&self) -> PolarsResult<Vec<(NaiveDate, Option<f64>)>> {
        let df = self.frame.clone().collect()?;
        let dates = df.column(COL_DATE)?.date()?;
        let values = df.column(self.value_column)?.f64()?;

        dates
            .into_iter()
            .zip(values)
            .map(|(days, value)| {
                let date = days.and_then(date_from_epoch_days).ok_or_else(|| {
                    PolarsError::ComputeError("measurement row without a valid date".into())
                })?;
                Ok((date, value))
            })
            .collect()
    }
}
