//! Composable measurement predicates.
//!
//! Every query the facade runs is a conjunction of the same three predicates:
//! station equality, an inclusive lower date bound and an inclusive upper date bound.
//! A [`MeasurementFilter`] compiles to a single polars expression, and can also be
//! evaluated against an in-memory [`Measurement`].

use crate::store::schema::{COL_DATE, COL_STATION};
use crate::types::measurement::Measurement;
use chrono::NaiveDate;
use polars::prelude::{col, lit, Expr, LazyFrame};

/// A single condition on a measurement row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// The measurement belongs to this station.
    Station(String),
    /// The observation date is on or after this date.
    OnOrAfter(NaiveDate),
    /// The observation date is on or before this date.
    OnOrBefore(NaiveDate),
}

impl Predicate {
    pub fn to_expr(&self) -> Expr {
        match self {
            Predicate::Station(id) => col(COL_STATION).eq(lit(id.as_str())),
            Predicate::OnOrAfter(date) => col(COL_DATE).gt_eq(lit(*date)),
            Predicate::OnOrBefore(date) => col(COL_DATE).lt_eq(lit(*date)),
        }
    }

    pub fn matches(&self, measurement: &Measurement) -> bool {
        match self {
            Predicate::Station(id) => measurement.station == *id,
            Predicate::OnOrAfter(date) => measurement.date >= *date,
            Predicate::OnOrBefore(date) => measurement.date <= *date,
        }
    }
}

/// A conjunction of [`Predicate`]s. The empty filter matches every measurement.
///
/// # Examples
///
/// ```
/// use climate_query::MeasurementFilter;
/// use chrono::NaiveDate;
///
/// let start = NaiveDate::from_ymd_opt(2016, 8, 23).unwrap();
/// let filter = MeasurementFilter::all()
///     .station("USC00519281")
///     .on_or_after(start);
/// assert_eq!(filter.predicates().len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MeasurementFilter {
    predicates: Vec<Predicate>,
}

impl MeasurementFilter {
    pub fn all() -> Self {
        Self::default()
    }

    /// Rows dated within `[start, end]`, or on/after `start` when `end` is `None`.
    ///
    /// An `end` earlier than `start` is allowed and matches nothing.
    pub fn between(start: NaiveDate, end: Option<NaiveDate>) -> Self {
        let filter = Self::all().on_or_after(start);
        match end {
            Some(end) => filter.on_or_before(end),
            None => filter,
        }
    }

    pub fn and(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn station(self, id: impl Into<String>) -> Self {
        self.and(Predicate::Station(id.into()))
    }

    pub fn on_or_after(self, date: NaiveDate) -> Self {
        self.and(Predicate::OnOrAfter(date))
    }

    pub fn on_or_before(self, date: NaiveDate) -> Self {
        self.and(Predicate::OnOrBefore(date))
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// The combined expression, or `None` for the empty filter.
    pub fn to_expr(&self) -> Option<Expr> {
        self.predicates
            .iter()
            .map(Predicate::to_expr)
            .reduce(|acc, expr| acc.and(expr))
    }

    pub fn matches(&self, measurement: &Measurement) -> bool {
        self.predicates.iter().all(|p| p.matches(measurement))
    }
}

pub trait MeasurementFrameFilterExt {
    /// Applies `filter` to a measurement LazyFrame.
    /// Assumes the 'station' column is text and the 'date' column is `DataType::Date`.
    ///
    /// # Returns
    /// A new `LazyFrame` with the filter applied; the empty filter returns the frame
    /// unchanged. Evaluation errors surface on `collect`.
    fn filter_measurements(self, filter: &MeasurementFilter) -> LazyFrame;
}

impl MeasurementFrameFilterExt for LazyFrame {
    fn filter_measurements(self, filter: &MeasurementFilter) -> LazyFrame {
        match filter.to_expr() {
            Some(predicate) => self.filter(predicate),
            None => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{date, scenario_measurements};
    use crate::utils::date_from_epoch_days;
    use polars::prelude::*;

    fn measurement_frame() -> PolarsResult<LazyFrame> {
        let rows = scenario_measurements();
        let stations: Vec<&str> = rows.iter().map(|m| m.station.as_str()).collect();
        let dates: Vec<NaiveDate> = rows.iter().map(|m| m.date).collect();
        Ok(df!(
            "station" => stations,
            "date" => dates,
        )?
        .lazy())
    }

    fn collected_dates(frame: LazyFrame) -> PolarsResult<Vec<NaiveDate>> {
        let df = frame.collect()?;
        let dates = df.column("date")?.date()?;
        Ok(dates
            .into_iter()
            .flatten()
            .filter_map(date_from_epoch_days)
            .collect())
    }

    #[test]
    fn test_empty_filter_keeps_every_row() -> PolarsResult<()> {
        let filter = MeasurementFilter::all();
        assert!(filter.to_expr().is_none());
        let df = measurement_frame()?.filter_measurements(&filter).collect()?;
        assert_eq!(df.height(), scenario_measurements().len());
        Ok(())
    }

    #[test]
    fn test_between_is_inclusive_on_both_ends() -> PolarsResult<()> {
        let filter = MeasurementFilter::between(date("2017-08-20"), Some(date("2017-08-23")));
        let dates = collected_dates(measurement_frame()?.filter_measurements(&filter))?;
        assert_eq!(
            dates,
            [date("2017-08-20"), date("2017-08-23"), date("2017-08-23")]
        );
        Ok(())
    }

    #[test]
    fn test_reversed_range_matches_nothing() -> PolarsResult<()> {
        let filter = MeasurementFilter::between(date("2017-08-23"), Some(date("2017-08-20")));
        let df = measurement_frame()?.filter_measurements(&filter).collect()?;
        assert_eq!(df.height(), 0);
        assert!(scenario_measurements().iter().all(|m| !filter.matches(m)));
        Ok(())
    }

    #[test]
    fn test_station_and_lower_bound_compose() -> PolarsResult<()> {
        let filter = MeasurementFilter::all()
            .station("S1")
            .on_or_after(date("2017-08-21"));
        let dates = collected_dates(measurement_frame()?.filter_measurements(&filter))?;
        assert_eq!(dates, [date("2017-08-23")]);
        Ok(())
    }

    #[test]
    fn test_frame_and_in_memory_evaluation_agree() -> PolarsResult<()> {
        let filters = [
            MeasurementFilter::all().station("S2"),
            MeasurementFilter::all().on_or_after(date("2017-08-21")),
            MeasurementFilter::all().on_or_before(date("2017-08-20")),
            MeasurementFilter::between(date("2016-08-24"), None).station("S1"),
        ];
        for filter in filters {
            let expected: Vec<NaiveDate> = scenario_measurements()
                .iter()
                .filter(|m| filter.matches(m))
                .map(|m| m.date)
                .collect();
            let actual = collected_dates(measurement_frame()?.filter_measurements(&filter))?;
            assert_eq!(actual, expected, "filter {:?}", filter);
        }
        Ok(())
    }
}
