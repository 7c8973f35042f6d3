//! Resolves the dates every query is anchored to: the latest recorded observation,
//! the one-year window that ends there, and caller-supplied `YYYY-MM-DD` text.

use crate::error::ClimateError;
use crate::store::data_loader::DataStore;
use chrono::{Days, NaiveDate};
use log::warn;

/// Canonical date format accepted from callers and used for output.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Width of the rolling window, in days. Fixed; leap years are not special-cased.
pub const ONE_YEAR_DAYS: u64 = 365;

/// Parses canonical `YYYY-MM-DD` text.
///
/// The shape is checked before parsing, so `2017-8-3`, `+2017-08-03` or text with
/// trailing characters are rejected even though a lenient parser would accept them.
///
/// # Examples
///
/// ```
/// use climate_query::parse_date;
///
/// let date = parse_date("2017-08-23").unwrap();
/// assert_eq!(date.to_string(), "2017-08-23");
/// assert!(parse_date("2017-8-23").is_err());
/// ```
pub fn parse_date(text: &str) -> Result<NaiveDate, ClimateError> {
    let invalid = |source| ClimateError::InvalidDateFormat {
        input: text.to_string(),
        source,
    };

    let bytes = text.as_bytes();
    let canonical_shape = bytes.len() == 10
        && bytes.iter().enumerate().all(|(idx, b)| match idx {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !canonical_shape {
        return Err(invalid(None));
    }

    NaiveDate::parse_from_str(text, DATE_FORMAT).map_err(|e| invalid(Some(e)))
}

/// Start of the window that ends at `latest`.
pub fn window_start_from(latest: NaiveDate) -> Result<NaiveDate, ClimateError> {
    latest
        .checked_sub_days(Days::new(ONE_YEAR_DAYS))
        .ok_or(ClimateError::DateOutOfRange(latest))
}

/// Date lookups against a [`DataStore`].
#[derive(Clone, Copy)]
pub struct DateResolver<'a> {
    store: &'a DataStore,
}

impl<'a> DateResolver<'a> {
    pub fn new(store: &'a DataStore) -> Self {
        Self { store }
    }

    /// The maximum observation date across all measurements.
    ///
    /// # Errors
    ///
    /// Returns [`ClimateError::EmptyDataset`] if the store has no measurements.
    pub fn latest_observation_date(&self) -> Result<NaiveDate, ClimateError> {
        match self.store.max_date()? {
            Some(date) => Ok(date),
            None => {
                warn!("Latest observation date requested but the dataset has no measurements");
                Err(ClimateError::EmptyDataset)
            }
        }
    }

    /// `latest_observation_date() - 365 days`.
    pub fn one_year_window_start(&self) -> Result<NaiveDate, ClimateError> {
        window_start_from(self.latest_observation_date()?)
    }
}
