use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One daily observation tied to a station.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Measurement {
    pub station: String,            // station
    pub date: NaiveDate,            // date
    pub precipitation: Option<f64>, // prcp
    pub temperature: Option<f64>,   // tobs
}

impl Measurement {
    pub fn new(
        station: impl Into<String>,
        date: NaiveDate,
        precipitation: Option<f64>,
        temperature: Option<f64>,
    ) -> Self {
        Self {
            station: station.into(),
            date,
            precipitation,
            temperature,
        }
    }
}
