//! Response shapes returned by the query facade.
//!
//! Field names serialize to the exact keys the `/api/v1.0` routes publish, so a
//! boundary layer only has to hand these values to `serde_json`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Precipitation keyed by observation date.
///
/// A `None` value is a measurement whose precipitation was not recorded; it is kept
/// in the map and serializes as `null`.
pub type PrecipitationByDate = BTreeMap<NaiveDate, Option<f64>>;

/// One entry of the station directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationEntry {
    #[serde(rename = "Station")]
    pub station: String,
    #[serde(rename = "Name")]
    pub name: String,
}

/// A dated temperature reading for a single station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureObservation {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Temperature")]
    pub temperature: Option<f64>,
}

/// Minimum, mean and maximum observed temperature over an aggregation window.
///
/// All three fields are `None` when no measurement with a recorded temperature falls
/// inside the window.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TemperatureStats {
    #[serde(rename = "Min Temperature")]
    pub min: Option<f64>,
    #[serde(rename = "Avg Temperature")]
    pub avg: Option<f64>,
    #[serde(rename = "Max Temperature")]
    pub max: Option<f64>,
}

impl TemperatureStats {
    /// Returns `true` if the window contained no usable temperature.
    pub fn is_empty(&self) -> bool {
        self.min.is_none() && self.avg.is_none() && self.max.is_none()
    }
}
