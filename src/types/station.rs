//! Defines the data structures representing weather stations in the climate dataset.

use serde::{Deserialize, Serialize};

/// A single weather-observation site.
///
/// Loaded once from the data store and never mutated afterwards. The `id` is the
/// key that [`crate::Measurement::station`] refers to.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Station {
    /// The unique station identifier (e.g. "USC00519281").
    pub id: String,
    /// Human readable station name (e.g. "WAIHEE 837.5, HI US").
    pub name: String,
    /// Geographical location details (latitude, longitude, elevation).
    pub location: Location,
}

/// Represents the geographical location of a weather station.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Location {
    /// Latitude in decimal degrees (positive for North, negative for South), if recorded.
    pub latitude: Option<f64>,
    /// Longitude in decimal degrees (positive for East, negative for West), if recorded.
    pub longitude: Option<f64>,
    /// Elevation above sea level, if recorded.
    pub elevation: Option<f64>,
}

impl Station {
    pub fn new(id: impl Into<String>, name: impl Into<String>, location: Location) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            location,
        }
    }
}
