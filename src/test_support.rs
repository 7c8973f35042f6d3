//! Shared fixtures for unit tests.

use crate::store::data_loader::DataStore;
use crate::types::measurement::Measurement;
use crate::types::station::{Location, Station};
use chrono::NaiveDate;

pub(crate) fn date(text: &str) -> NaiveDate {
    NaiveDate::parse_from_str(text, "%Y-%m-%d").expect("fixture dates are valid")
}

pub(crate) fn scenario_stations() -> Vec<Station> {
    vec![
        Station::new(
            "S1",
            "Station One",
            Location {
                latitude: Some(21.2716),
                longitude: Some(-157.8168),
                elevation: Some(3.0),
            },
        ),
        Station::new(
            "S2",
            "Station Two",
            Location {
                latitude: Some(21.4234),
                longitude: Some(-157.8015),
                elevation: None,
            },
        ),
    ]
}

/// The three-row scenario plus one row just before the one-year window.
pub(crate) fn scenario_measurements() -> Vec<Measurement> {
    vec![
        Measurement::new("S1", date("2016-08-23"), Some(0.2), Some(68.0)),
        Measurement::new("S1", date("2017-08-20"), Some(1.0), Some(70.0)),
        Measurement::new("S1", date("2017-08-23"), Some(0.5), Some(75.0)),
        Measurement::new("S2", date("2017-08-23"), Some(2.0), Some(80.0)),
    ]
}

pub(crate) fn scenario_store() -> DataStore {
    DataStore::from_records(&scenario_stations(), &scenario_measurements())
        .expect("fixture records conform to the schema")
}

pub(crate) fn store_with(measurements: &[Measurement]) -> DataStore {
    DataStore::from_records(&scenario_stations(), measurements)
        .expect("fixture records conform to the schema")
}
