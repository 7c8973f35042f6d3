use climate_query::{ClimateError, ClimateQuery, DataSource, DEFAULT_DATABASE_PATH};
use polars::prelude::*;
use std::env;

#[tokio::main]
async fn main() -> Result<(), ClimateError> {
    configure_polars_display();
    let path = env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_DATABASE_PATH.to_string());
    let climate = ClimateQuery::open(DataSource::sqlite(path)).await?;

    for station in climate.stations()? {
        println!(
            "{:<12} {:<45} elev {:?}",
            station.id, station.name, station.location.elevation
        );
    }

    let precipitation = climate.get_precipitation()?;
    let recorded = precipitation.values().filter(|p| p.is_some()).count();
    println!(
        "{} days of precipitation in the last year, {} with a recorded value",
        precipitation.len(),
        recorded
    );

    // The raw frames are plain polars, so anything polars can do works on them too.
    let wettest = climate
        .store()
        .measurements()
        .sort(
            ["prcp"],
            SortMultipleOptions::default()
                .with_order_descending(true)
                .with_nulls_last(true),
        )
        .limit(5)
        .collect()?;
    println!("{}", wettest);

    Ok(())
}

fn configure_polars_display() {
    // show every column
    env::set_var("POLARS_FMT_MAX_COLS", "-1");
    // show 20 rows
    env::set_var("POLARS_FMT_MAX_ROWS", "20");
}
