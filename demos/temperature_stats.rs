use climate_query::{ClimateError, ClimateQuery, DEFAULT_DATABASE_PATH};
use std::env;

#[tokio::main]
async fn main() -> Result<(), ClimateError> {
    let mut args = env::args().skip(1);
    let start = args.next().unwrap_or_else(|| "2017-01-01".to_string());
    let end = args.next();

    let climate = ClimateQuery::with_database(DEFAULT_DATABASE_PATH).await?;
    let engine = climate.engine();

    println!("Measurements per station:");
    for (station, count) in engine.station_activity()? {
        println!("  {station}: {count}");
    }

    let latest = climate.date_resolver().latest_observation_date()?;
    let tobs = climate.get_tobs()?;
    println!(
        "{} temperature observations for {} in the year up to {}",
        tobs.len(),
        engine.most_active_station()?,
        latest
    );

    let stats = climate
        .get_stats()
        .start(&start)
        .maybe_end(end.as_deref())
        .call()?;
    println!("From {start} to {}: {:?}", end.as_deref().unwrap_or("latest"), stats[0]);

    Ok(())
}
