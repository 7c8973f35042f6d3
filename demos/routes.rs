use climate_query::api::{available_routes, dispatch};
use climate_query::{ClimateQuery, DEFAULT_DATABASE_PATH};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let climate = ClimateQuery::with_database(DEFAULT_DATABASE_PATH).await?;

    println!("Available routes: {:?}", available_routes());

    for path in [
        "/",
        "/api/v1.0/stations",
        "/api/v1.0/2017-08-01",
        "/api/v1.0/2017-08-01/2017-08-07",
        "/api/v1.0/2017-8-1",
        "/api/v1.0/unknown/route/here",
    ] {
        let response = dispatch(&climate, path);
        println!(
            "GET {path} -> {}\n{}\n",
            response.status,
            serde_json::to_string_pretty(&response.body)?
        );
    }

    Ok(())
}
