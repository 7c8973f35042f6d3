//! Framework-agnostic route table for the `/api/v1.0` endpoints.
//!
//! [`dispatch`] maps a request path to a facade call and renders the JSON body and
//! HTTP status an HTTP layer would send. No server is bundled; any framework can wrap
//! this in a single handler.

use crate::climate::ClimateQuery;
use crate::error::ClimateError;
use log::{debug, error};
use serde::Serialize;
use serde_json::{json, Value};

pub const API_PREFIX: &str = "/api/v1.0";

/// A recognised request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Precipitation,
    Stations,
    Tobs,
    /// Temperature statistics. The date texts are validated when the route runs.
    Stats { start: String, end: Option<String> },
}

impl Route {
    /// Parses a request path. A single trailing slash is ignored.
    ///
    /// Returns `None` for paths outside the route table.
    pub fn parse(path: &str) -> Option<Route> {
        if path.is_empty() || path == "/" {
            return Some(Route::Home);
        }
        let path = path.strip_suffix('/').unwrap_or(path);
        let rest = path.strip_prefix(API_PREFIX)?.strip_prefix('/')?;

        let segments: Vec<&str> = rest.split('/').collect();
        match segments.as_slice() {
            ["precipitation"] => Some(Route::Precipitation),
            ["stations"] => Some(Route::Stations),
            ["tobs"] => Some(Route::Tobs),
            [start] if !start.is_empty() => Some(Route::Stats {
                start: start.to_string(),
                end: None,
            }),
            [start, end] if !start.is_empty() && !end.is_empty() => Some(Route::Stats {
                start: start.to_string(),
                end: Some(end.to_string()),
            }),
            _ => None,
        }
    }
}

/// Status code and JSON body for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    fn ok<T: Serialize>(payload: &T) -> Self {
        match serde_json::to_value(payload) {
            Ok(body) => Self { status: 200, body },
            Err(e) => Self::error(500, &e.to_string()),
        }
    }

    fn error(status: u16, message: &str) -> Self {
        Self {
            status,
            body: json!({ "error": message }),
        }
    }

    fn from_error(err: &ClimateError) -> Self {
        if err.is_client_error() {
            debug!("Rejected request: {}", err);
            Self::error(400, &err.to_string())
        } else {
            error!("Request failed: {}", err);
            Self::error(500, &err.to_string())
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The paths listed on the home route, with `<start>`/`<end>` placeholders.
pub fn available_routes() -> Vec<String> {
    vec![
        format!("{API_PREFIX}/precipitation"),
        format!("{API_PREFIX}/stations"),
        format!("{API_PREFIX}/tobs"),
        format!("{API_PREFIX}/<start>"),
        format!("{API_PREFIX}/<start>/<end>"),
    ]
}

/// Runs the facade call behind `path`.
///
/// 200 on success, 400 for malformed dates, 404 for unknown paths and 500 for
/// everything else. Error bodies are `{"error": "<message>"}`.
pub fn dispatch(climate: &ClimateQuery, path: &str) -> ApiResponse {
    let Some(route) = Route::parse(path) else {
        debug!("No route for {}", path);
        return ApiResponse::error(404, &format!("No route for {path}"));
    };

    let result = match &route {
        Route::Home => Ok(ApiResponse::ok(
            &json!({ "available_routes": available_routes() }),
        )),
        Route::Precipitation => climate.get_precipitation().map(|p| ApiResponse::ok(&p)),
        Route::Stations => climate.get_stations().map(|s| ApiResponse::ok(&s)),
        Route::Tobs => climate.get_tobs().map(|t| ApiResponse::ok(&t)),
        Route::Stats { start, end } => climate
            .get_stats()
            .start(start)
            .maybe_end(end.as_deref())
            .call()
            .map(|s| ApiResponse::ok(&s)),
    };

    result.unwrap_or_else(|e| ApiResponse::from_error(&e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{scenario_store, store_with};

    fn scenario() -> ClimateQuery {
        ClimateQuery::from_store(scenario_store())
    }

    #[test]
    fn test_route_parse() {
        assert_eq!(Route::parse("/"), Some(Route::Home));
        assert_eq!(
            Route::parse("/api/v1.0/precipitation"),
            Some(Route::Precipitation)
        );
        assert_eq!(Route::parse("/api/v1.0/stations/"), Some(Route::Stations));
        assert_eq!(Route::parse("/api/v1.0/tobs"), Some(Route::Tobs));
        assert_eq!(
            Route::parse("/api/v1.0/2017-01-01"),
            Some(Route::Stats {
                start: "2017-01-01".to_string(),
                end: None
            })
        );
        assert_eq!(
            Route::parse("/api/v1.0/2017-01-01/2017-02-01"),
            Some(Route::Stats {
                start: "2017-01-01".to_string(),
                end: Some("2017-02-01".to_string())
            })
        );
        assert_eq!(Route::parse("/api/v1.0"), None);
        assert_eq!(Route::parse("/api/v1.0/"), None);
        assert_eq!(Route::parse("/api/v1.0/a/b/c"), None);
        assert_eq!(Route::parse("/api/v1.0//2017-01-01"), None);
        assert_eq!(Route::parse("/api/v2.0/tobs"), None);
        assert_eq!(Route::parse("/api/v1.0tobs"), None);
    }

    #[test]
    fn test_home_lists_routes() {
        let response = dispatch(&scenario(), "/");
        assert_eq!(response.status, 200);
        assert_eq!(response.body["available_routes"][0], "/api/v1.0/precipitation");
        assert_eq!(
            response.body["available_routes"]
                .as_array()
                .map(Vec::len),
            Some(5)
        );
    }

    #[test]
    fn test_data_routes() {
        let climate = scenario();

        let response = dispatch(&climate, "/api/v1.0/precipitation");
        assert_eq!(response.status, 200);
        assert_eq!(response.body["2017-08-20"], 1.0);

        let response = dispatch(&climate, "/api/v1.0/stations");
        assert_eq!(
            response.body,
            json!([
                {"Station": "S1", "Name": "Station One"},
                {"Station": "S2", "Name": "Station Two"}
            ])
        );

        let response = dispatch(&climate, "/api/v1.0/tobs");
        assert!(response.is_success());
        assert_eq!(
            response.body[0],
            json!({"Date": "2016-08-23", "Temperature": 68.0})
        );
    }

    #[test]
    fn test_stats_route() {
        let response = dispatch(&scenario(), "/api/v1.0/2017-08-20/2017-08-23");
        assert_eq!(response.status, 200);
        assert_eq!(
            response.body,
            json!([{
                "Min Temperature": 70.0,
                "Avg Temperature": 75.0,
                "Max Temperature": 80.0
            }])
        );
    }

    #[test]
    fn test_error_statuses() {
        let climate = scenario();

        let response = dispatch(&climate, "/api/v1.0/2017-8-20");
        assert_eq!(response.status, 400);
        assert!(response.body["error"].is_string());

        let response = dispatch(&climate, "/nowhere");
        assert_eq!(response.status, 404);

        let empty = ClimateQuery::from_store(store_with(&[]));
        let response = dispatch(&empty, "/api/v1.0/tobs");
        assert_eq!(response.status, 500);
        assert_eq!(
            response.body,
            json!({"error": "Dataset contains no measurements"})
        );
    }
}
