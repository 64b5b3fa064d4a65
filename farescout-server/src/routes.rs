//! Request handlers.
//!
//! Callers always receive a well-formed JSON envelope: validation problems
//! are a 400 with a descriptive message, step-level search failures a 500,
//! and partial extraction loss is silent (empty strings in the records),
//! never an error.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use farescout_search::model::DATE_FORMAT;
use farescout_search::SearchRequest;
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use crate::app::AppState;

/// `GET /` — static service descriptor.
pub async fn service_descriptor() -> Json<serde_json::Value> {
    Json(json!({
        "service": "farescout",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "/flight-search":
                "Search for flights with query parameters: origin, destination, journey_date"
        }
    }))
}

#[derive(Debug, Deserialize)]
pub struct FlightSearchParams {
    #[serde(default)]
    origin: String,
    #[serde(default)]
    destination: String,
    #[serde(default)]
    journey_date: String,
}

/// `GET /flight-search?origin=&destination=&journey_date=`
pub async fn flight_search(
    State(state): State<AppState>,
    Query(params): Query<FlightSearchParams>,
) -> Response {
    let request =
        match SearchRequest::new(&params.origin, &params.destination, &params.journey_date) {
            Ok(request) => request,
            Err(err) => return error_response(StatusCode::BAD_REQUEST, &err.to_string()),
        };

    // Each search runs start-to-finish on its own task with its own browser
    // session, keeping the accept loop free for other requests.
    let searcher = state.searcher.clone();
    let task_request = request.clone();
    let outcome = tokio::spawn(async move { searcher.search(&task_request).await }).await;

    let flights = match outcome {
        Ok(Ok(flights)) => flights,
        Ok(Err(err)) => {
            error!(%err, "flight search failed");
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &format!("error scraping flights: {err}"),
            );
        }
        Err(err) => {
            error!(%err, "search task aborted");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "search task aborted");
        }
    };

    let journey_date = request.journey_date.format(DATE_FORMAT).to_string();
    let body = if flights.is_empty() {
        json!({
            "origin": request.origin,
            "destination": request.destination,
            "journey_date": journey_date,
            "flights": [],
            "message": "No flights found for the given search criteria",
        })
    } else {
        json!({
            "origin": request.origin,
            "destination": request.destination,
            "journey_date": journey_date,
            "total_flights": flights.len(),
            "flights": flights,
        })
    };
    (StatusCode::OK, Json(body)).into_response()
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
