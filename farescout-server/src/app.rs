//! Router setup and shared application state.

use std::sync::Arc;

use axum::{routing::get, Router};
use farescout_search::FlightSearch;
use tower_http::trace::TraceLayer;

use crate::routes;

/// Shared application state: the searcher behind its trait seam.
#[derive(Clone)]
pub struct AppState {
    pub searcher: Arc<dyn FlightSearch>,
}

/// Build the axum router with request tracing attached.
pub fn build_router(searcher: Arc<dyn FlightSearch>) -> Router {
    Router::new()
        .route("/", get(routes::service_descriptor))
        .route("/flight-search", get(routes::flight_search))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { searcher })
}
