//! HTTP surface for the flight-search core.
//!
//! Two routes: a static service descriptor at `/` and the search endpoint at
//! `/flight-search`. The searcher is injected behind the
//! [`farescout_search::FlightSearch`] trait so handler tests run against a
//! stub instead of a browser.

pub mod app;
pub mod routes;

pub use app::{build_router, AppState};
