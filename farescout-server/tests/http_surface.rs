//! Endpoint behavior against a stubbed searcher.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use farescout_common::{Result, ScoutError};
use farescout_search::{FlightRecord, FlightSearch, SearchRequest};
use farescout_server::build_router;
use serde_json::Value;
use tower::ServiceExt;

enum StubOutcome {
    Flights(Vec<FlightRecord>),
    Fail,
}

struct StubSearch {
    calls: AtomicUsize,
    outcome: StubOutcome,
}

impl StubSearch {
    fn new(outcome: StubOutcome) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            outcome,
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FlightSearch for StubSearch {
    async fn search(&self, _request: &SearchRequest) -> Result<Vec<FlightRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.outcome {
            StubOutcome::Flights(flights) => Ok(flights.clone()),
            StubOutcome::Fail => Err(ScoutError::Selection { field: "origin" }),
        }
    }
}

fn sample_flight(airline: &str) -> FlightRecord {
    FlightRecord {
        airline: airline.to_string(),
        price: "₹ 5,230".to_string(),
        ..FlightRecord::default()
    }
}

async fn get(router: axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn root_serves_the_service_descriptor() {
    let stub = StubSearch::new(StubOutcome::Flights(vec![]));
    let (status, body) = get(build_router(stub), "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["service"], "farescout");
    assert!(body["endpoints"]["/flight-search"].is_string());
}

#[tokio::test]
async fn malformed_date_is_rejected_without_invoking_the_searcher() {
    let stub = StubSearch::new(StubOutcome::Flights(vec![sample_flight("IndiGo")]));
    let router = build_router(stub.clone());

    for date in ["2025/10/18", "18-10-2025", ""] {
        let uri = format!(
            "/flight-search?origin=Bangalore&destination=Delhi&journey_date={date}"
        );
        let (status, body) = get(router.clone(), &uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "date: {date:?}");
        assert!(
            body["error"].as_str().unwrap().contains("journey date"),
            "date: {date:?}"
        );
    }
    assert_eq!(stub.calls(), 0, "form driver must never start");
}

#[tokio::test]
async fn blank_cities_are_rejected() {
    let stub = StubSearch::new(StubOutcome::Flights(vec![]));
    let (status, _) = get(
        build_router(stub.clone()),
        "/flight-search?origin=&destination=Delhi&journey_date=2025-10-18",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(stub.calls(), 0);
}

#[tokio::test]
async fn empty_results_respond_200_with_a_message_and_no_total() {
    let stub = StubSearch::new(StubOutcome::Flights(vec![]));
    let (status, body) = get(
        build_router(stub),
        "/flight-search?origin=Bangalore&destination=Delhi&journey_date=2025-10-18",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["flights"].as_array().unwrap().len(), 0);
    assert!(body["message"].is_string());
    assert!(body.get("total_flights").is_none());
}

#[tokio::test]
async fn results_echo_the_query_and_carry_a_total() {
    let stub = StubSearch::new(StubOutcome::Flights(vec![
        sample_flight("IndiGo"),
        sample_flight("Air India"),
    ]));
    let (status, body) = get(
        build_router(stub),
        "/flight-search?origin=Bangalore&destination=Delhi&journey_date=2025-10-18",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["origin"], "Bangalore");
    assert_eq!(body["destination"], "Delhi");
    assert_eq!(body["journey_date"], "2025-10-18");
    assert_eq!(body["total_flights"], 2);
    assert_eq!(body["flights"][0]["airline"], "IndiGo");
    assert_eq!(body["flights"][1]["airline"], "Air India");
    assert!(body.get("message").is_none());
}

#[tokio::test]
async fn search_failure_surfaces_as_500_with_the_error_text() {
    let stub = StubSearch::new(StubOutcome::Fail);
    let (status, body) = get(
        build_router(stub),
        "/flight-search?origin=Bangalore&destination=Delhi&journey_date=2025-10-18",
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("origin"));
}
