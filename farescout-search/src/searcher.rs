//! The search seam the HTTP layer consumes.

use crate::extract::extract_flights;
use crate::form::FormDriver;
use crate::model::{FlightRecord, SearchRequest};
use async_trait::async_trait;
use farescout_common::Result;
use farescout_config::{SearchConfig, WebDriverConfig};
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

/// One complete search: form driving plus extraction.
///
/// Implementations must be safe to call concurrently; every call runs on
/// its own isolated browser session.
#[async_trait]
pub trait FlightSearch: Send + Sync {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<FlightRecord>>;
}

/// Fantoccini-backed searcher over the configured target site.
pub struct BrowserFlightSearch {
    webdriver: WebDriverConfig,
    search: SearchConfig,
}

impl BrowserFlightSearch {
    pub fn new(webdriver: WebDriverConfig, search: SearchConfig) -> Self {
        Self { webdriver, search }
    }
}

#[async_trait]
impl FlightSearch for BrowserFlightSearch {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<FlightRecord>> {
        let search_id = Uuid::new_v4();
        let span = info_span!(
            "flight_search",
            %search_id,
            origin = %request.origin,
            destination = %request.destination,
            journey_date = %request.journey_date,
        );

        async {
            let capture = FormDriver::new(&self.webdriver, &self.search)
                .run(request)
                .await?;
            let flights = extract_flights(&capture.html);
            info!(
                flights = flights.len(),
                checksum = %capture.checksum,
                "search complete"
            );
            Ok(flights)
        }
        .instrument(span)
        .await
    }
}
