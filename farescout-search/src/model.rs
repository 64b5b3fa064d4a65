//! Domain types for one search pass.

use chrono::NaiveDate;
use farescout_common::{Result, ScoutError};
use serde::{Deserialize, Serialize};

/// Wire format for the journey date, e.g. `2025-10-18`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Sentinel used when a card carries no stops information at all.
pub const NON_STOP: &str = "Non-stop";

/// A validated search query. Constructed per incoming call and discarded
/// after use.
#[derive(Debug, Clone, Serialize)]
pub struct SearchRequest {
    pub origin: String,
    pub destination: String,
    pub journey_date: NaiveDate,
}

impl SearchRequest {
    /// Validate raw caller input into a request.
    ///
    /// The journey date must be a real calendar date in `YYYY-MM-DD` form
    /// and both city names must be non-empty; anything else is rejected
    /// before any browser work starts.
    pub fn new(origin: &str, destination: &str, journey_date: &str) -> Result<Self> {
        let origin = origin.trim();
        let destination = destination.trim();
        if origin.is_empty() {
            return Err(ScoutError::Validation("origin city must not be empty".into()));
        }
        if destination.is_empty() {
            return Err(ScoutError::Validation(
                "destination city must not be empty".into(),
            ));
        }

        let journey_date = NaiveDate::parse_from_str(journey_date, DATE_FORMAT).map_err(|_| {
            ScoutError::Validation(format!(
                "invalid journey date `{journey_date}`; use YYYY-MM-DD (e.g. 2025-10-18)"
            ))
        })?;

        Ok(Self {
            origin: origin.to_string(),
            destination: destination.to_string(),
            journey_date,
        })
    }
}

/// One flight offer scraped from a results card.
///
/// Extraction is best-effort per field: absent data is the empty string and
/// no field is guaranteed non-empty. Records appear in document order and
/// duplicate listings are preserved as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightRecord {
    pub airline: String,
    pub flight_number: String,
    pub origin: String,
    pub origin_city: String,
    pub departure_time: String,
    pub departure_date: String,
    pub origin_terminal: String,
    pub destination: String,
    pub destination_city: String,
    pub arrival_time: String,
    pub arrival_date: String,
    pub duration: String,
    pub stops: String,
    pub layover_info: String,
    pub price: String,
    pub promo: String,
    pub checkin_baggage: String,
    pub hand_baggage: String,
    pub available_seats: String,
    pub next_day_arrival: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn valid_date_parses_and_keeps_day_of_month() {
        let req = SearchRequest::new("Bangalore", "Delhi", "2025-10-18").unwrap();
        assert_eq!(req.journey_date.day(), 18);
        assert_eq!(req.origin, "Bangalore");
    }

    #[test]
    fn malformed_dates_are_rejected() {
        for raw in ["2025/10/18", "18-10-2025", "", "2025-13-01", "2025-02-30", "next tuesday"] {
            let err = SearchRequest::new("Bangalore", "Delhi", raw).unwrap_err();
            assert!(err.is_caller_error(), "{raw} should be a caller error");
        }
    }

    #[test]
    fn blank_cities_are_rejected() {
        assert!(SearchRequest::new("  ", "Delhi", "2025-10-18").is_err());
        assert!(SearchRequest::new("Bangalore", "", "2025-10-18").is_err());
    }

    #[test]
    fn city_names_are_trimmed() {
        let req = SearchRequest::new(" Bangalore ", " Delhi", "2025-10-18").unwrap();
        assert_eq!(req.origin, "Bangalore");
        assert_eq!(req.destination, "Delhi");
    }
}
