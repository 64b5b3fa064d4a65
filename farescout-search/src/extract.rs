//! Result extraction: rendered results-page HTML into [`FlightRecord`]s.
//!
//! Extraction is defensive per field (absent descendant → empty string) and
//! isolated per card: each card maps to a result-or-failure, failures are
//! logged with their card index and dropped, and the batch is never aborted
//! by one malformed card. The whole pass fails closed to an empty list only
//! when the card inventory itself cannot be located.

use crate::model::{FlightRecord, NON_STOP};
use crate::selectors;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use tracing::{debug, error, warn};

/// Card-scoped extraction failure. Never escapes this module's batch loop.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("invalid selector {0}")]
    Selector(String),
    #[error("invalid classifier pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// The two legs of a card share one markup schema and are distinguished
/// only by ordinal position within the card, not by any semantic marker.
#[derive(Debug, Clone, Copy)]
enum Leg {
    Origin = 0,
    Destination = 1,
}

/// Precompiled selectors and text classifiers for one extraction pass.
struct CardSelectors {
    card: Selector,
    airline: Selector,
    flight_number: Selector,
    leg_code: Selector,
    leg_time: Selector,
    leg_date: Selector,
    leg_city: Selector,
    origin_terminal: Selector,
    duration: Selector,
    stops: Selector,
    price: Selector,
    promo: Selector,
    baggage: Selector,
    seats: Selector,
    next_day: Selector,
    weight_marker: Regex,
    seat_marker: Regex,
}

impl CardSelectors {
    fn new() -> Result<Self, ExtractError> {
        Ok(Self {
            card: parse(selectors::CARD)?,
            airline: parse(selectors::AIRLINE)?,
            flight_number: parse(selectors::FLIGHT_NUMBER)?,
            leg_code: parse(selectors::LEG_CODE)?,
            leg_time: parse(selectors::LEG_TIME)?,
            leg_date: parse(selectors::LEG_DATE)?,
            leg_city: parse(selectors::LEG_CITY)?,
            origin_terminal: parse(selectors::ORIGIN_TERMINAL)?,
            duration: parse(selectors::DURATION)?,
            stops: parse(selectors::STOPS)?,
            price: parse(selectors::PRICE)?,
            promo: parse(selectors::PROMO)?,
            baggage: parse(selectors::BAGGAGE)?,
            seats: parse(selectors::SEATS)?,
            next_day: parse(selectors::NEXT_DAY)?,
            weight_marker: Regex::new(r"(?i)kgs")?,
            seat_marker: Regex::new(r"(?i)seat")?,
        })
    }

    fn extract_card(&self, card: ElementRef<'_>) -> Result<FlightRecord, ExtractError> {
        let mut record = FlightRecord::default();

        record.airline = first_text(card, &self.airline);
        record.flight_number = first_text(card, &self.flight_number);

        record.origin = leg_text(card, &self.leg_code, Leg::Origin);
        record.origin_city = leg_text(card, &self.leg_city, Leg::Origin);
        record.departure_time = leg_text(card, &self.leg_time, Leg::Origin);
        record.departure_date = leg_text(card, &self.leg_date, Leg::Origin);
        record.origin_terminal = first_text(card, &self.origin_terminal);

        record.destination = leg_text(card, &self.leg_code, Leg::Destination);
        record.destination_city = leg_text(card, &self.leg_city, Leg::Destination);
        record.arrival_time = leg_text(card, &self.leg_time, Leg::Destination);
        record.arrival_date = leg_text(card, &self.leg_date, Leg::Destination);

        record.duration = first_text(card, &self.duration);

        // The sentinel applies only when the stops element is absent; an
        // element with blank text stays blank.
        match card.select(&self.stops).next() {
            Some(el) => {
                record.stops = trimmed_text(el);
                record.layover_info = el
                    .value()
                    .attr(selectors::LAYOVER_ATTR)
                    .map(|v| v.trim().to_string())
                    .unwrap_or_default();
            }
            None => record.stops = NON_STOP.to_string(),
        }

        record.price = first_text(card, &self.price);
        record.promo = first_text(card, &self.promo);

        let (checkin, hand) = classify_baggage(
            &self.weight_marker,
            card.select(&self.baggage).map(trimmed_text),
        );
        record.checkin_baggage = checkin;
        record.hand_baggage = hand;

        record.available_seats = match card.select(&self.seats).next().map(trimmed_text) {
            Some(text) if self.seat_marker.is_match(&text) => text,
            _ => String::new(),
        };

        record.next_day_arrival = first_text(card, &self.next_day);

        Ok(record)
    }
}

fn parse(css: &str) -> Result<Selector, ExtractError> {
    Selector::parse(css).map_err(|e| ExtractError::Selector(format!("`{css}`: {e}")))
}

fn trimmed_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

fn first_text(card: ElementRef<'_>, selector: &Selector) -> String {
    card.select(selector).next().map(trimmed_text).unwrap_or_default()
}

fn leg_text(card: ElementRef<'_>, selector: &Selector, leg: Leg) -> String {
    card.select(selector)
        .nth(leg as usize)
        .map(trimmed_text)
        .unwrap_or_default()
}

/// Classify weight-marked strings into check-in and hand baggage.
///
/// A `/`-separated string contributes its front half to check-in; otherwise
/// the first unclassified hit is check-in and the second is hand baggage.
/// The ordering heuristic is inherited from the source markup, which offers
/// no structural distinction between the two.
fn classify_baggage(
    weight_marker: &Regex,
    texts: impl IntoIterator<Item = String>,
) -> (String, String) {
    let mut checkin = String::new();
    let mut hand = String::new();

    for text in texts {
        if !weight_marker.is_match(&text) {
            continue;
        }
        if let Some((front, _)) = text.split_once('/') {
            checkin = front.trim().to_string();
        } else if checkin.is_empty() {
            checkin = text;
        } else {
            hand = text;
        }
    }

    (checkin, hand)
}

/// Per-card isolation: map every card through `extract_card`, keep the
/// successes in document order, and log-and-drop the failures.
fn collect_cards<'a, I, F>(cards: I, mut extract_card: F) -> Vec<FlightRecord>
where
    I: Iterator<Item = ElementRef<'a>>,
    F: FnMut(ElementRef<'a>) -> Result<FlightRecord, ExtractError>,
{
    cards
        .enumerate()
        .filter_map(|(index, card)| match extract_card(card) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!(card = index, %err, "skipping card that failed extraction");
                None
            }
        })
        .collect()
}

/// Extract every flight card from a captured results page.
///
/// Returns records in document order, duplicates preserved. Degrades to an
/// empty list (never an error) when the card inventory cannot be located.
pub fn extract_flights(html: &str) -> Vec<FlightRecord> {
    let sels = match CardSelectors::new() {
        Ok(sels) => sels,
        Err(err) => {
            error!(%err, "flight extraction failed before locating cards");
            return Vec::new();
        }
    };

    let document = Html::parse_document(html);
    let records = collect_cards(document.select(&sels.card), |card| sels.extract_card(card));
    debug!(cards = records.len(), "extracted flight cards");
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weight_marker() -> Regex {
        Regex::new(r"(?i)kgs").unwrap()
    }

    #[test]
    fn slash_separated_baggage_keeps_the_front_half_as_checkin() {
        let (checkin, hand) =
            classify_baggage(&weight_marker(), vec!["20 Kgs/7 Kgs".to_string()]);
        assert_eq!(checkin, "20 Kgs");
        assert_eq!(hand, "");
    }

    #[test]
    fn bare_baggage_strings_fill_checkin_then_hand() {
        let (checkin, hand) = classify_baggage(
            &weight_marker(),
            vec!["15 Kgs".to_string(), "7 Kgs".to_string()],
        );
        assert_eq!(checkin, "15 Kgs");
        assert_eq!(hand, "7 Kgs");
    }

    #[test]
    fn unmarked_strings_are_ignored() {
        let (checkin, hand) = classify_baggage(
            &weight_marker(),
            vec!["Free meal".to_string(), "20 Kgs".to_string(), "Wifi".to_string()],
        );
        assert_eq!(checkin, "20 Kgs");
        assert_eq!(hand, "");
    }

    #[test]
    fn a_failing_card_never_loses_the_rest_of_the_batch() {
        let html = Html::parse_document(
            r#"<div class="card-body">a</div>
               <div class="card-body">b</div>
               <div class="card-body">c</div>"#,
        );
        let card_sel = Selector::parse(".card-body").unwrap();

        let mut seen = 0usize;
        let records = collect_cards(html.select(&card_sel), |card| {
            seen += 1;
            if trimmed_text(card) == "b" {
                Err(ExtractError::Selector("injected".into()))
            } else {
                Ok(FlightRecord {
                    airline: trimmed_text(card),
                    ..FlightRecord::default()
                })
            }
        });

        assert_eq!(seen, 3, "every card must still be visited");
        let airlines: Vec<_> = records.iter().map(|r| r.airline.as_str()).collect();
        assert_eq!(airlines, ["a", "c"]);
    }

    #[test]
    fn no_cards_extracts_an_empty_sequence() {
        assert!(extract_flights("<html><body><p>no results</p></body></html>").is_empty());
    }
}
