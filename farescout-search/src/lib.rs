//! Flight-search core: form driving and result extraction.
//!
//! One search runs as a strictly sequential flow on its own browser session:
//! the form driver ([`form`]) brings a fresh session to a rendered results
//! page and snapshots it, then the extractor ([`extract`]) turns that
//! snapshot into ordered [`model::FlightRecord`]s. The [`searcher`] module
//! binds the two behind the [`searcher::FlightSearch`] trait the HTTP layer
//! consumes.

pub mod extract;
pub mod form;
pub mod model;
pub mod searcher;
pub mod selectors;

pub use model::{FlightRecord, SearchRequest};
pub use searcher::{BrowserFlightSearch, FlightSearch};
