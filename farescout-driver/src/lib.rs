//! Driver layer for browser automation.
//!
//! This crate wraps a `fantoccini` WebDriver client behind the small surface
//! the search flow needs: session setup/teardown, bounded selector waits,
//! script execution, and element interaction with flat settle sleeps.
//!
//! - [`scout_browser::driver::ScoutDriver`]: WebDriver session wrapper
//! - [`scout_browser::page::ScoutPage`]: page-level queries and script execution
//! - [`scout_browser::page::ScoutElement`]: element interaction helpers
pub mod scout_browser;
