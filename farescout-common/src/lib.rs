//! Common types and utilities shared across the farescout crates.
//!
//! This crate defines the shared error taxonomy and the centralised
//! observability helpers used by the rest of the workspace. It is kept
//! lightweight so every member can depend on it without pulling in the
//! browser or HTTP stacks.
//!
//! - [`ScoutError`] and [`Result`]: shared error handling
//! - [`observability`]: centralised tracing/logging initialisation

use thiserror::Error;

pub mod observability;

/// Error types used across the farescout system.
///
/// Step-level failures in the search flow abort the request and surface to
/// the HTTP caller; field- and card-level extraction failures never reach
/// this enum (they degrade to empty values and are only logged).
#[derive(Error, Debug)]
pub enum ScoutError {
    /// The caller's input was rejected before any browser work started.
    #[error("invalid request: {0}")]
    Validation(String),

    /// A form field's autocomplete/settle protocol could not be confirmed.
    #[error("could not confirm {field} selection on the search form")]
    Selection { field: &'static str },

    /// A selector never appeared within its wait window.
    #[error("timed out waiting for {field} selector `{selector}`")]
    SelectorTimeout {
        field: &'static str,
        selector: String,
    },

    /// The browser session reported a transport or protocol error.
    #[error("driver error: {0}")]
    Driver(#[from] anyhow::Error),

    /// Configuration was incomplete or invalid.
    #[error("configuration error: {0}")]
    Config(String),
}

impl ScoutError {
    /// Whether the error is the caller's fault (HTTP 400) rather than ours.
    pub fn is_caller_error(&self) -> bool {
        matches!(self, ScoutError::Validation(_))
    }
}

/// Convenient alias for results that use [`ScoutError`].
pub type Result<T> = std::result::Result<T, ScoutError>;
