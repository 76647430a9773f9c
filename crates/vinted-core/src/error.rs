//! Error types for the Vinted search client
//!
//! Mirrors the four failure modes of a search call plus client construction.
//! Every error is terminal for the call that produced it; nothing here is
//! retried.

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Error type for all Vinted client operations
///
/// Implements Display for human-readable messages and Serialize
/// for Tauri command compatibility.
#[derive(Error, Debug)]
pub enum VintedError {
    /// HTTP client could not be constructed
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Search URL does not point at a Vinted catalog page
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Homepage request failed or carried no session cookie
    ///
    /// `detail` is kept for logs; the message stays fixed.
    #[error("Could not fetch cookie")]
    CookieFetch { detail: String },

    /// Network failure while calling the items endpoint
    #[error("Can not fetch search API")]
    SearchNetwork(#[source] reqwest::Error),

    /// Items endpoint answered with something that is not JSON
    ///
    /// Holds the raw body untouched (HTML error page, rate-limit notice, ...).
    #[error("{0}")]
    SearchParse(String),
}

impl VintedError {
    pub(crate) fn cookie_fetch(detail: impl Into<String>) -> Self {
        Self::CookieFetch {
            detail: detail.into(),
        }
    }
}

impl Serialize for VintedError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// Result type alias for Vinted operations
pub type Result<T> = std::result::Result<T, VintedError>;
