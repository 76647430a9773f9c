//! Vinted Search Client Core Library
//!
//! Provides an async API for querying Vinted's catalog search endpoint with
//! the filters of a regular catalog page URL.
//!
//! # Overview
//!
//! This crate provides:
//! - A pure translator from catalog page URLs to `/api/v2/items` querystrings
//! - A per-domain session cookie cache with a 60 second freshness window
//! - A high-level API that fetches cookies and queries the items endpoint
//!
//! # Example
//!
//! ```no_run
//! use vinted_core::{SearchOptions, VintedScraper, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let scraper = VintedScraper::new()?;
//!
//!     let results = scraper
//!         .search(
//!             "https://www.vinted.fr/catalog?catalog[]=5&search_text=red shoes",
//!             &SearchOptions::default(),
//!         )
//!         .await?;
//!
//!     if let Some(items) = results["items"].as_array() {
//!         for item in items {
//!             println!("{}: {}", item["title"], item["url"]);
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Errors
//!
//! Nothing is retried. A body that is not JSON is returned verbatim through
//! [`VintedError::SearchParse`] so callers can inspect rate-limit or error
//! pages themselves.

mod client;
pub mod cookie;
mod error;
mod scraper;
mod types;
pub mod url;
mod user_agent;

// Re-export client types
pub use client::{ClientConfig, SessionCookieName, VintedClient};

// Re-export cookie cache types
pub use cookie::{CachedCookie, Clock, CookieCache, SystemClock, DEFAULT_COOKIE_TTL};

// Re-export error types
pub use error::{Result, VintedError};

// Re-export main scraper API
pub use scraper::VintedScraper;

// Re-export data types
pub use types::{ParamValue, ParameterMap, ParsedUrl, SearchOptions};

// Re-export URL helper functions for convenience
pub use url::{build_homepage_url, build_items_url, parse_vinted_url};

pub use user_agent::random_user_agent;
