//! Main search API for Vinted
//!
//! Provides the high-level API combining URL translation, the session
//! cookie cache and the HTTP client.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::client::{ClientConfig, VintedClient};
use crate::cookie::CookieCache;
use crate::error::{Result, VintedError};
use crate::types::{ParsedUrl, SearchOptions};
use crate::url::parse_vinted_url;

/// Main search API for Vinted
///
/// Combines the HTTP client with a per-domain cookie cache to turn a
/// catalog page URL into items API results.
pub struct VintedScraper {
    client: VintedClient,
    cookies: Arc<CookieCache>,
}

impl VintedScraper {
    /// Create a new scraper with default configuration and its own cache
    ///
    /// # Errors
    /// Returns error if HTTP client initialization fails
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new scraper with custom client configuration
    ///
    /// # Errors
    /// Returns error if HTTP client initialization fails
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        Self::with_cache(config, Arc::new(CookieCache::new()))
    }

    /// Create a new scraper sharing an existing cookie cache
    ///
    /// # Arguments
    /// * `config` - Custom client configuration
    /// * `cookies` - Cache shared with other scrapers
    ///
    /// # Errors
    /// Returns error if HTTP client initialization fails
    pub fn with_cache(config: ClientConfig, cookies: Arc<CookieCache>) -> Result<Self> {
        let client = VintedClient::with_config(config)?;
        Ok(Self { client, cookies })
    }

    /// Cookie cache used by this scraper
    pub fn cache(&self) -> &Arc<CookieCache> {
        &self.cookies
    }

    /// Translate a catalog URL without touching the network
    pub fn parse_url(&self, url: &str, options: &SearchOptions) -> ParsedUrl {
        parse_vinted_url(
            url,
            options.disable_order,
            options.allow_swap,
            &options.custom_params,
        )
    }

    /// Get a session cookie for `domain`
    ///
    /// Returns the cached cookie while it is fresh; otherwise fetches a new
    /// one from the homepage and stores it.
    ///
    /// # Errors
    /// - `CookieFetch` if the homepage request fails or sets no session cookie
    pub async fn get_cookie(&self, domain: &str) -> Result<String> {
        if let Some(cookie) = self.cookies.get(domain).await {
            debug!(domain, "reusing cached session cookie");
            return Ok(cookie);
        }

        let cookie = self.client.fetch_cookie(domain).await?;
        self.cookies.insert(domain, cookie.clone()).await;
        Ok(cookie)
    }

    /// Search the items API with the filters of a catalog page URL
    ///
    /// # Arguments
    /// * `url` - Catalog page URL (e.g., `https://www.vinted.fr/catalog?search_text=shoes`)
    /// * `options` - Custom parameter overrides and reserved flags
    ///
    /// # Returns
    /// The items API response as JSON
    ///
    /// # Errors
    /// - `InvalidUrl` if the URL is not a Vinted catalog URL
    /// - `CookieFetch` if no session cookie could be obtained
    /// - `SearchNetwork` if the items request fails
    /// - `SearchParse` if the response is not JSON (carries the raw body)
    ///
    /// # Example
    /// ```no_run
    /// # async fn example() -> vinted_core::Result<()> {
    /// use vinted_core::{SearchOptions, VintedScraper};
    /// let scraper = VintedScraper::new()?;
    /// let options = SearchOptions::default().with_param("per_page", "20");
    /// let results = scraper
    ///     .search("https://www.vinted.fr/catalog?search_text=shoes", &options)
    ///     .await?;
    /// println!("{}", results["items"]);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn search(&self, url: &str, options: &SearchOptions) -> Result<Value> {
        let parsed = self.parse_url(url, options);
        let (Some(domain), Some(querystring)) = (parsed.domain, parsed.querystring) else {
            return Err(VintedError::InvalidUrl(url.to_string()));
        };

        let cookie = self.get_cookie(&domain).await?;
        self.client.fetch_items(&domain, &querystring, &cookie).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cookie::tests::ManualClock;
    use crate::cookie::DEFAULT_COOKIE_TTL;
    use std::time::Duration;

    fn unreachable_config() -> ClientConfig {
        ClientConfig {
            timeout_secs: Some(5),
            base_url: Some("http://127.0.0.1:9".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_scraper_creation() {
        let scraper = VintedScraper::new();
        assert!(scraper.is_ok());
    }

    #[test]
    fn test_parse_url_applies_options() {
        let scraper = VintedScraper::new().unwrap();
        let options = SearchOptions::default().with_param("search_text", "boots");
        let parsed = scraper.parse_url("https://www.vinted.fr/catalog?search_text=shoes", &options);
        assert_eq!(parsed.querystring.as_deref(), Some("search_text=boots"));
    }

    #[tokio::test]
    async fn test_search_invalid_url() {
        let scraper = VintedScraper::with_config(unreachable_config()).unwrap();
        let result = scraper
            .search("https://www.ebay.fr/sch?search_text=shoes", &SearchOptions::default())
            .await;
        match result {
            Err(VintedError::InvalidUrl(url)) => {
                assert_eq!(url, "https://www.ebay.fr/sch?search_text=shoes");
            }
            other => panic!("Expected InvalidUrl error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_get_cookie_uses_cache_without_network() {
        let scraper = VintedScraper::with_config(unreachable_config()).unwrap();
        scraper.cache().insert("fr", "cached-session".to_string()).await;

        let cookie = scraper.get_cookie("fr").await.unwrap();
        assert_eq!(cookie, "cached-session");
    }

    #[tokio::test]
    async fn test_get_cookie_refetches_when_stale() {
        let clock = Arc::new(ManualClock::new());
        let cache = Arc::new(CookieCache::with_clock(DEFAULT_COOKIE_TTL, clock.clone()));
        let scraper = VintedScraper::with_cache(unreachable_config(), cache).unwrap();

        scraper.cache().insert("fr", "cached-session".to_string()).await;
        clock.advance(Duration::from_millis(60_000));

        let result = scraper.get_cookie("fr").await;
        match result {
            Err(e @ VintedError::CookieFetch { .. }) => {
                assert_eq!(e.to_string(), "Could not fetch cookie");
            }
            other => panic!("Expected CookieFetch error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_search_network_failure_with_cached_cookie() {
        let scraper = VintedScraper::with_config(unreachable_config()).unwrap();
        scraper.cache().insert("fr", "cached-session".to_string()).await;

        let result = scraper
            .search("https://www.vinted.fr/catalog?search_text=shoes", &SearchOptions::default())
            .await;
        match result {
            Err(e @ VintedError::SearchNetwork(_)) => {
                assert_eq!(e.to_string(), "Can not fetch search API");
            }
            other => panic!("Expected SearchNetwork error, got {:?}", other),
        }
    }
}
