//! HTTP client for the Vinted homepage and items endpoint
//!
//! Performs exactly one request per call. There is no retry, backoff or
//! rate limiting; callers own that policy.

use std::time::Duration;

use reqwest::header::{ACCEPT, COOKIE, USER_AGENT};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{Result, VintedError};
use crate::url::{build_homepage_url, build_items_url, build_items_url_from_base};
use crate::user_agent::random_user_agent;

const ACCEPT_VALUE: &str = "application/json, text/plain, */*";
const DEFAULT_SESSION_COOKIE: &str = "_vinted_fr_session";

/// Name of the session cookie read from the homepage and sent to the API
///
/// Vinted has always been queried with the French cookie name regardless
/// of the domain, which is what [`SessionCookieName::Fixed`] reproduces.
/// [`SessionCookieName::PerDomain`] uses `_vinted_<domain>_session` instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCookieName {
    Fixed(String),
    PerDomain,
}

impl SessionCookieName {
    /// Cookie name to use for `domain`
    pub fn for_domain(&self, domain: &str) -> String {
        match self {
            SessionCookieName::Fixed(name) => name.clone(),
            SessionCookieName::PerDomain => format!("_vinted_{}_session", domain),
        }
    }
}

impl Default for SessionCookieName {
    fn default() -> Self {
        SessionCookieName::Fixed(DEFAULT_SESSION_COOKIE.to_string())
    }
}

/// Configuration for the HTTP client
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    /// Request timeout in seconds (default: none)
    pub timeout_secs: Option<u64>,
    /// Send every request to this origin instead of the marketplace hosts
    pub base_url: Option<String>,
    /// Session cookie naming (default: `_vinted_fr_session` for every domain)
    pub session_cookie: SessionCookieName,
}

/// HTTP client wrapper for the homepage and the items API
///
/// Handles all HTTP communication with Vinted:
/// - Session cookie acquisition from the homepage `Set-Cookie` headers
/// - Authenticated items requests with a randomized User-Agent
pub struct VintedClient {
    client: reqwest::Client,
    base_url: Option<String>,
    session_cookie: SessionCookieName,
}

impl VintedClient {
    /// Create a new client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().map_err(VintedError::HttpError)?;

        Ok(Self {
            client,
            base_url: config.base_url,
            session_cookie: config.session_cookie,
        })
    }

    /// Fetch a fresh session cookie for `domain`
    ///
    /// # Arguments
    /// * `domain` - Domain suffix (e.g., "fr")
    ///
    /// # Returns
    /// The session cookie value from the homepage response
    ///
    /// # Errors
    /// - `CookieFetch` - Network failure or no session cookie in the response
    pub async fn fetch_cookie(&self, domain: &str) -> Result<String> {
        let url = self.homepage_url(domain);
        let name = self.session_cookie.for_domain(domain);
        debug!(%url, cookie = %name, "fetching session cookie");

        let response = self.client.get(&url).send().await.map_err(|e| {
            warn!(%url, error = %e, "homepage request failed");
            VintedError::cookie_fetch(e.to_string())
        })?;

        let cookie = response
            .cookies()
            .find(|cookie| cookie.name() == name)
            .map(|cookie| cookie.value().to_string());

        match cookie {
            Some(value) => Ok(value),
            None => {
                warn!(%url, cookie = %name, status = %response.status(), "session cookie missing");
                Err(VintedError::cookie_fetch(format!(
                    "{} not set by {}",
                    name, url
                )))
            }
        }
    }

    /// Query the items endpoint
    ///
    /// # Arguments
    /// * `domain` - Domain suffix (e.g., "fr")
    /// * `querystring` - Translated querystring
    /// * `cookie` - Session cookie value
    ///
    /// # Returns
    /// The response body parsed as JSON. The HTTP status is not inspected.
    ///
    /// # Errors
    /// - `SearchNetwork` - Request or body read failed
    /// - `SearchParse` - Body is not JSON; carries the raw text
    pub async fn fetch_items(&self, domain: &str, querystring: &str, cookie: &str) -> Result<Value> {
        let url = self.items_url(domain, querystring);
        debug!(%url, "querying items endpoint");

        // The response is consumed by `text()`, so the connection is released
        // on every path out of this function.
        let body = async {
            let response = self.items_request(domain, querystring, cookie).send().await?;
            response.text().await
        }
        .await
        .map_err(|e| {
            warn!(%url, error = %e, "items request failed");
            VintedError::SearchNetwork(e)
        })?;

        match serde_json::from_str::<Value>(&body) {
            Ok(json) => Ok(json),
            Err(e) => {
                warn!(%url, error = %e, bytes = body.len(), "items response is not JSON");
                Err(VintedError::SearchParse(body))
            }
        }
    }

    /// Items request with session cookie, a fresh User-Agent and the JSON accept header
    fn items_request(&self, domain: &str, querystring: &str, cookie: &str) -> reqwest::RequestBuilder {
        let cookie_header = format!("{}={}", self.session_cookie.for_domain(domain), cookie);
        self.client
            .get(self.items_url(domain, querystring))
            .header(COOKIE, cookie_header)
            .header(USER_AGENT, random_user_agent())
            .header(ACCEPT, ACCEPT_VALUE)
    }

    fn homepage_url(&self, domain: &str) -> String {
        match &self.base_url {
            Some(base) => base.clone(),
            None => build_homepage_url(domain),
        }
    }

    fn items_url(&self, domain: &str, querystring: &str) -> String {
        match &self.base_url {
            Some(base) => build_items_url_from_base(base, querystring),
            None => build_items_url(domain, querystring),
        }
    }

    /// Session cookie naming in use
    pub fn session_cookie(&self) -> &SessionCookieName {
        &self.session_cookie
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user_agent::USER_AGENTS;

    #[test]
    fn test_client_config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.timeout_secs, None);
        assert_eq!(config.base_url, None);
        assert_eq!(
            config.session_cookie,
            SessionCookieName::Fixed("_vinted_fr_session".to_string())
        );
    }

    #[test]
    fn test_fixed_cookie_name_ignores_domain() {
        let name = SessionCookieName::default();
        assert_eq!(name.for_domain("fr"), "_vinted_fr_session");
        assert_eq!(name.for_domain("de"), "_vinted_fr_session");
    }

    #[test]
    fn test_per_domain_cookie_name() {
        let name = SessionCookieName::PerDomain;
        assert_eq!(name.for_domain("de"), "_vinted_de_session");
        assert_eq!(name.for_domain("it"), "_vinted_it_session");
    }

    #[test]
    fn test_client_creation() {
        let client = VintedClient::new();
        assert!(client.is_ok());
    }

    #[test]
    fn test_client_with_custom_config() {
        let config = ClientConfig {
            timeout_secs: Some(10),
            base_url: Some("http://127.0.0.1:8080".to_string()),
            session_cookie: SessionCookieName::PerDomain,
        };
        let client = VintedClient::with_config(config).unwrap();
        assert_eq!(client.session_cookie(), &SessionCookieName::PerDomain);
    }

    #[test]
    fn test_urls_use_marketplace_hosts_by_default() {
        let client = VintedClient::new().unwrap();
        assert_eq!(client.homepage_url("fr"), "https://vinted.fr");
        assert_eq!(
            client.items_url("fr", "search_text=shoes"),
            "https://www.vinted.fr/api/v2/items?search_text=shoes"
        );
    }

    #[test]
    fn test_urls_use_base_url_override() {
        let config = ClientConfig {
            base_url: Some("http://127.0.0.1:8080".to_string()),
            ..Default::default()
        };
        let client = VintedClient::with_config(config).unwrap();
        assert_eq!(client.homepage_url("fr"), "http://127.0.0.1:8080");
        assert_eq!(
            client.items_url("de", "page=2"),
            "http://127.0.0.1:8080/api/v2/items?page=2"
        );
    }

    #[test]
    fn test_items_request_headers() {
        let client = VintedClient::new().unwrap();

        for _ in 0..2 {
            let request = client
                .items_request("fr", "search_text=shoes", "abc123")
                .build()
                .unwrap();
            let headers = request.headers();

            assert_eq!(
                request.url().as_str(),
                "https://www.vinted.fr/api/v2/items?search_text=shoes"
            );
            assert_eq!(headers[ACCEPT], "application/json, text/plain, */*");
            assert_eq!(headers[COOKIE], "_vinted_fr_session=abc123");
            let ua = headers[USER_AGENT].to_str().unwrap();
            assert!(USER_AGENTS.contains(&ua), "unexpected user agent {ua}");
        }
    }

    #[test]
    fn test_items_request_user_agent_rotates() {
        let client = VintedClient::new().unwrap();
        let mut seen = std::collections::HashSet::new();

        for _ in 0..200 {
            let request = client
                .items_request("fr", "page=1", "abc123")
                .build()
                .unwrap();
            seen.insert(request.headers()[USER_AGENT].to_str().unwrap().to_string());
        }

        assert!(seen.len() > 1);
        assert!(seen.iter().all(|ua| USER_AGENTS.contains(&ua.as_str())));
    }

    #[tokio::test]
    async fn test_fetch_cookie_network_failure() {
        let config = ClientConfig {
            timeout_secs: Some(5),
            base_url: Some("http://127.0.0.1:9".to_string()),
            ..Default::default()
        };
        let client = VintedClient::with_config(config).unwrap();
        let result = client.fetch_cookie("fr").await;
        match result {
            Err(VintedError::CookieFetch { .. }) => {}
            other => panic!("Expected CookieFetch error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_items_network_failure() {
        let config = ClientConfig {
            timeout_secs: Some(5),
            base_url: Some("http://127.0.0.1:9".to_string()),
            ..Default::default()
        };
        let client = VintedClient::with_config(config).unwrap();
        let result = client.fetch_items("fr", "search_text=shoes", "abc").await;
        match result {
            Err(e @ VintedError::SearchNetwork(_)) => {
                assert_eq!(e.to_string(), "Can not fetch search API");
            }
            other => panic!("Expected SearchNetwork error, got {:?}", other),
        }
    }
}
