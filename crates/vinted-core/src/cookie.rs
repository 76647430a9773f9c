//! Session cookie cache keyed by domain suffix
//!
//! Session cookies are reused for [`DEFAULT_COOKIE_TTL`] after they were
//! fetched. Stale entries are not evicted, they are overwritten by the next
//! fetch for the same domain.
//!
//! Concurrent misses for one domain are not coalesced: each caller may fetch
//! its own cookie and the last insert wins.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// How long a fetched session cookie is reused
pub const DEFAULT_COOKIE_TTL: Duration = Duration::from_millis(60_000);

/// Time source for cookie freshness checks
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall clock backed by [`Instant::now`]
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A session cookie and the moment it was stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedCookie {
    pub cookie: String,
    pub created_at: Instant,
}

impl CachedCookie {
    /// A cookie is fresh while its age is strictly below `ttl`
    pub fn is_fresh(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.created_at) < ttl
    }
}

/// Per-domain session cookie cache
///
/// Meant to be shared behind an `Arc` between scrapers that should reuse
/// the same sessions.
pub struct CookieCache {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    entries: Mutex<HashMap<String, CachedCookie>>,
}

impl CookieCache {
    /// Create a cache with the default 60 second freshness window
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_COOKIE_TTL)
    }

    /// Create a cache with a custom freshness window
    pub fn with_ttl(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    /// Create a cache reading time from `clock`
    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            clock,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the cookie stored for `domain` if it is still fresh
    pub async fn get(&self, domain: &str) -> Option<String> {
        let entries = self.entries.lock().await;
        let now = self.clock.now();
        entries
            .get(domain)
            .filter(|cached| cached.is_fresh(now, self.ttl))
            .map(|cached| cached.cookie.clone())
    }

    /// Stores `cookie` for `domain`, stamped with the current time
    pub async fn insert(&self, domain: &str, cookie: String) {
        let created_at = self.clock.now();
        self.entries
            .lock()
            .await
            .insert(domain.to_string(), CachedCookie { cookie, created_at });
    }

    /// Number of domains with an entry, fresh or stale
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    /// Freshness window of this cache
    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl Default for CookieCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;

    /// Clock that only moves when told to
    pub(crate) struct ManualClock {
        now: StdMutex<Instant>,
    }

    impl ManualClock {
        pub(crate) fn new() -> Self {
            Self {
                now: StdMutex::new(Instant::now()),
            }
        }

        pub(crate) fn advance(&self, by: Duration) {
            *self.now.lock().unwrap() += by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Instant {
            *self.now.lock().unwrap()
        }
    }

    #[test]
    fn test_cached_cookie_freshness_boundary() {
        let created_at = Instant::now();
        let cached = CachedCookie {
            cookie: "abc".to_string(),
            created_at,
        };
        let ttl = Duration::from_millis(60_000);

        assert!(cached.is_fresh(created_at, ttl));
        assert!(cached.is_fresh(created_at + Duration::from_millis(59_999), ttl));
        assert!(!cached.is_fresh(created_at + ttl, ttl));
    }

    #[test]
    fn test_default_ttl() {
        let cache = CookieCache::new();
        assert_eq!(cache.ttl(), Duration::from_secs(60));
    }

    #[tokio::test]
    async fn test_get_missing_domain() {
        let cache = CookieCache::new();
        assert_eq!(cache.get("fr").await, None);
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_fresh_cookie_is_returned() {
        let clock = Arc::new(ManualClock::new());
        let cache = CookieCache::with_clock(DEFAULT_COOKIE_TTL, clock.clone());

        cache.insert("fr", "session-1".to_string()).await;
        clock.advance(Duration::from_secs(59));

        assert_eq!(cache.get("fr").await.as_deref(), Some("session-1"));
        assert_eq!(cache.get("de").await, None);
    }

    #[tokio::test]
    async fn test_stale_cookie_is_kept_but_not_returned() {
        let clock = Arc::new(ManualClock::new());
        let cache = CookieCache::with_clock(DEFAULT_COOKIE_TTL, clock.clone());

        cache.insert("fr", "session-1".to_string()).await;
        clock.advance(Duration::from_secs(60));

        assert_eq!(cache.get("fr").await, None);
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_insert_supersedes_previous_entry() {
        let clock = Arc::new(ManualClock::new());
        let cache = CookieCache::with_clock(DEFAULT_COOKIE_TTL, clock.clone());

        cache.insert("fr", "session-1".to_string()).await;
        clock.advance(Duration::from_secs(90));
        cache.insert("fr", "session-2".to_string()).await;

        assert_eq!(cache.get("fr").await.as_deref(), Some("session-2"));
        assert_eq!(cache.len().await, 1);
    }
}
