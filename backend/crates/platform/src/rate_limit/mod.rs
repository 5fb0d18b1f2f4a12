//! Rate Limiting Infrastructure
//!
//! Fixed-window request counters keyed by `(action, client)`.
//!
//! The counter lives in an injected [`CounterStore`]; a [`RateLimiter`] owns
//! its store explicitly, there is no process-wide cache. Reading and writing
//! the counter are two separate store calls, so concurrent requests from the
//! same client inside one window can both pass the check before either
//! increment lands. The overshoot is bounded by the request concurrency of
//! that client and is accepted.

pub mod memory;
pub mod middleware;

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

pub use memory::MemoryCounterStore;
pub use middleware::enforce_rate_limit;

/// Counter store failure
#[derive(Debug, Clone, Error)]
pub enum CounterStoreError {
    #[error("Counter store unavailable: {0}")]
    Unavailable(String),
}

/// Key-value store with per-key expiry
#[trait_variant::make(CounterStore: Send)]
pub trait LocalCounterStore {
    /// Current value, `None` when absent or expired
    async fn get(&self, key: &str) -> Result<Option<u64>, CounterStoreError>;

    /// Overwrite the value and restart its time-to-live
    async fn set(&self, key: &str, value: u64, ttl: Duration) -> Result<(), CounterStoreError>;

    /// Remaining time-to-live, `None` when absent or expired
    async fn ttl(&self, key: &str) -> Result<Option<Duration>, CounterStoreError>;
}

/// Duration rounded up to whole seconds, at least one
pub fn whole_secs(duration: Duration) -> u64 {
    let secs = duration.as_secs();
    if duration.subsec_nanos() > 0 {
        secs + 1
    } else {
        secs.max(1)
    }
}

/// Rate limit configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum requests allowed in the window
    pub max_requests: u32,
    /// Time window duration
    pub window: Duration,
    /// Let requests through when the counter store fails
    pub fail_open: bool,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 10,
            window: Duration::from_secs(60),
            fail_open: true,
        }
    }
}

impl RateLimitConfig {
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window: Duration::from_secs(window_secs),
            ..Default::default()
        }
    }

    /// Parse `"<max>/<seconds>"`, e.g. `"5/60"`
    pub fn parse(spec: &str) -> Option<Self> {
        let (max, secs) = spec.trim().split_once('/')?;
        let max_requests = max.trim().parse().ok()?;
        let window_secs: u64 = secs.trim().parse().ok()?;
        if window_secs == 0 {
            return None;
        }
        Some(Self::new(max_requests, window_secs))
    }
}

/// Outcome of [`RateLimiter::admit`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    /// Counted; `count` is the value now stored
    Allowed { count: u64 },
    /// Over the limit; the counter was not touched
    Limited { retry_after: Duration },
}

/// Per-action limiter over a counter store
pub struct RateLimiter<S> {
    action: String,
    config: RateLimitConfig,
    store: Arc<S>,
    return_to: Option<String>,
    landing: String,
}

impl<S> Clone for RateLimiter<S> {
    fn clone(&self) -> Self {
        Self {
            action: self.action.clone(),
            config: self.config.clone(),
            store: Arc::clone(&self.store),
            return_to: self.return_to.clone(),
            landing: self.landing.clone(),
        }
    }
}

impl<S> RateLimiter<S> {
    pub fn new(action: impl Into<String>, config: RateLimitConfig, store: Arc<S>) -> Self {
        Self {
            action: action.into(),
            config,
            store,
            return_to: None,
            landing: "/".to_string(),
        }
    }

    /// Where rejected requests go when their path mentions the action
    pub fn with_return_to(mut self, location: impl Into<String>) -> Self {
        self.return_to = Some(location.into());
        self
    }

    /// Fallback location for rejected requests (default `/`)
    pub fn with_landing(mut self, location: impl Into<String>) -> Self {
        self.landing = location.into();
        self
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    pub fn key(&self, client_id: &str) -> String {
        format!("ratelimit:{}:{}", self.action, client_id)
    }

    pub fn rejection_location(&self, path: &str) -> &str {
        match &self.return_to {
            Some(location) if path.contains(self.action.as_str()) => location,
            _ => &self.landing,
        }
    }

    pub fn rejection_message(&self, retry_after: Duration) -> String {
        format!(
            "Too many requests. Please try again in {} seconds.",
            whole_secs(retry_after)
        )
    }
}

impl<S> RateLimiter<S>
where
    S: CounterStore + Sync,
{
    /// Count one request from `client_id`
    pub async fn admit(&self, client_id: &str) -> Result<RateLimitDecision, CounterStoreError> {
        let key = self.key(client_id);
        let count = self.store.get(&key).await?.unwrap_or(0);

        if count >= u64::from(self.config.max_requests) {
            // a failed TTL lookup still rejects, with the full window as the hint
            let retry_after = match self.store.ttl(&key).await {
                Ok(Some(remaining)) => remaining,
                _ => self.config.window,
            };
            return Ok(RateLimitDecision::Limited { retry_after });
        }

        let count = count + 1;
        self.store.set(&key, count, self.config.window).await?;
        Ok(RateLimitDecision::Allowed { count })
    }
}
