//! Login throttle for slowing down password guessing
//!
//! Attempts are counted per key (the normalized login email). Exceeding the
//! limit inside the window locks the key out for the ban duration. Once more
//! than `max_tracked_keys` keys are held, stale entries are pruned and then the
//! oldest unbanned windows are evicted.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::warn;

/// Rate limiter configuration
#[derive(Debug, Clone)]
pub struct RateLimiterConfig {
    /// Maximum number of attempts allowed
    pub max_attempts: u32,
    /// Time window in seconds
    pub window_seconds: u64,
    /// Ban duration in seconds
    pub ban_duration_seconds: u64,
    /// Number of keys held before stale entries are pruned
    pub max_tracked_keys: usize,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            window_seconds: 300,        // 5 minutes
            ban_duration_seconds: 3600, // 1 hour
            max_tracked_keys: 10_000,
        }
    }
}

#[derive(Debug)]
struct RateLimiterEntry {
    attempts: u32,
    window_start: Instant,
    ban_expires: Option<Instant>,
}

impl RateLimiterEntry {
    fn is_banned(&self, now: Instant) -> bool {
        self.ban_expires.is_some_and(|expires| now < expires)
    }

    fn is_live(&self, now: Instant, window: Duration) -> bool {
        self.is_banned(now) || now.duration_since(self.window_start) < window
    }
}

/// Rate limiter
#[derive(Debug, Clone)]
pub struct RateLimiter {
    config: RateLimiterConfig,
    entries: Arc<Mutex<HashMap<String, RateLimiterEntry>>>,
}

impl RateLimiter {
    /// Create a new rate limiter
    pub fn new(config: RateLimiterConfig) -> Self {
        Self {
            config,
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Record an attempt for `key` and report whether it may proceed
    pub async fn is_allowed(&self, key: &str) -> bool {
        let mut entries = self.entries.lock().await;
        let now = Instant::now();

        if !entries.contains_key(key) && entries.len() >= self.config.max_tracked_keys {
            self.prune(&mut entries, now);
        }

        let entry = entries.entry(key.to_string()).or_insert(RateLimiterEntry {
            attempts: 0,
            window_start: now,
            ban_expires: None,
        });

        if let Some(ban_expires) = entry.ban_expires {
            if now < ban_expires {
                return false;
            }
            entry.attempts = 0;
            entry.ban_expires = None;
            entry.window_start = now;
        }

        if now.duration_since(entry.window_start) >= Duration::from_secs(self.config.window_seconds)
        {
            entry.attempts = 0;
            entry.window_start = now;
        }

        if entry.attempts >= self.config.max_attempts {
            entry.ban_expires = Some(now + Duration::from_secs(self.config.ban_duration_seconds));
            warn!(
                "Locked out login key {} for {} seconds",
                key, self.config.ban_duration_seconds
            );
            return false;
        }

        entry.attempts += 1;
        true
    }

    fn prune(&self, entries: &mut HashMap<String, RateLimiterEntry>, now: Instant) {
        let window = Duration::from_secs(self.config.window_seconds);
        entries.retain(|_, entry| entry.is_live(now, window));

        let capacity = self.config.max_tracked_keys.saturating_sub(1);
        if entries.len() <= capacity {
            return;
        }

        let mut open: Vec<(Instant, String)> = entries
            .iter()
            .filter(|(_, entry)| !entry.is_banned(now))
            .map(|(key, entry)| (entry.window_start, key.clone()))
            .collect();
        open.sort();
        let excess = entries.len() - capacity;
        for (_, key) in open.into_iter().take(excess) {
            entries.remove(&key);
        }
    }

    /// Number of keys currently held
    pub async fn tracked_keys(&self) -> usize {
        self.entries.lock().await.len()
    }

    /// Forget the attempts recorded for `key` (after a successful login)
    pub async fn reset(&self, key: &str) {
        self.entries.lock().await.remove(key);
    }

    /// Get the rate limiter configuration
    pub fn config(&self) -> &RateLimiterConfig {
        &self.config
    }
}
