//! Per-identity submission rate limiting
//!
//! Handlers depend on the [`RateLimiter`] trait only. [`InMemoryRateLimiter`] is
//! the default implementation: process-local, so counts are not shared between
//! instances behind a load balancer and reset on restart. A shared counter (for
//! example a key-value store with expiry) can replace it without touching the
//! handlers.

use async_trait::async_trait;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Outcome of one rate-limit check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    /// Seconds a rejected caller should wait before retrying
    pub retry_after_secs: u64,
}

#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Count one request for `identity` and decide whether it may proceed.
    ///
    /// Never fails: every call yields a decision.
    async fn check(&self, identity: &str) -> RateLimitDecision;

    /// Requests allowed per window
    fn limit(&self) -> u32;

    fn window(&self) -> Duration;
}

#[derive(Debug, Clone)]
struct RateLimitRecord {
    count: u32,
    reset_at: Instant,
}

impl RateLimitRecord {
    fn is_expired(&self, now: Instant) -> bool {
        now > self.reset_at
    }
}

/// Sharded in-memory fixed-window limiter
///
/// A window opens with the first request of an identity and lasts `window`.
/// Keys are hashed onto shards, each behind its own mutex, so the
/// compare-and-increment for one identity is atomic while unrelated identities
/// rarely contend.
pub struct InMemoryRateLimiter {
    shards: Vec<Mutex<HashMap<String, RateLimitRecord>>>,
    limit: u32,
    window: Duration,
    max_entries: usize, // Per shard
}

impl InMemoryRateLimiter {
    /// Create a limiter with 16 shards of up to 10k identities each
    pub fn new(limit: u32, window: Duration) -> Self {
        Self::with_shards(limit, window, 16, 10_000)
    }

    /// A `limit` of zero is raised to one: the first request of a window always
    /// opens it and is counted.
    pub fn with_shards(limit: u32, window: Duration, shard_count: usize, max_entries: usize) -> Self {
        let shard_count = shard_count.max(1);
        let shards = (0..shard_count).map(|_| Mutex::new(HashMap::new())).collect();
        Self {
            shards,
            limit: limit.max(1),
            window,
            max_entries: max_entries.max(1),
        }
    }

    fn shard_for(&self, key: &str) -> &Mutex<HashMap<String, RateLimitRecord>> {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        &self.shards[(hasher.finish() as usize) % self.shards.len()]
    }

    /// Make room for one more identity in a full shard: drop expired records
    /// first, then the record whose window ends soonest.
    fn evict(records: &mut HashMap<String, RateLimitRecord>, max_entries: usize, now: Instant) {
        if records.len() < max_entries {
            return;
        }

        records.retain(|_, record| !record.is_expired(now));

        while records.len() >= max_entries {
            let oldest_key = records
                .iter()
                .min_by_key(|(_, record)| record.reset_at)
                .map(|(key, _)| key.clone());

            match oldest_key {
                Some(key) => {
                    records.remove(&key);
                    tracing::debug!(
                        remaining_entries = records.len(),
                        "Evicted oldest rate limit record due to capacity limit"
                    );
                }
                None => break,
            }
        }
    }

    /// Remove records whose window has ended. Returns how many were dropped.
    pub async fn cleanup_expired(&self) -> usize {
        let now = Instant::now();
        let mut total_cleaned = 0;

        for shard in &self.shards {
            let mut records = shard.lock().await;
            let before = records.len();
            records.retain(|_, record| !record.is_expired(now));
            total_cleaned += before - records.len();
        }

        if total_cleaned > 0 {
            tracing::debug!(
                records_cleaned = total_cleaned,
                "Cleaned up expired rate limit records"
            );
        }
        total_cleaned
    }

    /// Number of identities currently tracked
    pub async fn tracked_identities(&self) -> usize {
        let mut total = 0;
        for shard in &self.shards {
            total += shard.lock().await.len();
        }
        total
    }
}

#[async_trait]
impl RateLimiter for InMemoryRateLimiter {
    async fn check(&self, identity: &str) -> RateLimitDecision {
        let now = Instant::now();
        let mut records = self.shard_for(identity).lock().await;

        let allowed_with = |remaining: u32| RateLimitDecision {
            allowed: true,
            limit: self.limit,
            remaining,
            retry_after_secs: 0,
        };

        match records.get_mut(identity) {
            Some(record) if !record.is_expired(now) => {
                if record.count >= self.limit {
                    return RateLimitDecision {
                        allowed: false,
                        limit: self.limit,
                        remaining: 0,
                        retry_after_secs: self.window.as_secs(),
                    };
                }
                record.count += 1;
                allowed_with(self.limit.saturating_sub(record.count))
            }
            Some(record) => {
                record.count = 1;
                record.reset_at = now + self.window;
                allowed_with(self.limit.saturating_sub(1))
            }
            None => {
                Self::evict(&mut records, self.max_entries, now);
                records.insert(
                    identity.to_string(),
                    RateLimitRecord {
                        count: 1,
                        reset_at: now + self.window,
                    },
                );
                allowed_with(self.limit.saturating_sub(1))
            }
        }
    }

    fn limit(&self) -> u32 {
        self.limit
    }

    fn window(&self) -> Duration {
        self.window
    }
}

/// Periodically sweep expired records from `limiter`.
///
/// Returns `None` when `interval` is zero (sweeping disabled).
pub fn spawn_cleanup_task(
    limiters: Vec<Arc<InMemoryRateLimiter>>,
    interval: Duration,
) -> Option<JoinHandle<()>> {
    if interval.is_zero() {
        return None;
    }

    Some(tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first tick completes immediately
        ticker.tick().await;
        loop {
            ticker.tick().await;
            for limiter in &limiters {
                limiter.cleanup_expired().await;
            }
        }
    }))
}
